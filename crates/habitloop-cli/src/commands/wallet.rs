use clap::Subcommand;
use habitloop_core::storage::{Config, Database};

#[derive(Subcommand)]
pub enum WalletAction {
    /// Current balance and last award date
    Show {
        /// JSON output
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: WalletAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;

    match action {
        WalletAction::Show { json } => {
            let checkpoint = db
                .load_checkpoint(&config.user.id)?
                .unwrap_or_else(|| config.reward_config().initial_checkpoint());
            if json {
                println!("{}", serde_json::to_string_pretty(&checkpoint)?);
            } else {
                println!("coins: {}", checkpoint.currency_balance);
                match checkpoint.last_award_date {
                    Some(date) => println!("last award: {date}"),
                    None => println!("last award: never"),
                }
                println!("next goal: {} day streak", checkpoint.current_goal);
            }
        }
    }
    Ok(())
}
