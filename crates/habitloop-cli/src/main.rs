use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "habitloop-cli", version, about = "Habitloop CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Log a progress entry for a habit
    Log(commands::log::LogArgs),
    /// Streak, goal and chart data for a habit
    Progress(commands::progress::ProgressArgs),
    /// Currency balance
    Wallet {
        #[command(subcommand)]
        action: commands::wallet::WalletAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Log(args) => commands::log::run(args),
        Commands::Progress(args) => commands::progress::run(args),
        Commands::Wallet { action } => commands::wallet::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
