use chrono::Local;
use clap::Args;
use habitloop_core::storage::{Config, Database};
use habitloop_core::{
    measurement_series, summarize, GrantOutcome, HabitInputKind, ProgressEngine, ProgressSnapshot,
};

#[derive(Args)]
pub struct ProgressArgs {
    /// Habit name or id
    habit: String,

    /// Evaluate as of this day, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<String>,

    /// JSON output
    #[arg(long)]
    json: bool,
}

pub fn run(args: ProgressArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let habit = db.find_habit(&args.habit)?;

    let today = match args.date {
        Some(d) => super::parse_day(&d)?,
        None => Local::now().date_naive(),
    };

    let records = db.progress_for(habit.id)?;
    let snapshot = ProgressSnapshot::new(
        config.user.id.clone(),
        habit.id,
        records,
        db.load_checkpoint(&config.user.id)?,
        today,
    );

    let engine = ProgressEngine::with_config(config.reward_config());
    let (outcome, applied) = engine.recompute_and_apply(&snapshot, &db)?;

    if applied == GrantOutcome::AlreadyGranted {
        // Another evaluation of the same day won the write; the stored
        // state is authoritative, nothing to retry.
        eprintln!("warning: today's reward was already granted by a concurrent evaluation");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("{}", habit.name);
    println!("  {} / {} day streak", outcome.displayed_streak, outcome.goal);
    if outcome.decision.grant {
        println!("  goal reached! +{} coins", config.reward.award_amount);
    }
    println!("  coins: {}", outcome.balance);
    if let Some(last) = outcome.streak.most_recent_date {
        println!("  last logged: {last}");
    }

    let summary = summarize(&snapshot.records);
    println!(
        "  {} days logged, {} entries, {} with photos",
        summary.days_logged, summary.total_entries, summary.entries_with_images
    );

    if config.display.show_chart && habit.input_kind == HabitInputKind::Numeric {
        let series = measurement_series(&snapshot.records);
        if !series.is_empty() {
            println!("  measurements:");
            for point in series {
                println!("    {}  {}", point.date, point.value);
            }
        }
    }

    Ok(())
}
