use chrono::Local;
use clap::Args;
use habitloop_core::storage::Database;
use habitloop_core::{HabitInputKind, ProgressRecord};

#[derive(Args)]
pub struct LogArgs {
    /// Habit name or id
    habit: String,

    /// Day the entry covers, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<String>,

    /// Free-text reflection
    #[arg(long)]
    reflection: Option<String>,

    /// Photo reference (URI)
    #[arg(long)]
    image: Option<String>,

    /// Measured value, for numeric habits
    #[arg(long)]
    value: Option<f64>,
}

pub fn run(args: LogArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let habit = db.find_habit(&args.habit)?;

    let date = match args.date {
        Some(d) => super::parse_day(&d)?,
        None => Local::now().date_naive(),
    };

    if args.value.is_some() && habit.input_kind == HabitInputKind::Boolean {
        eprintln!("note: '{}' is a boolean habit, the value is stored but unused", habit.name);
    }

    let mut record = ProgressRecord::on(date);
    if let Some(reflection) = args.reflection {
        record = record.with_reflection(reflection);
    }
    if let Some(image) = args.image {
        record = record.with_image(image);
    }
    if let Some(value) = args.value {
        record = record.with_measurement(value);
    }

    db.record_progress(habit.id, &record)?;
    println!("Logged {} for {}", date, habit.name);
    Ok(())
}
