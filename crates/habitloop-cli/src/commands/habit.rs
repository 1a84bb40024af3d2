use clap::Subcommand;
use habitloop_core::storage::Database;
use habitloop_core::{Habit, HabitInputKind, ValidationError};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Define a new habit
    Add {
        /// Display name
        name: String,
        /// Cadence label, e.g. "daily"
        #[arg(long, default_value = "daily")]
        frequency: String,
        /// Input kind: boolean or numeric
        #[arg(long, default_value = "boolean")]
        input: String,
        /// Cover image reference (URI)
        #[arg(long)]
        image: Option<String>,
    },
    /// List habits
    List {
        /// JSON output
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing habit
    Edit {
        /// Habit name or id
        habit: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        frequency: Option<String>,
        #[arg(long)]
        input: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Remove a habit and its progress entries
    Remove {
        /// Habit name or id
        habit: String,
    },
}

fn parse_input_kind(input: &str) -> Result<HabitInputKind, ValidationError> {
    HabitInputKind::parse(input).ok_or_else(|| ValidationError::InvalidValue {
        field: "input".to_string(),
        message: format!("unknown input kind '{input}' (boolean or numeric)"),
    })
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        HabitAction::Add {
            name,
            frequency,
            input,
            image,
        } => {
            let input_kind = parse_input_kind(&input)?;
            let mut habit = Habit::new(name, frequency, input_kind);
            if let Some(image) = image {
                habit = habit.with_image(image);
            }
            db.insert_habit(&habit)?;
            println!("Habit created: {} ({})", habit.name, habit.id);
        }
        HabitAction::List { json } => {
            let habits = db.list_habits()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&habits)?);
            } else if habits.is_empty() {
                println!("no habits yet");
            } else {
                for habit in habits {
                    println!(
                        "{}  {}  [{}]  {}",
                        habit.id,
                        habit.name,
                        habit.input_kind.as_str(),
                        habit.frequency
                    );
                }
            }
        }
        HabitAction::Edit {
            habit,
            name,
            frequency,
            input,
            image,
        } => {
            let mut existing = db.find_habit(&habit)?;
            if let Some(name) = name {
                existing.name = name;
            }
            if let Some(frequency) = frequency {
                existing.frequency = frequency;
            }
            if let Some(input) = input {
                existing.input_kind = parse_input_kind(&input)?;
            }
            if let Some(image) = image {
                existing.image = Some(image);
            }
            db.update_habit(&existing)?;
            println!("Habit updated: {}", existing.name);
        }
        HabitAction::Remove { habit } => {
            let existing = db.find_habit(&habit)?;
            db.delete_habit(existing.id)?;
            println!("Habit removed: {}", existing.name);
        }
    }
    Ok(())
}
