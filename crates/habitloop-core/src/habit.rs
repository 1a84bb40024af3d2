//! Habit definitions.
//!
//! A habit is the thing a user commits to: a name, a cadence label, and an
//! input kind that determines what a progress entry captures (a simple
//! did-it-or-not mark, or a measured numeric value).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of value a progress entry records for this habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitInputKind {
    /// The entry only marks the day as done.
    #[default]
    Boolean,
    /// The entry carries a measured numeric value (km run, pages read, ...).
    Numeric,
}

impl HabitInputKind {
    /// Parse from the string form used in storage and on the CLI.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "boolean" => Some(HabitInputKind::Boolean),
            "numeric" => Some(HabitInputKind::Numeric),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HabitInputKind::Boolean => "boolean",
            HabitInputKind::Numeric => "numeric",
        }
    }
}

/// A user-defined habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Stable identifier
    pub id: Uuid,

    /// Display name ("morning run", "read 20 pages")
    pub name: String,

    /// Free-text cadence label ("daily", "weekdays"); informational only,
    /// streak math always works on calendar days
    pub frequency: String,

    /// What a progress entry records
    pub input_kind: HabitInputKind,

    /// Optional cover image reference (opaque URI, never dereferenced here)
    pub image: Option<String>,
}

impl Habit {
    /// Create a new habit with a fresh id.
    pub fn new(name: impl Into<String>, frequency: impl Into<String>, input_kind: HabitInputKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            frequency: frequency.into(),
            input_kind,
            image: None,
        }
    }

    /// Attach a cover image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind_parse_round_trip() {
        for kind in [HabitInputKind::Boolean, HabitInputKind::Numeric] {
            assert_eq!(HabitInputKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(HabitInputKind::parse("freeform"), None);
    }

    #[test]
    fn test_habit_serialization() {
        let habit = Habit::new("morning run", "daily", HabitInputKind::Numeric)
            .with_image("file:///photos/run.jpg");

        let json = serde_json::to_string(&habit).unwrap();
        assert!(json.contains("\"numeric\""));

        let back: Habit = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, habit.id);
        assert_eq!(back.name, "morning run");
        assert_eq!(back.input_kind, HabitInputKind::Numeric);
    }
}
