//! SQLite-based habit and progress storage.
//!
//! Provides persistent storage for:
//! - Habit definitions
//! - Progress entries (one row per logging action)
//! - Per-user reward checkpoints
//!
//! The checkpoint table is where the at-most-one-grant-per-day rule is
//! actually enforced: a grant is written with a conditional UPDATE that only
//! lands while no grant is recorded for that day yet, so overlapping
//! evaluations of the same snapshot cannot double-credit.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::engine::{CheckpointStore, GrantOutcome};
use crate::error::{CoreError, DatabaseError, Result as CoreResult};
use crate::habit::{Habit, HabitInputKind};
use crate::progress::ProgressRecord;
use crate::reward::RewardCheckpoint;

use super::data_dir;

const DATE_FMT: &str = "%Y-%m-%d";

/// SQLite database for habits, progress entries and reward checkpoints.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/habitloop/habitloop.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        Self::open_at(data_dir()?.join("habitloop.db"))
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: impl Into<std::path::PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    /// Open an in-memory database (tests, throwaway runs).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS habits (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                frequency   TEXT NOT NULL DEFAULT '',
                input_kind  TEXT NOT NULL DEFAULT 'boolean',
                image       TEXT
            );

            CREATE TABLE IF NOT EXISTS progress (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                habit_id    TEXT NOT NULL,
                date        TEXT NOT NULL,
                reflection  TEXT,
                image       TEXT,
                measurement REAL
            );

            CREATE TABLE IF NOT EXISTS checkpoints (
                user_id          TEXT PRIMARY KEY,
                currency_balance INTEGER NOT NULL DEFAULT 0,
                last_award_date  TEXT,
                current_goal     INTEGER NOT NULL DEFAULT 1
            );

            CREATE INDEX IF NOT EXISTS idx_progress_habit_date ON progress(habit_id, date);",
        )?;
        Ok(())
    }

    // --- habits ---

    /// Insert a habit definition.
    pub fn insert_habit(&self, habit: &Habit) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO habits (id, name, frequency, input_kind, image)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                habit.id.to_string(),
                habit.name,
                habit.frequency,
                habit.input_kind.as_str(),
                habit.image,
            ],
        )?;
        Ok(())
    }

    /// Overwrite an existing habit definition.
    pub fn update_habit(&self, habit: &Habit) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE habits SET name = ?2, frequency = ?3, input_kind = ?4, image = ?5
             WHERE id = ?1",
            params![
                habit.id.to_string(),
                habit.name,
                habit.frequency,
                habit.input_kind.as_str(),
                habit.image,
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "habit".to_string(),
                id: habit.id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete a habit and all of its progress entries.
    pub fn delete_habit(&self, id: Uuid) -> Result<(), DatabaseError> {
        self.conn.execute(
            "DELETE FROM progress WHERE habit_id = ?1",
            params![id.to_string()],
        )?;
        let changed = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1", params![id.to_string()])?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "habit".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// All habits, ordered by name.
    pub fn list_habits(&self) -> Result<Vec<Habit>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, frequency, input_kind, image FROM habits ORDER BY name",
        )?;
        let rows = stmt.query_map([], row_to_habit)?;
        let mut habits = Vec::new();
        for row in rows {
            habits.push(row?);
        }
        Ok(habits)
    }

    /// Look a habit up by id, or by exact name when the argument is not a
    /// uuid. CLI convenience.
    pub fn find_habit(&self, name_or_id: &str) -> Result<Habit, DatabaseError> {
        let habit = if let Ok(id) = Uuid::parse_str(name_or_id) {
            self.conn
                .query_row(
                    "SELECT id, name, frequency, input_kind, image FROM habits WHERE id = ?1",
                    params![id.to_string()],
                    row_to_habit,
                )
                .optional()?
        } else {
            self.conn
                .query_row(
                    "SELECT id, name, frequency, input_kind, image FROM habits WHERE name = ?1",
                    params![name_or_id],
                    row_to_habit,
                )
                .optional()?
        };

        habit.ok_or_else(|| DatabaseError::NotFound {
            entity: "habit".to_string(),
            id: name_or_id.to_string(),
        })
    }

    // --- progress ---

    /// Append a progress entry. Re-logging the same day is allowed; the
    /// streak calculator collapses duplicates.
    pub fn record_progress(&self, habit_id: Uuid, record: &ProgressRecord) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO progress (habit_id, date, reflection, image, measurement)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                habit_id.to_string(),
                record.date.format(DATE_FMT).to_string(),
                record.reflection,
                record.image,
                record.measurement,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All progress entries for a habit, newest first.
    ///
    /// Rows whose stored date no longer parses are skipped rather than
    /// failing the query.
    pub fn progress_for(&self, habit_id: Uuid) -> Result<Vec<ProgressRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, reflection, image, measurement
             FROM progress WHERE habit_id = ?1 ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![habit_id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<f64>>(3)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (date, reflection, image, measurement) = row?;
            if let Ok(date) = NaiveDate::parse_from_str(&date, DATE_FMT) {
                records.push(ProgressRecord {
                    date,
                    reflection,
                    image,
                    measurement,
                });
            }
        }
        Ok(records)
    }

    // --- checkpoints ---

    /// Load a user's reward checkpoint, `None` for a first-time user.
    pub fn load_checkpoint(&self, user_id: &str) -> Result<Option<RewardCheckpoint>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT currency_balance, last_award_date, current_goal
                 FROM checkpoints WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, u64>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, u32>(2)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(|(currency_balance, last_award_date, current_goal)| RewardCheckpoint {
            currency_balance,
            last_award_date: last_award_date
                .and_then(|d| NaiveDate::parse_from_str(&d, DATE_FMT).ok()),
            current_goal,
        }))
    }

    /// Write a grant, conditioned on no grant being recorded for `today`
    /// (or later) yet. Returns false when the condition failed, meaning an
    /// overlapping evaluation already credited the day.
    pub fn apply_grant_checked(
        &self,
        user_id: &str,
        checkpoint: &RewardCheckpoint,
        today: NaiveDate,
    ) -> Result<bool, DatabaseError> {
        let today_str = today.format(DATE_FMT).to_string();
        let award_date = checkpoint
            .last_award_date
            .map(|d| d.format(DATE_FMT).to_string());

        // ISO dates compare correctly as text, so the WHERE clause is the
        // compare-and-set: only a row with no same-or-later award day is
        // updated.
        let changed = self.conn.execute(
            "INSERT INTO checkpoints (user_id, currency_balance, last_award_date, current_goal)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                 currency_balance = excluded.currency_balance,
                 last_award_date  = excluded.last_award_date,
                 current_goal     = MAX(current_goal, excluded.current_goal)
             WHERE last_award_date IS NULL OR last_award_date < ?5",
            params![
                user_id,
                checkpoint.currency_balance,
                award_date,
                checkpoint.current_goal,
                today_str,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Persist goal growth without touching balance or award date.
    pub fn raise_goal(&self, user_id: &str, goal: u32) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO checkpoints (user_id, currency_balance, last_award_date, current_goal)
             VALUES (?1, 0, NULL, ?2)
             ON CONFLICT(user_id) DO UPDATE SET
                 current_goal = MAX(current_goal, excluded.current_goal)",
            params![user_id, goal],
        )?;
        Ok(())
    }
}

impl CheckpointStore for Database {
    fn load(&self, user_id: &str) -> CoreResult<Option<RewardCheckpoint>> {
        Ok(self.load_checkpoint(user_id)?)
    }

    fn apply(
        &self,
        user_id: &str,
        decision: &crate::reward::RewardDecision,
        today: NaiveDate,
    ) -> CoreResult<GrantOutcome> {
        if decision.grant {
            if self.apply_grant_checked(user_id, &decision.new_checkpoint, today)? {
                Ok(GrantOutcome::Granted)
            } else {
                Ok(GrantOutcome::AlreadyGranted)
            }
        } else {
            self.raise_goal(user_id, decision.new_checkpoint.current_goal)?;
            Ok(GrantOutcome::NoGrant)
        }
    }
}

fn row_to_habit(row: &rusqlite::Row<'_>) -> rusqlite::Result<Habit> {
    let id: String = row.get(0)?;
    let input_kind: String = row.get(3)?;
    Ok(Habit {
        id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::nil()),
        name: row.get(1)?,
        frequency: row.get(2)?,
        input_kind: HabitInputKind::parse(&input_kind).unwrap_or_default(),
        image: row.get(4)?,
    })
}
