//! # Habitloop Core Library
//!
//! This library provides the core business logic for Habitloop, a personal
//! habit tracker that rewards consistency: users define habits, log dated
//! progress entries, and earn in-app currency by keeping up consecutive-day
//! streaks.
//!
//! ## Architecture
//!
//! - **Streak Calculator**: A pure function over a habit's progress records
//!   that yields the current consecutive-day streak (one-day grace allowed)
//! - **Reward Evaluator**: Decides grants, applies the once-per-day guard,
//!   and escalates the streak goal
//! - **Engine**: A snapshot-recompute entry point the caller invokes on
//!   every data refresh; holds no subscription state
//! - **Storage**: SQLite-based habit/progress/checkpoint storage and
//!   TOML-based configuration, where the conditional grant write enforces
//!   at-most-one-grant-per-day
//!
//! ## Key Components
//!
//! - [`compute_streak`]: Streak calculation over progress records
//! - [`RewardEvaluator`]: Grant and goal-growth decisions
//! - [`ProgressEngine`]: Snapshot recompute plus decision application
//! - [`Database`]: Persistent storage and the conditional grant write

pub mod engine;
pub mod error;
pub mod habit;
pub mod progress;
pub mod reward;
pub mod stats;
pub mod storage;
pub mod streak;

pub use engine::{
    CheckpointStore, GrantOutcome, GrantRequest, InMemoryCheckpointStore, ProgressEngine,
    ProgressOutcome, ProgressSnapshot,
};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use habit::{Habit, HabitInputKind};
pub use progress::{project_records, ProgressRecord, RawProgressRecord};
pub use reward::{RewardCheckpoint, RewardConfig, RewardDecision, RewardEvaluator};
pub use stats::{measurement_series, summarize, LogSummary, MeasurementPoint};
pub use storage::{Config, Database};
pub use streak::{compute_streak, StreakSummary};
