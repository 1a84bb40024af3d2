//! Snapshot recompute entry point.
//!
//! The engine ties the streak calculator and the reward evaluator together
//! behind a single call: the caller hands it an immutable snapshot (records,
//! checkpoint, today) whenever its data changes, and gets back everything
//! needed for display plus an advisory grant request. The engine holds no
//! subscription state and reads no ambient identity; user and habit ids
//! travel inside the snapshot.
//!
//! Applying a grant goes through [`CheckpointStore::apply`], which must
//! condition the write on no grant having landed for the same day yet --
//! repeated evaluation of the same snapshot is expected and must credit
//! currency at most once per calendar day.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::progress::{project_records, ProgressRecord, RawProgressRecord};
use crate::reward::{RewardCheckpoint, RewardConfig, RewardDecision, RewardEvaluator};
use crate::streak::{compute_streak, StreakSummary};

/// Everything one recompute needs, captured as an immutable value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Owning user
    pub user_id: String,

    /// Habit the records belong to
    pub habit_id: Uuid,

    /// Progress entries for the habit, any order
    pub records: Vec<ProgressRecord>,

    /// Persisted reward state; `None` for a first-time user
    pub checkpoint: Option<RewardCheckpoint>,

    /// The local calendar day to evaluate against
    pub today: NaiveDate,
}

impl ProgressSnapshot {
    pub fn new(
        user_id: impl Into<String>,
        habit_id: Uuid,
        records: Vec<ProgressRecord>,
        checkpoint: Option<RewardCheckpoint>,
        today: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            habit_id,
            records,
            checkpoint,
            today,
        }
    }

    /// Build from raw storage rows; entries with malformed dates are dropped.
    pub fn from_raw(
        user_id: impl Into<String>,
        habit_id: Uuid,
        raw: Vec<RawProgressRecord>,
        checkpoint: Option<RewardCheckpoint>,
        today: NaiveDate,
    ) -> Self {
        Self::new(user_id, habit_id, project_records(raw), checkpoint, today)
    }
}

/// Result of one recompute: display state plus the advisory reward decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressOutcome {
    pub user_id: String,
    pub habit_id: Uuid,

    /// Raw calculator output
    pub streak: StreakSummary,

    /// Streak to show the user; zero right after a grant consumed it
    pub displayed_streak: u32,

    /// Goal to show the user, after growth
    pub goal: u32,

    /// Balance after the decision
    pub balance: u64,

    /// The full evaluator decision, for callers that persist it themselves
    pub decision: RewardDecision,

    /// Advisory checkpoint mutation to apply, present only on a grant
    pub grant_request: Option<GrantRequest>,
}

/// Advisory request to credit currency, applied by the persistence owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRequest {
    pub user_id: String,
    pub amount: u64,
    pub award_date: NaiveDate,
    pub new_checkpoint: RewardCheckpoint,
}

/// How an applied decision landed at the persistence boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantOutcome {
    /// The grant was written
    Granted,
    /// The conditional write found a grant already recorded for the day.
    /// A non-fatal consistency signal; never retried, re-evaluation would
    /// reach the same decision.
    AlreadyGranted,
    /// The decision carried no grant; only goal growth was persisted
    NoGrant,
}

/// Owner of persisted checkpoints.
///
/// `apply` must make the grant write conditional: it only lands when the
/// stored `last_award_date` still differs from the decision's award day at
/// write time. Concurrent evaluations of the same day then race safely and
/// exactly one of them reports [`GrantOutcome::Granted`].
pub trait CheckpointStore {
    /// Load the checkpoint for a user, `None` when nothing is persisted yet.
    fn load(&self, user_id: &str) -> Result<Option<RewardCheckpoint>>;

    /// Apply an evaluator decision for the given day.
    fn apply(&self, user_id: &str, decision: &RewardDecision, today: NaiveDate) -> Result<GrantOutcome>;
}

/// Streak + reward recomputation over immutable snapshots.
#[derive(Debug, Clone, Default)]
pub struct ProgressEngine {
    evaluator: RewardEvaluator,
}

impl ProgressEngine {
    /// Engine with default reward constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with custom reward constants.
    pub fn with_config(config: RewardConfig) -> Self {
        Self {
            evaluator: RewardEvaluator::with_config(config),
        }
    }

    /// Recompute streak and reward state for one snapshot.
    ///
    /// Pure: safe to call on every data refresh. A missing checkpoint is
    /// treated as a first-time user, never an error.
    pub fn recompute(&self, snapshot: &ProgressSnapshot) -> ProgressOutcome {
        let checkpoint = snapshot
            .checkpoint
            .clone()
            .unwrap_or_else(|| self.evaluator.config().initial_checkpoint());

        let streak = compute_streak(&snapshot.records, snapshot.today);
        let decision = self
            .evaluator
            .evaluate(streak.streak_length, &checkpoint, snapshot.today);

        let displayed_streak = if decision.reset_streak {
            0
        } else {
            streak.streak_length
        };

        let grant_request = decision.grant.then(|| GrantRequest {
            user_id: snapshot.user_id.clone(),
            amount: self.evaluator.config().award_amount,
            award_date: snapshot.today,
            new_checkpoint: decision.new_checkpoint.clone(),
        });

        ProgressOutcome {
            user_id: snapshot.user_id.clone(),
            habit_id: snapshot.habit_id,
            streak,
            displayed_streak,
            goal: decision.new_checkpoint.current_goal,
            balance: decision.new_balance,
            decision,
            grant_request,
        }
    }

    /// Recompute and push the decision through a checkpoint store.
    ///
    /// Returns the outcome together with how the write landed. An
    /// [`GrantOutcome::AlreadyGranted`] result means another evaluation of
    /// the same day won the race; the caller should surface it as a warning
    /// and keep the stored state, not retry.
    pub fn recompute_and_apply<S: CheckpointStore>(
        &self,
        snapshot: &ProgressSnapshot,
        store: &S,
    ) -> Result<(ProgressOutcome, GrantOutcome)> {
        let outcome = self.recompute(snapshot);
        let applied = store.apply(&snapshot.user_id, &outcome.decision, snapshot.today)?;
        Ok((outcome, applied))
    }
}

/// Checkpoint store backed by a process-local map. Used in tests and by
/// callers that own persistence elsewhere.
#[derive(Debug, Default)]
pub struct InMemoryCheckpointStore {
    checkpoints: Mutex<HashMap<String, RewardCheckpoint>>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a checkpoint for a user.
    pub fn insert(&self, user_id: impl Into<String>, checkpoint: RewardCheckpoint) {
        self.checkpoints
            .lock()
            .expect("checkpoint map poisoned")
            .insert(user_id.into(), checkpoint);
    }

    /// Current checkpoint for a user, if any.
    pub fn get(&self, user_id: &str) -> Option<RewardCheckpoint> {
        self.checkpoints
            .lock()
            .expect("checkpoint map poisoned")
            .get(user_id)
            .cloned()
    }
}

impl CheckpointStore for InMemoryCheckpointStore {
    fn load(&self, user_id: &str) -> Result<Option<RewardCheckpoint>> {
        Ok(self.get(user_id))
    }

    fn apply(&self, user_id: &str, decision: &RewardDecision, today: NaiveDate) -> Result<GrantOutcome> {
        let mut map = self.checkpoints.lock().expect("checkpoint map poisoned");
        let stored = map.entry(user_id.to_string()).or_default();

        if decision.grant {
            // Compare-and-set: the grant only lands if no grant has been
            // recorded for this day yet.
            if stored.last_award_date.is_some_and(|last| last >= today) {
                return Ok(GrantOutcome::AlreadyGranted);
            }
            *stored = decision.new_checkpoint.clone();
            Ok(GrantOutcome::Granted)
        } else {
            // Goal growth persists unconditionally but never moves the goal
            // backwards or touches the balance.
            stored.current_goal = stored.current_goal.max(decision.new_checkpoint.current_goal);
            Ok(GrantOutcome::NoGrant)
        }
    }
}
