//! Reward evaluation.
//!
//! Reaching the streak goal earns a fixed amount of in-app currency, at most
//! once per calendar day. A grant consumes the streak (it restarts from zero
//! rather than accumulating forever), and the goal escalates as a step
//! function of the achieved streak length so a stale shorter streak can
//! never satisfy it again.
//!
//! The evaluator is pure and advisory: it returns the intended new state and
//! the caller applies it, conditionally, at the persistence boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default currency credited per grant.
pub const DEFAULT_AWARD_AMOUNT: u64 = 5;

/// Default goal-growth step, in days per increment.
pub const DEFAULT_GOAL_STEP: u32 = 5;

/// Default goal for a user who has never been awarded.
pub const DEFAULT_BASELINE_GOAL: u32 = 1;

/// Per-user reward state, persisted between evaluations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardCheckpoint {
    /// Accumulated currency; only ever raised here, spending is external
    pub currency_balance: u64,

    /// Day of the most recent grant, `None` for a user never awarded
    pub last_award_date: Option<NaiveDate>,

    /// Streak length, in days, required for the next grant
    pub current_goal: u32,
}

impl Default for RewardCheckpoint {
    /// First-time-user checkpoint: empty balance, never awarded, baseline goal.
    fn default() -> Self {
        Self {
            currency_balance: 0,
            last_award_date: None,
            current_goal: DEFAULT_BASELINE_GOAL,
        }
    }
}

/// Tunable reward constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Currency credited per grant
    pub award_amount: u64,
    /// Goal-growth step (days per increment)
    pub goal_step: u32,
    /// Goal used before any award has occurred
    pub baseline_goal: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            award_amount: DEFAULT_AWARD_AMOUNT,
            goal_step: DEFAULT_GOAL_STEP,
            baseline_goal: DEFAULT_BASELINE_GOAL,
        }
    }
}

impl RewardConfig {
    /// Checkpoint for a user with no persisted reward state yet.
    pub fn initial_checkpoint(&self) -> RewardCheckpoint {
        RewardCheckpoint {
            currency_balance: 0,
            last_award_date: None,
            current_goal: self.baseline_goal,
        }
    }
}

/// Outcome of one reward evaluation, to be applied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardDecision {
    /// Whether currency should be credited
    pub grant: bool,

    /// Balance after the decision (unchanged when `grant` is false)
    pub new_balance: u64,

    /// Checkpoint to persist
    pub new_checkpoint: RewardCheckpoint,

    /// Whether the displayed streak restarts from zero (a grant consumes it)
    pub reset_streak: bool,
}

/// Decides grants and goal growth from a computed streak length.
#[derive(Debug, Clone, Default)]
pub struct RewardEvaluator {
    config: RewardConfig,
}

impl RewardEvaluator {
    /// Create an evaluator with default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom constants.
    pub fn with_config(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Evaluate the reward rules for one habit snapshot.
    ///
    /// Total function: any `(streak_length, checkpoint, today)` triple has a
    /// well-defined outcome. An absent `last_award_date` means "never
    /// awarded" and permits a grant.
    ///
    /// Rules, in order:
    /// 1. a grant requires `streak_length >= current_goal`
    /// 2. a grant is suppressed when `last_award_date` is today or later
    ///    (repeated same-day evaluation, clock skew)
    /// 3. a grant credits the award amount, stamps today, and consumes the
    ///    streak
    /// 4. any positive streak escalates the goal to
    ///    `goal_step * (streak_length + 1)`; the goal never decreases
    /// 5. a zero streak changes nothing
    pub fn evaluate(
        &self,
        streak_length: u32,
        checkpoint: &RewardCheckpoint,
        today: NaiveDate,
    ) -> RewardDecision {
        if streak_length == 0 {
            return RewardDecision {
                grant: false,
                new_balance: checkpoint.currency_balance,
                new_checkpoint: checkpoint.clone(),
                reset_streak: false,
            };
        }

        let eligible = streak_length >= checkpoint.current_goal;
        let already_awarded_today = checkpoint
            .last_award_date
            .is_some_and(|last| last >= today);

        let grant = eligible && !already_awarded_today;

        let new_balance = if grant {
            checkpoint
                .currency_balance
                .saturating_add(self.config.award_amount)
        } else {
            checkpoint.currency_balance
        };

        // Goal growth from the achieved streak, monotone: a regrowing
        // shorter streak never lowers an already-raised goal.
        let grown_goal = self
            .config
            .goal_step
            .saturating_mul(streak_length.saturating_add(1));
        let new_goal = checkpoint.current_goal.max(grown_goal);

        RewardDecision {
            grant,
            new_balance,
            new_checkpoint: RewardCheckpoint {
                currency_balance: new_balance,
                last_award_date: if grant {
                    Some(today)
                } else {
                    checkpoint.last_award_date
                },
                current_goal: new_goal,
            },
            reset_streak: grant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_grant_when_goal_reached_and_never_awarded() {
        let evaluator = RewardEvaluator::new();
        let checkpoint = RewardCheckpoint {
            currency_balance: 10,
            last_award_date: None,
            current_goal: 5,
        };

        let decision = evaluator.evaluate(5, &checkpoint, date(2025, 2, 1));

        assert!(decision.grant);
        assert!(decision.reset_streak);
        assert_eq!(decision.new_balance, 15);
        assert_eq!(decision.new_checkpoint.currency_balance, 15);
        assert_eq!(decision.new_checkpoint.last_award_date, Some(date(2025, 2, 1)));
        assert!(decision.new_checkpoint.current_goal > 5);
    }

    #[test]
    fn test_same_day_second_evaluation_is_suppressed() {
        let evaluator = RewardEvaluator::new();
        let checkpoint = RewardCheckpoint {
            currency_balance: 10,
            last_award_date: Some(date(2025, 2, 1)),
            current_goal: 5,
        };

        let decision = evaluator.evaluate(5, &checkpoint, date(2025, 2, 1));

        assert!(!decision.grant);
        assert!(!decision.reset_streak);
        assert_eq!(decision.new_balance, 10);
        assert_eq!(decision.new_checkpoint.last_award_date, Some(date(2025, 2, 1)));
    }

    #[test]
    fn test_future_award_date_suppresses_grant() {
        // Clock skew: the stored award date is ahead of "today".
        let evaluator = RewardEvaluator::new();
        let checkpoint = RewardCheckpoint {
            currency_balance: 5,
            last_award_date: Some(date(2025, 2, 3)),
            current_goal: 1,
        };

        let decision = evaluator.evaluate(4, &checkpoint, date(2025, 2, 1));

        assert!(!decision.grant);
        assert_eq!(decision.new_balance, 5);
    }

    #[test]
    fn test_below_goal_no_grant_but_goal_grows() {
        let evaluator = RewardEvaluator::new();
        let checkpoint = RewardCheckpoint {
            currency_balance: 0,
            last_award_date: None,
            current_goal: 30,
        };

        let decision = evaluator.evaluate(3, &checkpoint, date(2025, 2, 1));

        assert!(!decision.grant);
        assert_eq!(decision.new_balance, 0);
        // 5 * (3 + 1) = 20 would lower the goal; it stays at 30.
        assert_eq!(decision.new_checkpoint.current_goal, 30);
    }

    #[test]
    fn test_goal_escalates_with_streak() {
        let evaluator = RewardEvaluator::new();
        let checkpoint = RewardCheckpoint {
            currency_balance: 0,
            last_award_date: None,
            current_goal: 10,
        };

        let decision = evaluator.evaluate(4, &checkpoint, date(2025, 2, 1));

        // 5 * (4 + 1) = 25 beats the previous goal of 10.
        assert_eq!(decision.new_checkpoint.current_goal, 25);
    }

    #[test]
    fn test_zero_streak_is_a_no_op() {
        let evaluator = RewardEvaluator::new();
        let checkpoint = RewardCheckpoint {
            currency_balance: 42,
            last_award_date: Some(date(2025, 1, 20)),
            current_goal: 15,
        };

        let decision = evaluator.evaluate(0, &checkpoint, date(2025, 2, 1));

        assert!(!decision.grant);
        assert!(!decision.reset_streak);
        assert_eq!(decision.new_checkpoint, checkpoint);
    }

    #[test]
    fn test_default_checkpoint_grants_on_first_day() {
        // Baseline goal is 1: the very first logged day earns a grant.
        let evaluator = RewardEvaluator::new();
        let decision = evaluator.evaluate(1, &RewardCheckpoint::default(), date(2025, 2, 1));

        assert!(decision.grant);
        assert_eq!(decision.new_balance, DEFAULT_AWARD_AMOUNT);
    }

    #[test]
    fn test_yesterday_award_permits_today() {
        let evaluator = RewardEvaluator::new();
        let checkpoint = RewardCheckpoint {
            currency_balance: 5,
            last_award_date: Some(date(2025, 1, 31)),
            current_goal: 2,
        };

        let decision = evaluator.evaluate(2, &checkpoint, date(2025, 2, 1));

        assert!(decision.grant);
        assert_eq!(decision.new_balance, 10);
    }

    #[test]
    fn test_custom_config_amounts() {
        let evaluator = RewardEvaluator::with_config(RewardConfig {
            award_amount: 12,
            goal_step: 3,
            baseline_goal: 2,
        });
        let checkpoint = evaluator.config().initial_checkpoint();
        assert_eq!(checkpoint.current_goal, 2);

        let decision = evaluator.evaluate(2, &checkpoint, date(2025, 2, 1));

        assert!(decision.grant);
        assert_eq!(decision.new_balance, 12);
        assert_eq!(decision.new_checkpoint.current_goal, 9); // 3 * (2 + 1)
    }

    #[test]
    fn test_goal_is_monotone_across_evaluations() {
        let evaluator = RewardEvaluator::new();
        let mut checkpoint = RewardCheckpoint::default();
        let mut previous_goal = checkpoint.current_goal;

        // Streak grows day by day, then collapses and regrows.
        let streaks = [1u32, 2, 3, 4, 5, 0, 1, 2];
        for (offset, streak) in streaks.iter().enumerate() {
            let today = date(2025, 3, 1) + chrono::Days::new(offset as u64);
            let decision = evaluator.evaluate(*streak, &checkpoint, today);
            assert!(decision.new_checkpoint.current_goal >= previous_goal);
            previous_goal = decision.new_checkpoint.current_goal;
            checkpoint = decision.new_checkpoint;
        }
    }

    #[test]
    fn test_extreme_inputs_saturate_instead_of_overflowing() {
        let evaluator = RewardEvaluator::new();
        let checkpoint = RewardCheckpoint {
            currency_balance: u64::MAX,
            last_award_date: None,
            current_goal: 1,
        };

        let decision = evaluator.evaluate(u32::MAX, &checkpoint, date(2025, 2, 1));

        assert!(decision.grant);
        assert_eq!(decision.new_balance, u64::MAX);
        assert_eq!(decision.new_checkpoint.current_goal, u32::MAX);
    }
}
