//! Interval rollover business logic
//!
//! Moves goals whose interval has elapsed onto the interval containing "now".
//! The goal's `reset` flag decides what happens to its amounts:
//!
//! - resetting goals keep their start and target amounts, so every interval is
//!   tracked from scratch
//! - accumulating goals shift both amounts by the per-interval span once per
//!   elapsed interval, so the expected-progress line continues without a jump
//!
//! The calculations are pure; [`process_interval_rollovers`] applies them to
//! every stored goal inside one database transaction.

use crate::{
    core::time,
    entities::goal,
    errors::Result,
    models::{Goal, IntervalLength},
};
use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};
use uuid::Uuid;

/// New interval position for a goal after rolling over.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalAdvance {
    /// Whole intervals that elapsed since the old start
    pub intervals_elapsed: i64,
    /// Start of the interval containing "now"
    pub interval_start_date: DateTime<Utc>,
    /// Start amount for that interval
    pub interval_start_amount: f64,
    /// Target amount for that interval
    pub interval_target_amount: f64,
}

/// Result of rolling over a single goal.
#[derive(Debug, Clone)]
pub struct GoalRolloverResult {
    /// Goal that was rolled over
    pub goal_id: Uuid,
    /// Its name
    pub goal_name: String,
    /// Interval start before the rollover
    pub old_start: DateTime<Utc>,
    /// The applied advance
    pub advance: IntervalAdvance,
    /// Whether the goal resets each interval
    pub reset: bool,
}

/// Result of processing rollovers for all goals.
#[derive(Debug, Clone)]
pub struct RolloverResult {
    /// Goals that moved to a new interval
    pub rolled_goals: Vec<GoalRolloverResult>,
    /// Total number of goals examined
    pub total_goals_processed: usize,
    /// Rolled goals that reset their amounts
    pub reset_count: usize,
    /// Rolled goals that carried their amounts forward
    pub carried_count: usize,
    /// Instant the rollover was evaluated at
    pub processed_at: DateTime<Utc>,
}

/// Number of whole intervals between `interval_start` and `now` (zero if `now`
/// is before the start or still inside the first interval).
#[must_use]
pub fn elapsed_intervals(
    interval_start: DateTime<Utc>,
    interval_length: IntervalLength,
    now: DateTime<Utc>,
) -> i64 {
    let elapsed_ms = time::elapsed(interval_start, now).num_milliseconds();
    if elapsed_ms <= 0 {
        return 0;
    }
    elapsed_ms / interval_length.num_milliseconds()
}

/// Start of the interval that contains `now`.
///
/// Returns `interval_start` unchanged if `now` precedes it, and `None` only if
/// the result would overflow the representable date range.
#[must_use]
pub fn current_interval_start(
    interval_start: DateTime<Utc>,
    interval_length: IntervalLength,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let intervals = elapsed_intervals(interval_start, interval_length, now);
    let shift = interval_length
        .num_milliseconds()
        .checked_mul(intervals)
        .and_then(TimeDelta::try_milliseconds)?;
    interval_start.checked_add_signed(shift)
}

/// Computes where `goal` should be at `now`, or `None` if no full interval has
/// elapsed yet.
#[must_use]
#[allow(clippy::cast_precision_loss)] // interval counts are tiny compared to 2^53
pub fn advance_interval(goal: &Goal, now: DateTime<Utc>) -> Option<IntervalAdvance> {
    let intervals_elapsed =
        elapsed_intervals(goal.interval_start_date, goal.interval_length, now);
    if intervals_elapsed == 0 {
        return None;
    }

    let interval_start_date =
        current_interval_start(goal.interval_start_date, goal.interval_length, now)?;

    let (interval_start_amount, interval_target_amount) = if goal.reset {
        (goal.interval_start_amount, goal.interval_target_amount)
    } else {
        let span = goal.interval_target_amount - goal.interval_start_amount;
        let shift = intervals_elapsed as f64;
        (
            shift.mul_add(span, goal.interval_start_amount),
            shift.mul_add(span, goal.interval_target_amount),
        )
    };

    Some(IntervalAdvance {
        intervals_elapsed,
        interval_start_date,
        interval_start_amount,
        interval_target_amount,
    })
}

/// Rolls every goal whose interval has elapsed onto its current interval.
///
/// All updates succeed or fail together.
#[instrument(skip(db))]
pub async fn process_interval_rollovers(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
) -> Result<RolloverResult> {
    let txn = db.begin().await?;

    let models = goal::Entity::find().all(&txn).await?;
    let total_goals_processed = models.len();
    let mut rolled_goals = Vec::new();
    let mut reset_count = 0;
    let mut carried_count = 0;

    for model in models {
        let current = Goal::try_from(model.clone())?;
        let Some(advance) = advance_interval(&current, now) else {
            continue;
        };

        let mut active_model: goal::ActiveModel = model.into();
        active_model.interval_start_date = Set(advance.interval_start_date);
        active_model.interval_start_amount = Set(advance.interval_start_amount);
        active_model.interval_target_amount = Set(advance.interval_target_amount);
        active_model.update(&txn).await?;

        if current.reset {
            reset_count += 1;
        } else {
            carried_count += 1;
        }

        rolled_goals.push(GoalRolloverResult {
            goal_id: current.id,
            goal_name: current.name,
            old_start: current.interval_start_date,
            advance,
            reset: current.reset,
        });
    }

    txn.commit().await?;

    if !rolled_goals.is_empty() {
        info!(
            "Rolled {} of {} goal(s) onto their current interval",
            rolled_goals.len(),
            total_goals_processed
        );
    }

    Ok(RolloverResult {
        rolled_goals,
        total_goals_processed,
        reset_count,
        carried_count,
        processed_at: now,
    })
}

/// Formats a rollover result into a human-readable summary string.
#[must_use]
pub fn format_rollover_summary(result: &RolloverResult) -> String {
    let mut summary = format!(
        "Interval Rollover - {} - Processed {} goals\n  Reset: {} goals | Carried: {} goals\n",
        result.processed_at.format("%Y-%m-%d %H:%M UTC"),
        result.total_goals_processed,
        result.reset_count,
        result.carried_count
    );

    for rolled in &result.rolled_goals {
        let change_type = if rolled.reset { "Reset" } else { "Carried" };
        summary.push_str(&format!(
            "  {} - {} | {} → {} ({} interval(s)) | {:.2} → {:.2}\n",
            rolled.goal_name,
            change_type,
            rolled.old_start.format("%Y-%m-%d %H:%M"),
            rolled.advance.interval_start_date.format("%Y-%m-%d %H:%M"),
            rolled.advance.intervals_elapsed,
            rolled.advance.interval_start_amount,
            rolled.advance.interval_target_amount
        ));
    }

    summary
}
