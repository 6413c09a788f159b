//! Report generation business logic.
//!
//! This module combines the expected progress of a goal with the partition of
//! its records for the current interval, and formats the result for display.
//! All functions are framework-agnostic and return structured data.

use crate::{
    core::{goal as goal_store, interval, record as record_store},
    errors::Result,
    models::{Goal, Progress},
};
use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::ConnectionTrait;
use tracing::debug;
use uuid::Uuid;

/// One point of a running total, covering a single display bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativePoint {
    /// Start of the bucket the point belongs to
    pub bucket_start: DateTime<Utc>,
    /// Date of the last record folded into this point
    pub date: DateTime<Utc>,
    /// Running total after that record
    pub total: f64,
}

/// Snapshot of a goal's progress in its current interval.
#[derive(Debug, Clone)]
pub struct GoalReport {
    /// The goal being reported on
    pub goal: Goal,
    /// Instant the report was generated for
    pub generated_at: DateTime<Utc>,
    /// Linearly interpolated amount expected at `generated_at`
    pub expected_amount: f64,
    /// Records of the current interval and the amount carried into it
    pub progress: Progress,
    /// Amount recorded so far (window only for resetting goals)
    pub recorded_amount: f64,
    /// Expected amount as a percentage of the interval target
    pub expected_percent: f64,
    /// Recorded amount as a percentage of the interval target
    pub recorded_percent: f64,
    /// Running totals per bucket
    pub series: Vec<CumulativePoint>,
}

/// A goal with its expected amount, as shown in goal listings.
#[derive(Debug, Clone)]
pub struct GoalSummary {
    /// The goal
    pub goal: Goal,
    /// Expected amount at the time of the listing
    pub expected_amount: f64,
}

fn bucket_start(
    date: DateTime<Utc>,
    anchor: DateTime<Utc>,
    bucket_size: TimeDelta,
) -> DateTime<Utc> {
    let bucket_ms = bucket_size.num_milliseconds();
    if bucket_ms <= 0 {
        return date;
    }
    let index = (date - anchor).num_milliseconds().div_euclid(bucket_ms);
    index
        .checked_mul(bucket_ms)
        .and_then(TimeDelta::try_milliseconds)
        .and_then(|offset| anchor.checked_add_signed(offset))
        .unwrap_or(date)
}

/// Builds running totals over the in-window records.
///
/// The total starts at `recorded_amount_at_start`. Records are grouped into
/// buckets of `bucket_size` anchored at `window_start`; within a bucket the
/// last record's running total wins. A non-positive bucket size groups only
/// records with identical dates.
#[must_use]
pub fn cumulative_series(
    progress: &Progress,
    window_start: DateTime<Utc>,
    bucket_size: TimeDelta,
) -> Vec<CumulativePoint> {
    let mut running = progress.recorded_amount_at_start;
    let mut points: Vec<CumulativePoint> = Vec::new();

    for record in &progress.records {
        running += record.amount;
        let point = CumulativePoint {
            bucket_start: bucket_start(record.date, window_start, bucket_size),
            date: record.date,
            total: running,
        };

        match points.last_mut() {
            Some(last) if last.bucket_start == point.bucket_start => *last = point,
            _ => points.push(point),
        }
    }

    points
}

/// Expresses `value` as a percentage of the way from `start` to `target`.
///
/// Returns 0 when start and target coincide.
#[must_use]
pub fn percent_of_target(value: f64, start: f64, target: f64) -> f64 {
    let span = target - start;
    if span.abs() < f64::EPSILON {
        return 0.0;
    }
    (value - start) * 100.0 / span
}

/// Generates a report for the goal's current interval at `now`.
///
/// The window is the goal's current interval, both ends inclusive; records
/// dated after it belong to later intervals and are left out. Resetting goals
/// count only the records inside the interval; accumulating goals also count
/// everything recorded before it.
pub async fn generate_goal_report<C>(
    db: &C,
    goal_id: Uuid,
    now: DateTime<Utc>,
) -> Result<GoalReport>
where
    C: ConnectionTrait,
{
    let goal = goal_store::get_goal(db, goal_id).await?;
    debug!("Generating report for goal '{}'", goal.name);

    let interval_end = goal
        .interval_start_date
        .checked_add_signed(goal.interval_length.as_duration());
    let records = record_store::get_records_for_goal(db, goal_id, None, interval_end).await?;
    let progress =
        interval::partition_records(goal_id, records, goal.interval_start_date, interval_end);

    let expected_amount = goal.expected_amount_at(now);
    let recorded_amount = if goal.reset {
        progress.window_total()
    } else {
        progress.recorded_total()
    };
    let expected_percent = percent_of_target(
        expected_amount,
        goal.interval_start_amount,
        goal.interval_target_amount,
    );
    let recorded_percent = percent_of_target(
        recorded_amount,
        goal.interval_start_amount,
        goal.interval_target_amount,
    );
    let series = cumulative_series(&progress, goal.interval_start_date, goal.bucket_size);

    Ok(GoalReport {
        goal,
        generated_at: now,
        expected_amount,
        progress,
        recorded_amount,
        expected_percent,
        recorded_percent,
        series,
    })
}

/// Lists every goal with its expected amount at `now`.
pub async fn summarize_goals<C>(db: &C, now: DateTime<Utc>) -> Result<Vec<GoalSummary>>
where
    C: ConnectionTrait,
{
    let goals = goal_store::get_goals(db).await?;
    Ok(goals
        .into_iter()
        .map(|goal| GoalSummary {
            expected_amount: goal.expected_amount_at(now),
            goal,
        })
        .collect())
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80%`
///
/// # Arguments
/// * `progress_percent` - Progress percentage (0-100, shown unclamped)
/// * `bar_length` - Length of the progress bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // Cast safety: clamped_progress ∈ [0, 100], length is small (10-20).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {progress_percent:.1}%")
}

/// Formats the goal listing, one line per goal with its expected amount.
#[must_use]
pub fn format_goal_summaries(summaries: &[GoalSummary]) -> String {
    let lines: Vec<String> = summaries
        .iter()
        .map(|summary| {
            format!(
                "{}: expected {:.2} / {:.2} {}",
                summary.goal.name,
                summary.expected_amount,
                summary.goal.interval_target_amount,
                summary.goal.unit
            )
        })
        .collect();
    format!("**Goals** ({})\n{}", summaries.len(), lines.join("\n"))
}

/// Formats a goal report as a few lines of text.
#[must_use]
pub fn format_goal_report(report: &GoalReport) -> String {
    let goal = &report.goal;
    let unit = &goal.unit;
    let mode = if goal.reset { "resets" } else { "accumulates" };

    format!(
        "**{}** ({mode})\n\
         Interval: {} → {:.2} {unit} from {:.2} {unit}\n\
         Expected: {:.2} {unit} {}\n\
         Recorded: {:.2} {unit} {}\n\
         Carried in: {:.2} {unit} | Records this interval: {}",
        goal.name,
        goal.interval_start_date.format("%Y-%m-%d %H:%M"),
        goal.interval_target_amount,
        goal.interval_start_amount,
        report.expected_amount,
        format_progress_bar(report.expected_percent, None),
        report.recorded_amount,
        format_progress_bar(report.recorded_percent, None),
        report.progress.recorded_amount_at_start,
        report.progress.records.len(),
    )
}
