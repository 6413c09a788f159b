//! Interval partitioner - splits a goal's records around a query window.
//!
//! Given every record of a goal and a window `[interval_start, interval_end]`
//! (end optional, both bounds inclusive), each record lands in exactly one
//! place:
//!
//! - dated after `interval_end`: skipped, counted nowhere
//! - dated strictly before `interval_start`: folded into the carried sum
//! - otherwise: returned in the window, ordered by date then creation date
//!
//! Input order is irrelevant. Records are sorted before anything is summed, so
//! shuffled input yields a bit-identical [`Progress`].

use crate::{
    core::{goal, record},
    errors::Result,
    models::{Progress, Record},
};
use chrono::{DateTime, Utc};
use sea_orm::ConnectionTrait;
use std::cmp::Ordering;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Three-way split of a record set around a window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Records dated strictly before the window start
    pub before: Vec<Record>,
    /// Records inside the window
    pub window: Vec<Record>,
    /// Records dated after the window end
    pub skipped: Vec<Record>,
}

impl Partition {
    /// Sum of the amounts dated before the window start.
    #[must_use]
    pub fn carried_sum(&self) -> f64 {
        self.before.iter().fold(0.0, |sum, r| sum + r.amount)
    }
}

/// Orders records by date, then creation date, then id.
fn chronological(a: &Record, b: &Record) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| a.created_date.cmp(&b.created_date))
        .then_with(|| a.id.cmp(&b.id))
}

/// Splits `records` into before / window / skipped, each chronologically ordered.
pub fn split_records<I>(
    records: I,
    interval_start: DateTime<Utc>,
    interval_end: Option<DateTime<Utc>>,
) -> Partition
where
    I: IntoIterator<Item = Record>,
{
    let mut sorted: Vec<Record> = records.into_iter().collect();
    sorted.sort_by(chronological);

    let mut partition = Partition::default();
    for record in sorted {
        if interval_end.is_some_and(|end| record.date > end) {
            partition.skipped.push(record);
        } else if record.date < interval_start {
            partition.before.push(record);
        } else {
            partition.window.push(record);
        }
    }
    partition
}

/// Partitions a goal's records into a [`Progress`] for the given window.
///
/// The records are assumed to belong to `goal_id`; nothing here checks that
/// the goal exists. An empty record set yields an empty window and a carried
/// sum of zero.
pub fn partition_records<I>(
    goal_id: Uuid,
    records: I,
    interval_start: DateTime<Utc>,
    interval_end: Option<DateTime<Utc>>,
) -> Progress
where
    I: IntoIterator<Item = Record>,
{
    let partition = split_records(records, interval_start, interval_end);
    let recorded_amount_at_start = partition.carried_sum();

    Progress {
        goal_id,
        records: partition.window,
        recorded_amount_at_start,
    }
}

/// Fetches a goal's records and partitions them around the window.
///
/// Fails with `ResourceNotFound` when the goal does not exist. The store's own
/// date filtering is only used as a pre-filter; the window rules are applied
/// here regardless.
#[instrument(skip(db))]
pub async fn get_progress_for_goal<C>(
    db: &C,
    goal_id: Uuid,
    interval_start: DateTime<Utc>,
    interval_end: Option<DateTime<Utc>>,
) -> Result<Progress>
where
    C: ConnectionTrait,
{
    let goal = goal::get_goal(db, goal_id).await?;
    debug!("Getting progress for goal '{}'", goal.name);

    let records = record::get_records_for_goal(db, goal_id, None, interval_end).await?;
    Ok(partition_records(
        goal_id,
        records,
        interval_start,
        interval_end,
    ))
}
