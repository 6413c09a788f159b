//! Domain types shared by the stores and the progress engine.
//!
//! Database rows ([`crate::entities`]) are decoded into these types at the store
//! boundary. Once a [`Goal`] exists its interval length is known to be positive,
//! so nothing downstream has to check it again.

use crate::{
    entities::{goal, record},
    errors::{Error, Result},
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Length of one goal interval, guaranteed to be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IntervalLength(TimeDelta);

impl IntervalLength {
    /// Wraps a duration, rejecting zero and negative lengths.
    ///
    /// Lengths shorter than one millisecond are rejected as well, since
    /// interpolation works at millisecond resolution.
    pub fn new(length: TimeDelta) -> Result<Self> {
        if length.num_milliseconds() <= 0 {
            return Err(Error::InvalidInterval {
                seconds: length.num_seconds(),
            });
        }
        Ok(Self(length))
    }

    /// Builds an interval length from whole seconds.
    pub fn from_secs(seconds: i64) -> Result<Self> {
        TimeDelta::try_seconds(seconds)
            .ok_or(Error::InvalidInterval { seconds })
            .and_then(Self::new)
    }

    /// The wrapped duration.
    #[must_use]
    pub const fn as_duration(self) -> TimeDelta {
        self.0
    }

    /// Whole seconds in the interval.
    #[must_use]
    pub fn num_seconds(self) -> i64 {
        self.0.num_seconds()
    }

    /// Milliseconds in the interval, always greater than zero.
    #[must_use]
    pub fn num_milliseconds(self) -> i64 {
        self.0.num_milliseconds()
    }
}

impl TryFrom<TimeDelta> for IntervalLength {
    type Error = Error;

    fn try_from(length: TimeDelta) -> Result<Self> {
        Self::new(length)
    }
}

/// A validated goal.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    /// Unique identifier
    pub id: Uuid,
    /// Display label
    pub name: String,
    /// Beginning of the current interval
    pub interval_start_date: DateTime<Utc>,
    /// Amount expected when the interval starts
    pub interval_start_amount: f64,
    /// Amount expected when the interval ends
    pub interval_target_amount: f64,
    /// How long one interval lasts
    pub interval_length: IntervalLength,
    /// Advisory display granularity
    pub bucket_size: TimeDelta,
    /// Unit label
    pub unit: String,
    /// Whether progress resets at each new interval
    pub reset: bool,
    /// When the goal was created
    pub created_date: DateTime<Utc>,
}

impl TryFrom<goal::Model> for Goal {
    type Error = Error;

    fn try_from(model: goal::Model) -> Result<Self> {
        let interval_length = IntervalLength::from_secs(model.interval_length_secs)?;
        let bucket_size = TimeDelta::try_seconds(model.bucket_size_secs).ok_or(
            Error::InvalidInterval {
                seconds: model.bucket_size_secs,
            },
        )?;

        Ok(Self {
            id: model.id,
            name: model.name,
            interval_start_date: model.interval_start_date,
            interval_start_amount: model.interval_start_amount,
            interval_target_amount: model.interval_target_amount,
            interval_length,
            bucket_size,
            unit: model.unit,
            reset: model.reset,
            created_date: model.created_date,
        })
    }
}

/// Input for creating a goal. The store assigns `id` and `created_date`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    /// Display label, trimmed before storage
    pub name: String,
    /// Beginning of the first interval
    pub interval_start_date: DateTime<Utc>,
    /// Amount expected when the interval starts
    pub interval_start_amount: f64,
    /// Amount expected when the interval ends
    pub interval_target_amount: f64,
    /// How long one interval lasts (whole seconds, at least one)
    pub interval_length: TimeDelta,
    /// Advisory display granularity (whole seconds, at least one)
    pub bucket_size: TimeDelta,
    /// Unit label
    pub unit: String,
    /// Whether progress resets at each new interval
    pub reset: bool,
}

/// One dated contribution toward a goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Unique identifier
    pub id: Uuid,
    /// Goal this record contributes to
    pub goal_id: Uuid,
    /// Instant the amount is attributed to
    pub date: DateTime<Utc>,
    /// Contributed amount
    pub amount: f64,
    /// When the record was created
    pub created_date: DateTime<Utc>,
}

impl From<record::Model> for Record {
    fn from(model: record::Model) -> Self {
        Self {
            id: model.id,
            goal_id: model.goal_id,
            date: model.date,
            amount: model.amount,
            created_date: model.created_date,
        }
    }
}

/// Input for creating a record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// Goal the record contributes to; must exist
    pub goal_id: Uuid,
    /// Instant the amount is attributed to
    pub date: DateTime<Utc>,
    /// Contributed amount
    pub amount: f64,
}

/// Records of one goal partitioned around an interval window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    /// Goal the result belongs to
    pub goal_id: Uuid,
    /// In-window records ordered by date, then creation date
    pub records: Vec<Record>,
    /// Sum of every amount dated strictly before the window start
    pub recorded_amount_at_start: f64,
}

impl Progress {
    /// Sum of the in-window amounts.
    #[must_use]
    pub fn window_total(&self) -> f64 {
        self.records.iter().map(|r| r.amount).sum()
    }

    /// Carried sum plus the in-window amounts.
    #[must_use]
    pub fn recorded_total(&self) -> f64 {
        self.recorded_amount_at_start + self.window_total()
    }
}
