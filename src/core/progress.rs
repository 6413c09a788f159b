//! Progress calculator - expected amount by linear interpolation.
//!
//! The expected amount moves in a straight line from the interval's start
//! amount to its target amount over the interval length. The fraction is not
//! clamped: before the interval starts it is negative and once the interval is
//! overdue it exceeds one, so callers can detect underrun and overrun.

use crate::{core::time, models::Goal, models::IntervalLength};
use chrono::{DateTime, Utc};

/// Fraction of the interval elapsed at `current_time` (unclamped).
#[must_use]
// Millisecond counts stay far below 2^53 for realistic intervals
#[allow(clippy::cast_precision_loss)]
pub fn interval_fraction(
    interval_start: DateTime<Utc>,
    interval_length: IntervalLength,
    current_time: DateTime<Utc>,
) -> f64 {
    let elapsed = time::elapsed(interval_start, current_time);
    elapsed.num_milliseconds() as f64 / interval_length.num_milliseconds() as f64
}

/// Computes the expected amount at `current_time`.
///
/// `start_amount + fraction * (end_amount - start_amount)` where `fraction` is
/// [`interval_fraction`]. Total over its inputs: `IntervalLength` can only hold
/// a positive duration.
#[must_use]
pub fn compute_progress(
    start_amount: f64,
    end_amount: f64,
    interval_start: DateTime<Utc>,
    interval_length: IntervalLength,
    current_time: DateTime<Utc>,
) -> f64 {
    let fraction = interval_fraction(interval_start, interval_length, current_time);
    fraction.mul_add(end_amount - start_amount, start_amount)
}

impl Goal {
    /// Expected amount for this goal's current interval at `current_time`.
    #[must_use]
    pub fn expected_amount_at(&self, current_time: DateTime<Utc>) -> f64 {
        compute_progress(
            self.interval_start_amount,
            self.interval_target_amount,
            self.interval_start_date,
            self.interval_length,
            current_time,
        )
    }
}
