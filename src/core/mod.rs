//! Core business logic - the progress engine and the goal and record stores.

/// Goal store operations
pub mod goal;
/// Record partitioning around an interval window
pub mod interval;
/// Expected progress by linear interpolation
pub mod progress;
/// Record store operations
pub mod record;
/// Goal reports and running totals
pub mod report;
/// Moving goals onto their current interval
pub mod rollover;
/// Canonical instants and elapsed-time arithmetic
pub mod time;
