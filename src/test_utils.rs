//! Shared test utilities for goal-buddy.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test goals and records with sensible defaults.
#![allow(clippy::unwrap_used)]

use crate::{
    config::goals::GoalConfig,
    core::{goal, record},
    errors::Result,
    models::{Goal, IntervalLength, NewGoal, NewRecord, Record},
};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a UTC instant.
pub fn utc(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec).unwrap()
}

/// Goal-creation input with sensible defaults.
///
/// # Defaults
/// * `interval_start_date`: 2023-11-13T00:00:00Z
/// * amounts: 0 → 100
/// * `interval_length`: 1 day, `bucket_size`: 1 hour
/// * `unit`: "units", `reset`: false
pub fn test_new_goal(name: &str) -> NewGoal {
    NewGoal {
        name: name.to_string(),
        interval_start_date: utc(2023, 11, 13, 0, 0, 0),
        interval_start_amount: 0.0,
        interval_target_amount: 100.0,
        interval_length: TimeDelta::days(1),
        bucket_size: TimeDelta::hours(1),
        unit: "units".to_string(),
        reset: false,
    }
}

/// An unsaved goal with the same defaults as [`test_new_goal`].
pub fn test_goal() -> Goal {
    let defaults = test_new_goal("Test Goal");
    Goal {
        id: Uuid::new_v4(),
        name: defaults.name,
        interval_start_date: defaults.interval_start_date,
        interval_start_amount: defaults.interval_start_amount,
        interval_target_amount: defaults.interval_target_amount,
        interval_length: IntervalLength::new(defaults.interval_length).unwrap(),
        bucket_size: defaults.bucket_size,
        unit: defaults.unit,
        reset: defaults.reset,
        created_date: defaults.interval_start_date,
    }
}

/// Seed configuration entry matching [`test_new_goal`].
pub fn test_goal_config(name: &str) -> GoalConfig {
    GoalConfig {
        name: name.to_string(),
        unit: "units".to_string(),
        interval_start_date: "2023-11-13T00:00:00Z".to_string(),
        interval_start_amount: 0.0,
        interval_target_amount: 100.0,
        interval_length_secs: 86_400,
        bucket_size_secs: Some(3600),
        reset: false,
    }
}

/// Creates a stored goal with the defaults of [`test_new_goal`].
pub async fn create_test_goal(db: &DatabaseConnection, name: &str) -> Result<Goal> {
    goal::create_goal(db, test_new_goal(name)).await
}

/// Creates a stored record.
pub async fn create_test_record(
    db: &DatabaseConnection,
    goal_id: Uuid,
    date: DateTime<Utc>,
    amount: f64,
) -> Result<Record> {
    record::create_record(
        db,
        NewRecord {
            goal_id,
            date,
            amount,
        },
    )
    .await
}

/// An unsaved record whose creation date equals its date.
pub fn make_record(goal_id: Uuid, date: DateTime<Utc>, amount: f64) -> Record {
    Record {
        id: Uuid::new_v4(),
        goal_id,
        date,
        amount,
        created_date: date,
    }
}

/// Sets up a test database with one goal named "Test Goal".
/// Returns (db, goal) for common test scenarios.
pub async fn setup_with_goal() -> Result<(DatabaseConnection, Goal)> {
    let db = setup_test_db().await?;
    let goal = create_test_goal(&db, "Test Goal").await?;
    Ok((db, goal))
}
