//! Goal business logic - Handles all goal-related store operations.
//!
//! Provides functions for creating, retrieving, updating, deleting and seeding
//! goals. Input is validated here, at the store boundary, and rows are decoded
//! into [`Goal`] before being handed back, so the progress engine only ever sees
//! goals with a positive interval length.

use crate::{
    config::goals::GoalConfig,
    core::time,
    entities::{goal, record},
    errors::{Error, Result},
    models::{Goal, IntervalLength, NewGoal},
};
use chrono::TimeDelta;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, warn};
use uuid::Uuid;

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: "Goal name cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn validate_amount(amount: f64) -> Result<f64> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount { amount })
    }
}

/// Converts a duration to the whole seconds that get stored, rejecting
/// anything shorter than one second.
fn stored_seconds(length: TimeDelta) -> Result<i64> {
    let seconds = length.num_seconds();
    IntervalLength::from_secs(seconds)?;
    Ok(seconds)
}

/// Creates a new goal after validating its definition.
///
/// The name is trimmed and must not be empty, both amounts must be finite, and
/// the interval length and bucket size must be at least one second (durations
/// are stored as whole seconds). The store assigns the id and creation date.
pub async fn create_goal<C>(db: &C, new_goal: NewGoal) -> Result<Goal>
where
    C: ConnectionTrait,
{
    let name = validate_name(&new_goal.name)?;
    let start_amount = validate_amount(new_goal.interval_start_amount)?;
    let target_amount = validate_amount(new_goal.interval_target_amount)?;
    let interval_length_secs = stored_seconds(new_goal.interval_length)?;
    let bucket_size_secs = stored_seconds(new_goal.bucket_size)?;

    let goal_model = goal::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        interval_start_date: Set(new_goal.interval_start_date),
        interval_start_amount: Set(start_amount),
        interval_target_amount: Set(target_amount),
        interval_length_secs: Set(interval_length_secs),
        bucket_size_secs: Set(bucket_size_secs),
        unit: Set(new_goal.unit),
        reset: Set(new_goal.reset),
        created_date: Set(time::now()),
    };

    let created = goal_model.insert(db).await?;
    info!("Created goal '{}'", created.name);
    Goal::try_from(created)
}

/// Fetches a goal by id, failing with `ResourceNotFound` if it does not exist.
pub async fn get_goal<C>(db: &C, goal_id: Uuid) -> Result<Goal>
where
    C: ConnectionTrait,
{
    goal::Entity::find_by_id(goal_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::goal_not_found(goal_id))
        .and_then(Goal::try_from)
}

/// Retrieves all goals, oldest first.
pub async fn get_goals<C>(db: &C) -> Result<Vec<Goal>>
where
    C: ConnectionTrait,
{
    goal::Entity::find()
        .order_by_asc(goal::Column::CreatedDate)
        .all(db)
        .await?
        .into_iter()
        .map(Goal::try_from)
        .collect()
}

/// Finds a goal by its exact (trimmed) name.
pub async fn find_goal_by_name<C>(db: &C, name: &str) -> Result<Option<Goal>>
where
    C: ConnectionTrait,
{
    goal::Entity::find()
        .filter(goal::Column::Name.eq(name.trim()))
        .one(db)
        .await?
        .map(Goal::try_from)
        .transpose()
}

/// Overwrites a goal's definition.
///
/// Every field except `id` and `created_date` is taken from `updated`; the
/// stored creation date is kept. Fails with `ResourceNotFound` if the goal does
/// not exist.
pub async fn update_goal<C>(db: &C, updated: Goal) -> Result<Goal>
where
    C: ConnectionTrait,
{
    let name = validate_name(&updated.name)?;
    let start_amount = validate_amount(updated.interval_start_amount)?;
    let target_amount = validate_amount(updated.interval_target_amount)?;
    let interval_length_secs = stored_seconds(updated.interval_length.as_duration())?;
    let bucket_size_secs = stored_seconds(updated.bucket_size)?;

    let existing = goal::Entity::find_by_id(updated.id)
        .one(db)
        .await?
        .ok_or_else(|| Error::goal_not_found(updated.id))?;

    let mut active_model: goal::ActiveModel = existing.into();
    active_model.name = Set(name);
    active_model.interval_start_date = Set(updated.interval_start_date);
    active_model.interval_start_amount = Set(start_amount);
    active_model.interval_target_amount = Set(target_amount);
    active_model.interval_length_secs = Set(interval_length_secs);
    active_model.bucket_size_secs = Set(bucket_size_secs);
    active_model.unit = Set(updated.unit);
    active_model.reset = Set(updated.reset);

    let saved = active_model.update(db).await?;
    debug!("Updated goal '{}'", saved.name);
    Goal::try_from(saved)
}

/// Deletes a goal together with all of its records.
///
/// Both deletes run in one database transaction. Fails with
/// `ResourceNotFound` if the goal does not exist.
pub async fn delete_goal(db: &DatabaseConnection, goal_id: Uuid) -> Result<()> {
    let txn = db.begin().await?;

    let existing = goal::Entity::find_by_id(goal_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::goal_not_found(goal_id))?;

    let removed = record::Entity::delete_many()
        .filter(record::Column::GoalId.eq(goal_id))
        .exec(&txn)
        .await?;

    goal::Entity::delete_by_id(goal_id).exec(&txn).await?;
    txn.commit().await?;

    warn!(
        "Deleted goal '{}' and {} record(s)",
        existing.name, removed.rows_affected
    );
    Ok(())
}

/// Creates every configured goal whose name is not already taken.
///
/// Returns the number of goals created.
pub async fn seed_goals<C>(db: &C, configs: &[GoalConfig]) -> Result<usize>
where
    C: ConnectionTrait,
{
    let mut created = 0;
    for config in configs {
        if find_goal_by_name(db, &config.name).await?.is_some() {
            debug!("Goal '{}' already exists, skipping seed", config.name);
            continue;
        }
        create_goal(db, config.to_new_goal()?).await?;
        created += 1;
    }
    Ok(created)
}
