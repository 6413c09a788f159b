//! Goal entity - A numeric target accrued over a repeating interval.
//!
//! Durations are stored as whole seconds. Rows are decoded into the validated
//! [`crate::models::Goal`] type before any computation touches them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Goal database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    /// Unique identifier, assigned at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Display label (e.g., "Calories", "Running")
    pub name: String,
    /// Beginning of the currently tracked interval
    pub interval_start_date: DateTimeUtc,
    /// Amount expected at the start of the interval
    pub interval_start_amount: f64,
    /// Amount expected at the end of the interval
    pub interval_target_amount: f64,
    /// Length of one interval in seconds
    pub interval_length_secs: i64,
    /// Suggested display granularity in seconds
    pub bucket_size_secs: i64,
    /// Free-text unit label (e.g., "calories")
    pub unit: String,
    /// Whether accumulated progress resets at each new interval
    pub reset: bool,
    /// When the goal was created
    pub created_date: DateTimeUtc,
}

/// Defines relationships between Goal and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One goal has many records
    #[sea_orm(has_many = "super::record::Entity")]
    Records,
}

impl Related<super::record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
