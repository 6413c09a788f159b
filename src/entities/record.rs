//! Record entity - One dated contribution toward a goal.
//!
//! `date` is the instant the amount is attributed to and may be back-dated;
//! `created_date` is when the row was written.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Record database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "records")]
pub struct Model {
    /// Unique identifier for the record
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// ID of the goal this record contributes to
    pub goal_id: Uuid,
    /// Instant the contribution is attributed to
    pub date: DateTimeUtc,
    /// Contributed amount (may be negative)
    pub amount: f64,
    /// When the record was created
    pub created_date: DateTimeUtc,
}

/// Defines relationships between Record and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each record belongs to one goal and is removed with it
    #[sea_orm(
        belongs_to = "super::goal::Entity",
        from = "Column::GoalId",
        to = "super::goal::Column::Id",
        on_delete = "Cascade"
    )]
    Goal,
}

impl Related<super::goal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
