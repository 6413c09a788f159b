//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

/// Goals table
pub mod goal;
/// Records table
pub mod record;

// Re-export specific types to avoid conflicts
pub use goal::{Column as GoalColumn, Entity as Goal, Model as GoalModel};
pub use record::{Column as RecordColumn, Entity as Record, Model as RecordModel};
