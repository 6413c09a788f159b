//! Record business logic - Handles creating, fetching and deleting records.
//!
//! Records are only ever created against an existing goal. Dates arrive as
//! `DateTime<Utc>` and are stored unchanged; back-dated entries are valid.

use crate::{
    core::{goal as goal_store, time},
    entities::record,
    errors::{Error, Result},
    models::{NewRecord, Record},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Creates a record for an existing goal.
///
/// Fails with `ResourceNotFound` if the goal does not exist and with
/// `InvalidAmount` if the amount is NaN or infinite.
pub async fn create_record<C>(db: &C, new_record: NewRecord) -> Result<Record>
where
    C: ConnectionTrait,
{
    if !new_record.amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: new_record.amount,
        });
    }

    let goal = goal_store::get_goal(db, new_record.goal_id).await?;
    info!("Creating record for goal '{}'", goal.name);

    let record_model = record::ActiveModel {
        id: Set(Uuid::new_v4()),
        goal_id: Set(goal.id),
        date: Set(new_record.date),
        amount: Set(new_record.amount),
        created_date: Set(time::now()),
    };

    let created = record_model.insert(db).await?;
    Ok(Record::from(created))
}

/// Fetches a record by id, failing with `ResourceNotFound` if it does not exist.
pub async fn get_record<C>(db: &C, record_id: Uuid) -> Result<Record>
where
    C: ConnectionTrait,
{
    record::Entity::find_by_id(record_id)
        .one(db)
        .await?
        .map(Record::from)
        .ok_or_else(|| Error::record_not_found(record_id))
}

/// Retrieves every record of every goal, ordered by date.
pub async fn get_records<C>(db: &C) -> Result<Vec<Record>>
where
    C: ConnectionTrait,
{
    debug!("Getting records");
    let records = record::Entity::find()
        .order_by_asc(record::Column::Date)
        .order_by_asc(record::Column::CreatedDate)
        .all(db)
        .await?;
    Ok(records.into_iter().map(Record::from).collect())
}

/// Retrieves a goal's records, optionally limited to `[date_lower, date_upper]`.
///
/// The bounds are a pre-filter for the query only. Callers that need exact
/// window semantics must apply them again (see
/// [`crate::core::interval::partition_records`]). An unknown goal simply yields
/// no records.
pub async fn get_records_for_goal<C>(
    db: &C,
    goal_id: Uuid,
    date_lower: Option<DateTime<Utc>>,
    date_upper: Option<DateTime<Utc>>,
) -> Result<Vec<Record>>
where
    C: ConnectionTrait,
{
    let mut query = record::Entity::find().filter(record::Column::GoalId.eq(goal_id));
    if let Some(lower) = date_lower {
        query = query.filter(record::Column::Date.gte(lower));
    }
    if let Some(upper) = date_upper {
        query = query.filter(record::Column::Date.lte(upper));
    }

    let records = query
        .order_by_asc(record::Column::Date)
        .order_by_asc(record::Column::CreatedDate)
        .all(db)
        .await?;
    Ok(records.into_iter().map(Record::from).collect())
}

/// Deletes a record, failing with `ResourceNotFound` if it does not exist.
pub async fn delete_record<C>(db: &C, record_id: Uuid) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = record::Entity::find_by_id(record_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::record_not_found(record_id))?;

    match goal_store::get_goal(db, existing.goal_id).await {
        Ok(goal) => warn!("Deleting record for goal '{}'", goal.name),
        Err(Error::ResourceNotFound { .. }) => warn!("Deleting orphaned record {}", record_id),
        Err(e) => return Err(e),
    }

    existing.delete(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use crate::entities::goal;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn stored_record() -> record::Model {
        let date = utc(2023, 11, 13, 0, 0, 0);
        record::Model {
            id: Uuid::new_v4(),
            goal_id: Uuid::new_v4(),
            date,
            amount: 1.0,
            created_date: date,
        }
    }

    #[tokio::test]
    async fn test_create_record_rejects_non_finite_amounts() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = create_record(
                &db,
                NewRecord {
                    goal_id: Uuid::new_v4(),
                    date: utc(2023, 11, 13, 0, 0, 0),
                    amount,
                },
            )
            .await;
            assert!(matches!(result, Err(Error::InvalidAmount { amount: _ })));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_create_record_requires_goal() -> Result<()> {
        let db = setup_test_db().await?;
        let missing = Uuid::new_v4();

        let result = create_test_record(&db, missing, utc(2023, 11, 13, 0, 0, 0), 1.0).await;
        assert!(matches!(
            result,
            Err(Error::ResourceNotFound { resource: "Goal", id }) if id == missing
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_get_record_integration() -> Result<()> {
        let (db, goal) = setup_with_goal().await?;

        // Back-dated entries are accepted as-is
        let record = create_test_record(&db, goal.id, utc(2020, 1, 1, 8, 30, 0), -4.5).await?;
        assert_eq!(record.goal_id, goal.id);
        assert_eq!(record.amount, -4.5);
        assert_eq!(record.date, utc(2020, 1, 1, 8, 30, 0));

        let fetched = get_record(&db, record.id).await?;
        assert_eq!(fetched, record);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_record_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = get_record(&db, Uuid::new_v4()).await;
        assert!(matches!(
            result,
            Err(Error::ResourceNotFound {
                resource: "Record",
                ..
            })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_records_for_goal_bounds_and_order() -> Result<()> {
        let (db, goal) = setup_with_goal().await?;

        create_test_record(&db, goal.id, utc(2023, 11, 15, 0, 0, 0), 3.0).await?;
        create_test_record(&db, goal.id, utc(2023, 11, 13, 0, 0, 0), 1.0).await?;
        create_test_record(&db, goal.id, utc(2023, 11, 14, 0, 0, 0), 2.0).await?;

        let all = get_records_for_goal(&db, goal.id, None, None).await?;
        let amounts: Vec<f64> = all.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0]);

        let bounded = get_records_for_goal(
            &db,
            goal.id,
            Some(utc(2023, 11, 14, 0, 0, 0)),
            Some(utc(2023, 11, 14, 0, 0, 0)),
        )
        .await?;
        assert_eq!(bounded.len(), 1);
        assert_eq!(bounded[0].amount, 2.0);

        let unknown = get_records_for_goal(&db, Uuid::new_v4(), None, None).await?;
        assert!(unknown.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_records_spans_goals() -> Result<()> {
        let (db, goal) = setup_with_goal().await?;
        let other = create_test_goal(&db, "Other").await?;

        create_test_record(&db, goal.id, utc(2023, 11, 14, 0, 0, 0), 1.0).await?;
        create_test_record(&db, other.id, utc(2023, 11, 13, 0, 0, 0), 2.0).await?;

        let records = get_records(&db).await?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].goal_id, other.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_record() -> Result<()> {
        let (db, goal) = setup_with_goal().await?;
        let record = create_test_record(&db, goal.id, utc(2023, 11, 13, 0, 0, 0), 1.0).await?;

        delete_record(&db, record.id).await?;
        assert!(matches!(
            get_record(&db, record.id).await,
            Err(Error::ResourceNotFound { .. })
        ));

        let again = delete_record(&db, record.id).await;
        assert!(matches!(again, Err(Error::ResourceNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_orphaned_record() -> Result<()> {
        let existing = stored_record();
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![existing.clone()]])
            .append_query_results([Vec::<goal::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        delete_record(&db, existing.id).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_record_propagates_goal_lookup_failure() -> Result<()> {
        let existing = stored_record();
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![existing.clone()]])
            .append_query_errors([DbErr::Custom("connection lost".to_string())])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let result = delete_record(&db, existing.id).await;
        assert!(matches!(result, Err(Error::Database(_))));

        Ok(())
    }
}
