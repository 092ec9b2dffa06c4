//! Stash-box instance domain - DB queries for stash_box_instances
//!
//! Writes take `&mut SqliteConnection` so the statement and its read-back run
//! on the same transaction. Every write re-reads the row by id and returns
//! that row, never the input values. Reads use the generic Executor pattern
//! and work with both `&SqlitePool` and a transaction.

use sqlx::{Executor, Sqlite, SqliteConnection};

use crate::models::{NewStashBoxInstance, StashBoxInstance, StashBoxInstanceUpdate};
use crate::services::db;
use crate::services::error::StoreError;

macro_rules! instances_table {
    () => {
        "stash_box_instances"
    };
}

/// Table holding stash-box instance rows
pub const STASH_BOX_INSTANCES_TABLE: &str = instances_table!();

const SELECT_BY_ID: &str = concat!(
    "SELECT id, endpoint, api_key FROM ",
    instances_table!(),
    " WHERE id = ? LIMIT 1"
);

const SELECT_ALL: &str = concat!("SELECT id, endpoint, api_key FROM ", instances_table!());

const INSERT: &str = concat!(
    "INSERT INTO ",
    instances_table!(),
    " (endpoint, api_key) VALUES (?, ?)"
);

/// Get an instance by id
pub async fn find<'e, E>(executor: E, id: i64) -> Result<Option<StashBoxInstance>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(SELECT_BY_ID)
        .bind(id)
        .fetch_optional(executor)
        .await
}

async fn read_back(conn: &mut SqliteConnection, id: i64) -> Result<StashBoxInstance, StoreError> {
    sqlx::query_as(SELECT_BY_ID)
        .bind(id)
        .fetch_one(conn)
        .await
        .map_err(StoreError::ReadBack)
}

/// Insert a new instance and return the stored row
pub async fn insert(
    conn: &mut SqliteConnection,
    candidate: &NewStashBoxInstance,
) -> Result<StashBoxInstance, StoreError> {
    let result = sqlx::query(INSERT)
        .bind(&candidate.endpoint)
        .bind(&candidate.api_key)
        .execute(&mut *conn)
        .await
        .map_err(StoreError::Statement)?;

    read_back(conn, result.last_insert_rowid()).await
}

/// Overwrite the provided fields of an existing instance and return the
/// stored row. A missing id surfaces as a not-found read-back.
pub async fn update(
    conn: &mut SqliteConnection,
    update: &StashBoxInstanceUpdate,
) -> Result<StashBoxInstance, StoreError> {
    let id = update.id.get();
    let fields = [
        ("endpoint", update.endpoint.as_deref()),
        ("api_key", update.api_key.as_deref()),
    ];

    if let Some(mut query) = db::build_update(STASH_BOX_INSTANCES_TABLE, id, &fields) {
        let result = query
            .build()
            .execute(&mut *conn)
            .await
            .map_err(StoreError::Statement)?;

        if result.rows_affected() > 1 {
            return Err(StoreError::Statement(sqlx::Error::Protocol(format!(
                "update of instance {id} affected {} rows",
                result.rows_affected()
            ))));
        }
    }

    read_back(conn, id).await
}

/// Delete an instance. Deleting a missing id is not an error.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<(), StoreError> {
    db::delete_by_id(conn, STASH_BOX_INSTANCES_TABLE, id)
        .await
        .map_err(StoreError::Statement)?;

    Ok(())
}

/// List all instances in store order
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<StashBoxInstance>, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, StashBoxInstance>(SELECT_ALL)
        .fetch_all(executor)
        .await;

    match rows {
        Ok(instances) => Ok(instances),
        Err(sqlx::Error::RowNotFound) => Ok(Vec::new()),
        Err(e) => Err(StoreError::List(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstanceId;
    use crate::services::db::memory_pool;

    fn candidate(endpoint: &str, api_key: &str) -> NewStashBoxInstance {
        NewStashBoxInstance {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_returns_stored_row() {
        let pool = memory_pool().await;
        let mut tx = pool.begin().await.unwrap();

        let instance = insert(&mut *tx, &candidate("https://a", "k1")).await.unwrap();
        assert!(instance.id > 0);
        assert_eq!(instance.endpoint, "https://a");
        assert_eq!(instance.api_key, "k1");

        // Visible inside the transaction before commit
        let found = find(&mut *tx, instance.id).await.unwrap();
        assert_eq!(found, Some(instance));

        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_reflects_store_coercions() {
        let pool = memory_pool().await;
        sqlx::raw_sql(
            r#"
            CREATE TRIGGER normalize_endpoint AFTER INSERT ON stash_box_instances
            BEGIN
                UPDATE stash_box_instances SET endpoint = lower(endpoint) WHERE id = NEW.id;
            END;
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let mut tx = pool.begin().await.unwrap();
        let instance = insert(&mut *tx, &candidate("HTTPS://A.EXAMPLE", "k1")).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(instance.endpoint, "https://a.example");
    }

    #[tokio::test]
    async fn test_update_keeps_unspecified_fields() {
        let pool = memory_pool().await;
        let mut tx = pool.begin().await.unwrap();
        let created = insert(&mut *tx, &candidate("a", "k1")).await.unwrap();

        let updated = update(
            &mut *tx,
            &StashBoxInstanceUpdate {
                id: InstanceId::new(created.id).unwrap(),
                endpoint: None,
                api_key: Some("k2".to_string()),
            },
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.endpoint, "a");
        assert_eq!(updated.api_key, "k2");
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let pool = memory_pool().await;
        let mut tx = pool.begin().await.unwrap();

        let err = update(
            &mut *tx,
            &StashBoxInstanceUpdate {
                id: InstanceId::new(99).unwrap(),
                endpoint: Some("https://b".to_string()),
                api_key: None,
            },
        )
        .await
        .unwrap_err();

        assert!(err.is_not_found(), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn test_update_without_fields_only_reads_back() {
        let pool = memory_pool().await;
        let mut tx = pool.begin().await.unwrap();
        let created = insert(&mut *tx, &candidate("a", "k1")).await.unwrap();

        let unchanged = update(
            &mut *tx,
            &StashBoxInstanceUpdate {
                id: InstanceId::new(created.id).unwrap(),
                endpoint: Some(String::new()),
                api_key: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let pool = memory_pool().await;
        let mut tx = pool.begin().await.unwrap();
        let created = insert(&mut *tx, &candidate("a", "k1")).await.unwrap();

        delete(&mut *tx, created.id).await.unwrap();
        delete(&mut *tx, created.id).await.unwrap();
        assert_eq!(find(&mut *tx, created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_all_empty_table() {
        let pool = memory_pool().await;
        assert!(list_all(&pool).await.unwrap().is_empty());
    }
}
