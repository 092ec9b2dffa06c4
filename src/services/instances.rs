//! Stash-box instance mutations with transaction management
//!
//! Each mutation runs exactly one store operation inside its own transaction:
//! begin, execute, then commit on success or roll back on failure. A failing
//! rollback is logged and dropped so the store error is what the caller sees.
//! A failing commit is reported as [`StoreError::Commit`] and means nothing
//! was persisted.
//!
//! Listing runs straight against the pool without a transaction.

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::domain::stash_box_instances;
use crate::models::{InstanceId, NewStashBoxInstance, StashBoxInstance, StashBoxInstanceUpdate};
use crate::services::error::StoreError;

#[derive(Debug, Clone)]
pub struct StashBoxInstances {
    pool: SqlitePool,
}

impl StashBoxInstances {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        input: NewStashBoxInstance,
    ) -> Result<StashBoxInstance, StoreError> {
        require_field("endpoint", &input.endpoint)?;
        require_field("api_key", &input.api_key)?;

        let mut tx = self.begin().await?;
        let outcome = stash_box_instances::insert(&mut *tx, &input).await;
        let instance = finish(tx, outcome).await?;

        tracing::info!(id = instance.id, "created stash-box instance");
        Ok(instance)
    }

    pub async fn update(
        &self,
        input: StashBoxInstanceUpdate,
    ) -> Result<StashBoxInstance, StoreError> {
        reject_blank("endpoint", input.endpoint.as_deref())?;
        reject_blank("api_key", input.api_key.as_deref())?;

        let mut tx = self.begin().await?;
        let outcome = stash_box_instances::update(&mut *tx, &input).await;
        let instance = finish(tx, outcome).await?;

        tracing::info!(id = instance.id, "updated stash-box instance");
        Ok(instance)
    }

    /// Delete an instance. Returns `true` even when the id did not exist.
    pub async fn destroy(&self, id: InstanceId) -> Result<bool, StoreError> {
        let mut tx = self.begin().await?;
        let outcome = stash_box_instances::delete(&mut *tx, id.get()).await;
        finish(tx, outcome).await?;

        tracing::info!(id = id.get(), "destroyed stash-box instance");
        Ok(true)
    }

    pub async fn list(&self) -> Result<Vec<StashBoxInstance>, StoreError> {
        stash_box_instances::list_all(&self.pool).await
    }

    pub async fn get(&self, id: InstanceId) -> Result<Option<StashBoxInstance>, StoreError> {
        stash_box_instances::find(&self.pool, id.get())
            .await
            .map_err(StoreError::List)
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>, StoreError> {
        self.pool.begin().await.map_err(StoreError::Begin)
    }
}

fn require_field(name: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidArgument(format!("{name} is required")));
    }
    Ok(())
}

/// An empty value means "leave unchanged"; whitespace-only is rejected the
/// same way `create` rejects it
fn reject_blank(name: &str, value: Option<&str>) -> Result<(), StoreError> {
    match value {
        Some(v) if !v.is_empty() => require_field(name, v),
        _ => Ok(()),
    }
}

/// Commit if the store operation succeeded, otherwise roll back and return
/// the store error unchanged
async fn finish<T>(
    tx: Transaction<'static, Sqlite>,
    outcome: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match outcome {
        Ok(value) => {
            tx.commit().await.map_err(StoreError::Commit)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "rollback after failed store operation");
            }
            Err(e)
        }
    }
}
