//! Database connection and statement utilities
//!
//! Domain functions use sqlx's generic Executor trait, which lets them accept
//! both `&SqlitePool` and `&mut SqliteConnection` (transactions).
//!
//! # Transaction Management
//!
//! The coordinator in [`crate::services::instances`] owns transaction
//! boundaries: it begins a transaction, runs exactly one domain write through
//! `&mut *tx`, then commits, or rolls back on failure.
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let instance = stash_box_instances::insert(&mut *tx, &candidate).await?;
//! tx.commit().await?;
//! ```

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteQueryResult};
use sqlx::{Executor, QueryBuilder, Sqlite};
use std::str::FromStr;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open a pool against `database_url` and bring the schema up to date
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!(max_connections, "database ready");

    Ok(pool)
}

/// Build `UPDATE <table> SET col = ?, ... WHERE id = ?` from an explicit
/// field list. Only fields that are present and non-empty are written.
///
/// Returns `None` when no field would be written.
pub fn build_update<'args>(
    table: &str,
    id: i64,
    fields: &[(&'static str, Option<&'args str>)],
) -> Option<QueryBuilder<'args, Sqlite>> {
    let present: Vec<(&'static str, &'args str)> = fields
        .iter()
        .filter_map(|(column, value)| match value {
            Some(v) if !v.is_empty() => Some((*column, *v)),
            _ => None,
        })
        .collect();

    if present.is_empty() {
        return None;
    }

    let mut builder = QueryBuilder::new(format!("UPDATE {table} SET "));
    let mut assignments = builder.separated(", ");
    for (column, value) in present {
        assignments.push(format!("{column} = "));
        assignments.push_bind_unseparated(value);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);

    Some(builder)
}

/// Delete the row with `id` from `table`.
///
/// The affected-row count is returned but not checked, so deleting a missing
/// id succeeds.
pub async fn delete_by_id<'e, E>(
    executor: E,
    table: &str,
    id: i64,
) -> Result<SqliteQueryResult, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("DELETE FROM {table} WHERE id = ?");
    sqlx::query(&sql).bind(id).execute(executor).await
}

/// Single-connection in-memory pool with migrations applied
#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");
    MIGRATOR.run(&pool).await.expect("run migrations");
    pool
}
