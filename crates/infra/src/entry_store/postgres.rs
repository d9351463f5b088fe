//! Postgres-backed entry store implementation.
//!
//! Entries live in one table shared by every engine; each engine's rows are
//! scoped by its configured `name` (`db_name` column).
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | `PoolClosed`, `PoolTimedOut`, `Io`, `Tls`, `Configuration` | `Connection` |
//! | `ColumnDecode`, `Decode`, `ColumnNotFound` | `Serialization` |
//! | anything else during a read | `Read` |
//! | anything else during a write | `Write` |
//!
//! ## Atomicity
//!
//! A single upsert is one `INSERT ... ON CONFLICT DO UPDATE` statement, so a
//! row is always replaced as a unit. `upsert_many` runs every statement in one
//! transaction and commits once.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use sqlx::postgres::{PgExecutor, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};

use invdb_core::IndexRange;
use invdb_inventory::{Entry, InventoryDbConfig};

use super::r#trait::{EntryStore, StoreConnector, StoreError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS inventory_entries (
    db_name     TEXT        NOT NULL,
    entry_index BIGINT      NOT NULL,
    quantity    BIGINT      NOT NULL CHECK (quantity >= 0),
    attributes  JSONB       NOT NULL DEFAULT '{}'::jsonb,
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (db_name, entry_index)
)
"#;

const UPSERT: &str = r#"
INSERT INTO inventory_entries (db_name, entry_index, quantity, attributes)
VALUES ($1, $2, $3, $4)
ON CONFLICT (db_name, entry_index)
DO UPDATE SET
    quantity = EXCLUDED.quantity,
    attributes = EXCLUDED.attributes,
    updated_at = NOW()
"#;

/// Postgres-backed entry store.
///
/// Uses an SQLx connection pool, which is `Send + Sync`; the handle is cheap to
/// clone and share between requests.
#[derive(Debug, Clone)]
pub struct PostgresEntryStore {
    pool: Arc<PgPool>,
    db_name: String,
}

impl PostgresEntryStore {
    /// Wrap an existing pool. The table must already exist (see [`Self::ensure_schema`]).
    pub fn new(pool: PgPool, db_name: impl Into<String>) -> Self {
        Self {
            pool: Arc::new(pool),
            db_name: db_name.into(),
        }
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// Create the entries table if it does not exist yet.
    #[instrument(skip(self), fields(db_name = %self.db_name), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e, StoreError::Write))?;
        Ok(())
    }
}

async fn execute_upsert<'e, E>(executor: E, db_name: &str, entry: &Entry) -> Result<(), StoreError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(UPSERT)
        .bind(db_name)
        .bind(to_db_index(entry.index)?)
        .bind(entry.quantity)
        .bind(Json(&entry.attributes))
        .execute(executor)
        .await
        .map_err(|e| map_sqlx_error("upsert", e, StoreError::Write))?;
    Ok(())
}

#[async_trait]
impl EntryStore for PostgresEntryStore {
    #[instrument(skip(self), fields(db_name = %self.db_name), err)]
    async fn get(&self, index: u64) -> Result<Option<Entry>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT entry_index, quantity, attributes
            FROM inventory_entries
            WHERE db_name = $1 AND entry_index = $2
            "#,
        )
        .bind(self.db_name.as_str())
        .bind(to_db_index(index)?)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get", e, StoreError::Read))?;

        row.as_ref().map(row_to_entry).transpose()
    }

    #[instrument(skip(self, range), fields(db_name = %self.db_name, range = %range), err)]
    async fn get_range(&self, range: IndexRange) -> Result<Vec<Entry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT entry_index, quantity, attributes
            FROM inventory_entries
            WHERE db_name = $1 AND entry_index >= $2 AND entry_index < $3
            ORDER BY entry_index ASC
            "#,
        )
        .bind(self.db_name.as_str())
        .bind(to_db_index(range.start())?)
        .bind(to_db_index(range.end())?)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_range", e, StoreError::Read))?;

        rows.iter().map(row_to_entry).collect()
    }

    #[instrument(skip(self, entry), fields(db_name = %self.db_name, index = entry.index), err)]
    async fn upsert(&self, entry: Entry) -> Result<(), StoreError> {
        execute_upsert(&*self.pool, &self.db_name, &entry).await
    }

    #[instrument(skip(self, entries), fields(db_name = %self.db_name, count = entries.len()), err)]
    async fn upsert_many(&self, entries: Vec<Entry>) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e, StoreError::Write))?;

        for entry in &entries {
            execute_upsert(&mut *tx, &self.db_name, entry).await?;
        }

        // Dropping `tx` without commit rolls back, so an early return above
        // leaves the table untouched.
        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit", e, StoreError::Write))?;

        debug!("batch committed");
        Ok(())
    }
}

/// Opens a pool from `config.url()` and prepares the schema.
#[derive(Debug, Clone)]
pub struct PostgresConnector {
    max_connections: u32,
    acquire_timeout: Duration,
}

impl Default for PostgresConnector {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

impl PostgresConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

#[async_trait]
impl StoreConnector for PostgresConnector {
    type Store = PostgresEntryStore;

    #[instrument(skip(self, config), fields(db_name = %config.name()), err)]
    async fn connect(&self, config: &InventoryDbConfig) -> Result<Self::Store, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect(config.url())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = PostgresEntryStore::new(pool, config.name());
        store.ensure_schema().await?;
        Ok(store)
    }
}

fn to_db_index(index: u64) -> Result<i64, StoreError> {
    i64::try_from(index)
        .map_err(|_| StoreError::Serialization(format!("index {index} does not fit in BIGINT")))
}

fn row_to_entry(row: &PgRow) -> Result<Entry, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_row", e, StoreError::Read);

    let index: i64 = row.try_get("entry_index").map_err(decode)?;
    let quantity: i64 = row.try_get("quantity").map_err(decode)?;
    let Json(attributes): Json<Map<String, JsonValue>> = row.try_get("attributes").map_err(decode)?;

    let index = u64::try_from(index)
        .map_err(|_| StoreError::Serialization(format!("negative entry_index {index} in storage")))?;

    Ok(Entry {
        index,
        quantity,
        attributes,
    })
}

/// Map SQLx errors to `StoreError`; `fallback` picks Read or Write for the rest.
fn map_sqlx_error(operation: &str, err: sqlx::Error, fallback: fn(String) -> StoreError) -> StoreError {
    match err {
        sqlx::Error::PoolClosed => {
            StoreError::Connection(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Connection(format!("timed out acquiring a connection in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::Connection(format!("io error in {operation}: {e}")),
        sqlx::Error::Tls(e) => StoreError::Connection(format!("tls error in {operation}: {e}")),
        sqlx::Error::Configuration(e) => {
            StoreError::Connection(format!("configuration error in {operation}: {e}"))
        }
        sqlx::Error::ColumnDecode { index, source } => {
            StoreError::Serialization(format!("column {index} in {operation}: {source}"))
        }
        sqlx::Error::Decode(e) => StoreError::Serialization(format!("decode error in {operation}: {e}")),
        sqlx::Error::ColumnNotFound(name) => {
            StoreError::Serialization(format!("missing column {name} in {operation}"))
        }
        sqlx::Error::Database(db_err) => {
            fallback(format!("database error in {operation}: {}", db_err.message()))
        }
        other => fallback(format!("sqlx error in {operation}: {other}")),
    }
}
