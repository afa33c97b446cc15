//! SQLite dataset store
//!
//! Read-only access to one dataset file. The pool connects lazily, so a
//! missing file is reported per call rather than at startup. Each lookup
//! acquires one connection, runs exactly one query and hands the
//! connection back when the guard drops, on success and error alike.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, Sqlite, SqlitePool};
use tracing::log::LevelFilter;

use crate::core::constants::{
    SQLITE_ACQUIRE_TIMEOUT_SECS, SQLITE_BUSY_TIMEOUT_SECS, SQLITE_IDLE_TIMEOUT_SECS,
};
use crate::data::Dataset;
use crate::data::error::DataError;
use crate::data::query::{BindValue, QueryPlan};
use crate::data::record::{self, Record};

pub struct SqliteStore {
    dataset: Dataset,
    path: PathBuf,
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a store for `path` without touching the file
    pub fn open(dataset: Dataset, path: &Path, max_connections: u32) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false)
            .read_only(true)
            .busy_timeout(Duration::from_secs(SQLITE_BUSY_TIMEOUT_SECS))
            .log_statements(LevelFilter::Trace);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .min_connections(0)
            .acquire_timeout(Duration::from_secs(SQLITE_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(Duration::from_secs(SQLITE_IDLE_TIMEOUT_SECS))
            .connect_lazy_with(options);

        tracing::debug!(dataset = %dataset, path = %path.display(), "SqliteStore created");
        Self {
            dataset,
            path: path.to_path_buf(),
            pool,
        }
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the plan and materialize every row
    pub async fn fetch_all(&self, plan: &QueryPlan) -> Result<Vec<Record>, DataError> {
        let mut conn = self.acquire().await?;
        let rows = bind_plan(plan).fetch_all(&mut *conn).await?;
        tracing::trace!(dataset = %self.dataset, rows = rows.len(), "Query complete");
        record::to_records(&rows)
    }

    /// Run the plan and materialize the first row, if any
    pub async fn fetch_optional(&self, plan: &QueryPlan) -> Result<Option<Record>, DataError> {
        let mut conn = self.acquire().await?;
        let row = bind_plan(plan).fetch_optional(&mut *conn).await?;
        tracing::trace!(dataset = %self.dataset, found = row.is_some(), "Query complete");
        record::to_record(row.as_ref())
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!(dataset = %self.dataset, "SQLite pool closed");
    }

    async fn acquire(&self) -> Result<PoolConnection<Sqlite>, DataError> {
        if !self.path.is_file() {
            return Err(DataError::store_unavailable(
                self.dataset.as_str(),
                format!("{} does not exist", self.path.display()),
            ));
        }
        self.pool.acquire().await.map_err(|e| {
            if DataError::is_connect_error(&e) {
                DataError::store_unavailable(self.dataset.as_str(), e.to_string())
            } else {
                DataError::Query(e)
            }
        })
    }
}

fn bind_plan(plan: &QueryPlan) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    plan.params()
        .iter()
        .fold(sqlx::query(plan.sql()), |query, param| match param {
            BindValue::Text(s) => query.bind(s.as_str()),
            BindValue::Integer(n) => query.bind(*n),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::query::{FilterSpec, Matcher, build};
    use crate::data::test_support::{self, FixtureDir};

    fn world(fixture: &FixtureDir) -> SqliteStore {
        SqliteStore::open(Dataset::World, &fixture.world_path(), 2)
    }

    #[tokio::test]
    async fn test_fetch_all_unfiltered_respects_limit() {
        let fixture = test_support::fixture().await;
        let store = world(&fixture);

        let plan = build("countries", &[], &FilterSpec::new(), 5, None).unwrap();
        let records = store.fetch_all(&plan).await.unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0]["name"], "Afghanistan");
    }

    #[tokio::test]
    async fn test_fetch_optional_absent() {
        let fixture = test_support::fixture().await;
        let store = world(&fixture);

        let filters = FilterSpec::new().with(Matcher::Exact("iso2"), Some("ZZ"));
        let plan = build("countries", &[], &filters, 1, None).unwrap();
        assert!(store.fetch_optional(&plan).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(Dataset::World, &dir.path().join("world.db"), 1);

        let plan = build("countries", &[], &FilterSpec::new(), 1, None).unwrap();
        let err = store.fetch_all(&plan).await.unwrap_err();
        assert!(matches!(err, DataError::StoreUnavailable { dataset: "world", .. }));
        assert!(!dir.path().join("world.db").exists());
    }

    #[tokio::test]
    async fn test_bad_table_is_query_error() {
        let fixture = test_support::fixture().await;
        let store = world(&fixture);

        let plan = build("no_such_table", &[], &FilterSpec::new(), 1, None).unwrap();
        let err = store.fetch_all(&plan).await.unwrap_err();
        assert!(matches!(err, DataError::Query(_)));
    }

    #[tokio::test]
    async fn test_connection_released_after_error() {
        let fixture = test_support::fixture().await;
        let store = SqliteStore::open(Dataset::World, &fixture.world_path(), 1);

        let bad = build("no_such_table", &[], &FilterSpec::new(), 1, None).unwrap();
        let good = build("countries", &[], &FilterSpec::new(), 1, None).unwrap();

        for _ in 0..3 {
            assert!(store.fetch_all(&bad).await.is_err());
            assert_eq!(store.fetch_all(&good).await.unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_store_is_read_only() {
        let fixture = test_support::fixture().await;
        let store = world(&fixture);

        let mut conn = store.acquire().await.unwrap();
        let result = sqlx::query("DELETE FROM countries")
            .execute(&mut *conn)
            .await;
        assert!(result.is_err());
    }
}
