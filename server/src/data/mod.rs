//! Data access layer
//!
//! - `query` - filter query builder and the lookup operation table
//! - `record` - row materialization into column-keyed records
//! - `sqlite` - read-only SQLite dataset stores
//! - `error` - error type for the data layer
//!
//! `DatasetService` ties them together: it resolves an operation, plans
//! the query, and runs it against the dataset the operation targets.

pub mod error;
pub mod query;
pub mod record;
pub mod sqlite;

pub use error::DataError;
pub use query::{LookupArgs, Operation, Shape};
pub use record::Record;
pub use sqlite::SqliteStore;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::constants::{COMMUNITY_DB_FILENAME, WORLD_DB_FILENAME};

/// A local reference dataset (one SQLite file each)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// countries, cities, states
    World,
    /// chatters
    Community,
}

impl Dataset {
    pub const fn all() -> &'static [Dataset] {
        &[Dataset::World, Dataset::Community]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Dataset::World => "world",
            Dataset::Community => "community",
        }
    }

    pub const fn file_name(&self) -> &'static str {
        match self {
            Dataset::World => WORLD_DB_FILENAME,
            Dataset::Community => COMMUNITY_DB_FILENAME,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a lookup; serializes as an array, a record, or null
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Lookup {
    Many(Vec<Record>),
    One(Option<Record>),
}

/// Dataset service
///
/// Holds one store per dataset, located under the configured directory.
pub struct DatasetService {
    data_dir: PathBuf,
    world: SqliteStore,
    community: SqliteStore,
}

impl DatasetService {
    pub fn init(data_dir: &Path, max_connections: u32) -> Self {
        let open = |dataset: Dataset| {
            SqliteStore::open(dataset, &data_dir.join(dataset.file_name()), max_connections)
        };
        let service = Self {
            data_dir: data_dir.to_path_buf(),
            world: open(Dataset::World),
            community: open(Dataset::Community),
        };
        tracing::debug!(data_dir = %data_dir.display(), "DatasetService initialized");
        service
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn store(&self, dataset: Dataset) -> &SqliteStore {
        match dataset {
            Dataset::World => &self.world,
            Dataset::Community => &self.community,
        }
    }

    /// Run the named lookup operation
    pub async fn run(&self, name: &str, args: &LookupArgs) -> Result<Lookup, DataError> {
        let op = query::operations::find(name)?;
        self.execute(op, args).await
    }

    /// Plan and execute `op`. Invalid arguments fail before the store is touched.
    pub async fn execute(&self, op: &Operation, args: &LookupArgs) -> Result<Lookup, DataError> {
        let plan = op.plan(args)?;
        let store = self.store(op.dataset);
        tracing::debug!(operation = op.name, dataset = %op.dataset, "Running lookup");

        match op.shape {
            Shape::Many => store.fetch_all(&plan).await.map(Lookup::Many),
            Shape::One => store.fetch_optional(&plan).await.map(Lookup::One),
        }
    }

    /// Close every dataset pool
    pub async fn close(&self) {
        tokio::join!(self.world.close(), self.community.close());
    }
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::query::operations::{
        GET_CITIES_IN_COUNTRY, GET_COUNTRIES, GET_COUNTRIES_BY_CURRENCY, GET_COUNTRIES_BY_REGION,
        GET_COUNTRY_BY_CODE, GET_STATES_IN_COUNTRY, GET_TOP_CHATTERS, SEARCH_CITIES,
        SEARCH_COUNTRIES,
    };

    async fn service() -> (test_support::FixtureDir, DatasetService) {
        let fixture = test_support::fixture().await;
        let service = DatasetService::init(fixture.path(), 2);
        (fixture, service)
    }

    fn many(lookup: Lookup) -> Vec<Record> {
        match lookup {
            Lookup::Many(records) => records,
            Lookup::One(_) => panic!("expected many"),
        }
    }

    fn one(lookup: Lookup) -> Option<Record> {
        match lookup {
            Lookup::One(record) => record,
            Lookup::Many(_) => panic!("expected one"),
        }
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records.iter().filter_map(|r| r["name"].as_str()).collect()
    }

    #[tokio::test]
    async fn test_countries_by_capital() {
        let (_fixture, service) = service().await;
        let args = LookupArgs::new().arg("capital", Some("Paris".into()));
        let records = many(service.run(GET_COUNTRIES, &args).await.unwrap());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "France");
        assert_eq!(records[0]["iso3"], "FRA");
    }

    #[tokio::test]
    async fn test_countries_unfiltered_limit() {
        let (_fixture, service) = service().await;
        let args = LookupArgs::new().limit(Some(5));
        let records = many(service.run(GET_COUNTRIES, &args).await.unwrap());
        assert_eq!(records.len(), 5);

        let all = many(service.run(GET_COUNTRIES, &LookupArgs::new()).await.unwrap());
        assert_eq!(all.len(), test_support::COUNTRY_COUNT);
    }

    #[tokio::test]
    async fn test_countries_combined_filters() {
        let (_fixture, service) = service().await;
        let args = LookupArgs::new()
            .arg("currency", Some("EUR".into()))
            .arg("name", Some("an".into()));
        let records = many(service.run(GET_COUNTRIES, &args).await.unwrap());
        assert_eq!(names(&records), vec!["France", "Germany"]);
    }

    #[tokio::test]
    async fn test_country_by_code_either_column() {
        let (_fixture, service) = service().await;

        let by_iso3 = LookupArgs::new().arg("code", Some("USA".into()));
        let record = one(service.run(GET_COUNTRY_BY_CODE, &by_iso3).await.unwrap()).unwrap();
        assert_eq!(record["name"], "United States");

        let by_iso2 = LookupArgs::new().arg("code", Some("US".into()));
        let record = one(service.run(GET_COUNTRY_BY_CODE, &by_iso2).await.unwrap()).unwrap();
        assert_eq!(record["iso3"], "USA");
    }

    #[tokio::test]
    async fn test_country_by_code_no_match() {
        let (_fixture, service) = service().await;
        let args = LookupArgs::new().arg("code", Some("XX".into()));
        assert!(one(service.run(GET_COUNTRY_BY_CODE, &args).await.unwrap()).is_none());
    }

    #[tokio::test]
    async fn test_country_code_exact_not_partial() {
        let (_fixture, service) = service().await;
        let args = LookupArgs::new().arg("code", Some("U".into()));
        assert!(one(service.run(GET_COUNTRY_BY_CODE, &args).await.unwrap()).is_none());
    }

    #[tokio::test]
    async fn test_countries_by_region_sorted() {
        let (_fixture, service) = service().await;
        let args = LookupArgs::new().arg("region", Some("Europe".into()));
        let records = many(service.run(GET_COUNTRIES_BY_REGION, &args).await.unwrap());
        assert_eq!(names(&records), vec!["France", "Germany", "United Kingdom"]);
    }

    #[tokio::test]
    async fn test_countries_by_currency() {
        let (_fixture, service) = service().await;
        let args = LookupArgs::new().arg("currency", Some("EUR".into()));
        let records = many(service.run(GET_COUNTRIES_BY_CURRENCY, &args).await.unwrap());
        assert_eq!(names(&records), vec!["France", "Germany"]);
    }

    #[tokio::test]
    async fn test_search_countries() {
        let (_fixture, service) = service().await;
        let args = LookupArgs::new().arg("name", Some("United".into()));
        let records = many(service.run(SEARCH_COUNTRIES, &args).await.unwrap());
        assert_eq!(names(&records), vec!["United Kingdom", "United States"]);
    }

    #[tokio::test]
    async fn test_cities_in_country() {
        let (_fixture, service) = service().await;
        let args = LookupArgs::new().arg("country_code", Some("US".into()));
        let records = many(service.run(GET_CITIES_IN_COUNTRY, &args).await.unwrap());
        assert_eq!(names(&records), vec!["Chicago", "New York", "San Francisco"]);
        assert!(records[0]["latitude"].is_f64());
    }

    #[tokio::test]
    async fn test_search_cities_across_countries() {
        let (_fixture, service) = service().await;
        let args = LookupArgs::new().arg("name", Some("San".into()));
        let records = many(service.run(SEARCH_CITIES, &args).await.unwrap());
        assert_eq!(names(&records), vec!["San Francisco", "Santiago de Querétaro"]);
    }

    #[tokio::test]
    async fn test_states_in_country() {
        let (_fixture, service) = service().await;
        let args = LookupArgs::new().arg("country_code", Some("DE".into()));
        let records = many(service.run(GET_STATES_IN_COUNTRY, &args).await.unwrap());
        assert_eq!(names(&records), vec!["Bavaria", "Berlin"]);
    }

    #[tokio::test]
    async fn test_states_unknown_country_is_empty() {
        let (_fixture, service) = service().await;
        let args = LookupArgs::new().arg("country_code", Some("XX".into()));
        let records = many(service.run(GET_STATES_IN_COUNTRY, &args).await.unwrap());
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_top_chatters_shape() {
        let (_fixture, service) = service().await;
        let records = many(service.run(GET_TOP_CHATTERS, &LookupArgs::new()).await.unwrap());

        assert_eq!(names(&records), vec!["ada", "linus", "grace"]);
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "messages"]);
        assert_eq!(records[0]["messages"], 420);
    }

    #[tokio::test]
    async fn test_invalid_input_never_touches_store() {
        let dir = tempfile::tempdir().unwrap();
        let service = DatasetService::init(dir.path(), 1);

        let err = service
            .run(GET_STATES_IN_COUNTRY, &LookupArgs::new())
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());

        let err = service
            .run(GET_COUNTRIES, &LookupArgs::new().limit(Some(-3)))
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn test_missing_dataset_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let service = DatasetService::init(dir.path(), 1);

        let err = service
            .run(GET_TOP_CHATTERS, &LookupArgs::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::StoreUnavailable {
                dataset: "community",
                ..
            }
        ));
    }

    #[test]
    fn test_lookup_serialization() {
        let mut record = Record::new();
        record.insert("name".into(), "France".into());

        let many = Lookup::Many(vec![record.clone()]);
        assert_eq!(serde_json::to_string(&many).unwrap(), r#"[{"name":"France"}]"#);

        let found = Lookup::One(Some(record));
        assert_eq!(serde_json::to_string(&found).unwrap(), r#"{"name":"France"}"#);

        assert_eq!(serde_json::to_string(&Lookup::One(None)).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Lookup::Many(vec![])).unwrap(), "[]");
    }

    #[test]
    fn test_dataset_file_names() {
        assert_eq!(Dataset::World.file_name(), "world.db");
        assert_eq!(Dataset::Community.file_name(), "community.db");
        assert_eq!(Dataset::Community.to_string(), "community");
    }
}
