//! Row materialization
//!
//! Converts SQLite result rows into column-keyed records. Column order is
//! kept (serde_json `preserve_order`) and each value keeps its storage class:
//! INTEGER and REAL become JSON numbers, TEXT a string, NULL stays null.
//! BLOBs have no JSON scalar form and are hex-encoded.

use serde_json::{Map, Number, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use super::error::DataError;

/// One result row keyed by column name
pub type Record = Map<String, Value>;

/// Convert an optional row. `None` stays `None`; a row whose fields are all
/// null still yields a record.
pub fn to_record(row: Option<&SqliteRow>) -> Result<Option<Record>, DataError> {
    row.map(materialize).transpose()
}

/// Convert every row, keeping input order
pub fn to_records(rows: &[SqliteRow]) -> Result<Vec<Record>, DataError> {
    rows.iter().map(materialize).collect()
}

fn materialize(row: &SqliteRow) -> Result<Record, DataError> {
    let mut record = Map::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = column_value(row, column.ordinal(), column.name())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

fn column_value(row: &SqliteRow, index: usize, name: &str) -> Result<Value, DataError> {
    let raw = row
        .try_get_raw(index)
        .map_err(|e| DataError::decode(name, e))?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage = raw.type_info().name().to_string();

    let value = match storage.as_str() {
        "INTEGER" | "BOOLEAN" => Value::from(
            row.try_get_unchecked::<i64, _>(index)
                .map_err(|e| DataError::decode(name, e))?,
        ),
        "REAL" | "NUMERIC" => {
            let n = row
                .try_get_unchecked::<f64, _>(index)
                .map_err(|e| DataError::decode(name, e))?;
            Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
        }
        "BLOB" => Value::String(hex::encode(
            row.try_get_unchecked::<Vec<u8>, _>(index)
                .map_err(|e| DataError::decode(name, e))?,
        )),
        _ => Value::String(
            row.try_get_unchecked::<String, _>(index)
                .map_err(|e| DataError::decode(name, e))?,
        ),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    async fn pool() -> SqlitePool {
        SqlitePool::connect(":memory:").await.unwrap()
    }

    #[test]
    fn test_to_record_absent_row() {
        assert!(to_record(None).unwrap().is_none());
    }

    #[test]
    fn test_to_records_empty() {
        let records = to_records(&[]).unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_native_types_preserved() {
        let pool = pool().await;
        let row = sqlx::query(
            "SELECT 'France' AS name, 67391582 AS population, 551.695 AS area, NULL AS motto, x'cafe' AS flag",
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        let record = to_record(Some(&row)).unwrap().unwrap();
        assert_eq!(record["name"], Value::from("France"));
        assert_eq!(record["population"], Value::from(67391582_i64));
        assert!(record["population"].is_i64());
        assert_eq!(record["area"], Value::from(551.695));
        assert_eq!(record["motto"], Value::Null);
        assert_eq!(record["flag"], Value::from("cafe"));
    }

    #[tokio::test]
    async fn test_column_order_and_keys_exhaustive() {
        let pool = pool().await;
        let row = sqlx::query("SELECT 1 AS z, 2 AS a, 3 AS m")
            .fetch_one(&pool)
            .await
            .unwrap();

        let record = to_record(Some(&row)).unwrap().unwrap();
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[tokio::test]
    async fn test_all_null_row_is_a_record() {
        let pool = pool().await;
        let row = sqlx::query("SELECT NULL AS a, NULL AS b")
            .fetch_one(&pool)
            .await
            .unwrap();

        let record = to_record(Some(&row)).unwrap().unwrap();
        assert_eq!(record.len(), 2);
        assert!(record.values().all(Value::is_null));
    }

    #[tokio::test]
    async fn test_to_records_preserves_order() {
        let pool = pool().await;
        let rows = sqlx::query(
            "SELECT 'c' AS v UNION ALL SELECT 'a' UNION ALL SELECT 'b'",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let records = to_records(&rows).unwrap();
        let values: Vec<&str> = records.iter().filter_map(|r| r["v"].as_str()).collect();
        assert_eq!(values, vec!["c", "a", "b"]);
    }
}
