//! Error type for the data layer

use thiserror::Error;

/// Primary SQLite result code for "unable to open database file"
const SQLITE_CANTOPEN: i32 = 14;

/// Errors raised while planning or executing a dataset lookup
#[derive(Error, Debug)]
pub enum DataError {
    /// Caller supplied a bad argument; nothing was sent to the store
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Dataset file could not be opened
    #[error("Dataset {dataset} is not available: {reason}")]
    StoreUnavailable {
        dataset: &'static str,
        reason: String,
    },

    /// Query failed while executing
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),

    /// Column value could not be converted into a record value
    #[error("Failed to decode column {column}: {reason}")]
    Decode { column: String, reason: String },

    /// No operation registered under this name
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}

impl DataError {
    /// Create a store unavailable error
    pub fn store_unavailable(dataset: &'static str, reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            dataset,
            reason: reason.into(),
        }
    }

    /// Create a decode error
    pub fn decode(column: &str, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            column: column.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the caller is at fault (maps to invalid params at the tool boundary)
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::UnknownOperation(_))
    }

    /// Whether sqlx reported a failure to open or reach the database file
    pub(crate) fn is_connect_error(e: &sqlx::Error) -> bool {
        matches!(
            e,
            sqlx::Error::Io(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::Configuration(_)
        ) || matches!(e, sqlx::Error::Database(db) if db
            .code()
            .and_then(|c| c.parse::<i32>().ok())
            .is_some_and(|code| code & 0xff == SQLITE_CANTOPEN))
    }
}
