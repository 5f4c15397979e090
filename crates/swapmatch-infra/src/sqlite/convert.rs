//! Column conversions and sqlx error mapping shared by the SQLite repositories.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use swapmatch_types::availability::TIME_FORMAT;
use swapmatch_types::error::RepositoryError;

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub(crate) fn parse_time(s: &str) -> Result<NaiveTime, RepositoryError> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|e| RepositoryError::Query(format!("invalid time of day '{s}': {e}")))
}

pub(crate) fn format_time(t: &NaiveTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

/// Parse a stored id column, naming the column in the error.
pub(crate) fn parse_id<T>(column: &str, raw: &str) -> Result<T, RepositoryError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>()
        .map_err(|e| RepositoryError::Query(format!("invalid {column}: {e}")))
}

/// Map a sqlx error onto the port error.
///
/// Pool exhaustion becomes `Timeout`, I/O and closed pools `Connection`,
/// everything else `Query`.
pub(crate) fn query_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut => RepositoryError::Timeout,
        sqlx::Error::PoolClosed | sqlx::Error::Io(_) => RepositoryError::Connection,
        other => RepositoryError::Query(other.to_string()),
    }
}

/// Like [`query_error`], but a UNIQUE violation becomes `Conflict(what)` and
/// a FOREIGN KEY violation (the referenced row is missing) becomes `NotFound`.
pub(crate) fn write_error(e: sqlx::Error, what: impl FnOnce() -> String) -> RepositoryError {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepositoryError::Conflict(what())
        }
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            RepositoryError::NotFound
        }
        other => query_error(other),
    }
}
