//! Shared row-conversion helpers.

use chrono::{DateTime, NaiveDateTime, Utc};
use primevest_core::errors::{DatabaseError, Error, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a TEXT-stored decimal column. A parse failure means the row is
/// corrupt, so it surfaces as an internal database error.
pub fn parse_decimal(value: &str, column: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| {
        Error::Database(DatabaseError::Internal(format!(
            "corrupt decimal in column {}: '{}' ({})",
            column, value, e
        )))
    })
}

/// Builds the integrity error for an enum column holding an unknown value.
pub fn corrupt_column(column: &str, value: &str) -> Error {
    Error::Database(DatabaseError::Internal(format!(
        "corrupt value in column {}: '{}'",
        column, value
    )))
}

/// Timestamps are stored as naive UTC and re-tagged on load.
pub fn to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    naive.and_utc()
}

pub fn to_naive(utc: DateTime<Utc>) -> NaiveDateTime {
    utc.naive_utc()
}
