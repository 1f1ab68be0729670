//! Errors raised by the IronNote stores and exporters.
//!
//! Lookups that find nothing are not errors: they return `Option` or are
//! absorbed as no-ops. Only storage faults and malformed input end up here.

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong reading, writing or exporting the log
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Table, config or export file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A table file holds something other than a JSON array of records
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing an export failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// config.toml could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Config values that parse but can't be used
    #[error("Configuration error: {0}")]
    Config(String),

    /// Set numbers are limited to 1 through 5
    #[error("Invalid set number {0}: expected 1-5")]
    InvalidSetNumber(u8),

    /// Weights must be real numbers; NaN and infinities can't be stored
    #[error("Invalid weight {0}: expected a finite number")]
    InvalidWeight(f64),

    /// Category text that doesn't name one of the fixed categories
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// A record with this primary key already exists in the table
    #[error("Duplicate key '{key}' in table {table}")]
    DuplicateKey { table: &'static str, key: String },

    /// Records that would serialize to JSON the table can't load back
    #[error("Refusing to write unreadable {table} table: {source}")]
    Unreadable {
        table: &'static str,
        source: serde_json::Error,
    },

    /// Anything else, already phrased for the user
    #[error("{0}")]
    Other(String),
}
