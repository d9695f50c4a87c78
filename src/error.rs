//! Error types for the fund metrics engine.

use thiserror::Error;

use crate::fund::{FundId, ValidationError};

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading ledgers or building reports.
///
/// Metric computation itself never returns these: the calculator absorbs
/// failures into zero / `None` values.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// A ledger row could not be turned into a typed record
    #[error("Invalid ledger record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// A typed record violates a ledger invariant
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fund {0} not found")]
    FundNotFound(FundId),

    #[error("Unsupported metric '{metric}', expected one of: pic, dpi, irr")]
    UnsupportedMetric { metric: String },

    #[error("Invalid configuration value: {0}")]
    InvalidConfig(String),

    /// Backing store failure
    #[error("Repository error: {0}")]
    Repository(String),
}
