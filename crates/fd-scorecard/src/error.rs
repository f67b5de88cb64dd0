//! Error types for scorecard computations.

use thiserror::Error;

use crate::types::StatementKind;

/// Result type for scorecard operations.
pub type Result<T> = std::result::Result<T, ScorecardError>;

/// Errors that can occur while building a scorecard.
#[derive(Debug, Error)]
pub enum ScorecardError {
    /// Neither the primary nor the fallback provider field is present
    #[error(
        "Schema mismatch in {kind}: no column for `{canonical}` (tried {primary}{})",
        .fallback.map(|f| format!(", {f}")).unwrap_or_default()
    )]
    SchemaMismatch {
        /// Statement being normalized
        kind: StatementKind,
        /// Canonical field that could not be resolved
        canonical: &'static str,
        /// Primary provider field name
        primary: &'static str,
        /// Fallback provider field name, if the field has one
        fallback: Option<&'static str>,
    },

    /// Missing required column in input data
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Not enough aligned periods to compute trend scores
    #[error("Insufficient periods: need {required}, got {available}")]
    InsufficientPeriods {
        /// Required number of periods
        required: usize,
        /// Available number of periods
        available: usize,
    },

    /// A reporting date could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// An invalid parameter was provided
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A data source failed to deliver
    #[error("Data source {provider} failed: {message}")]
    DataSource {
        /// Name of the failing source
        provider: String,
        /// Source-reported failure
        message: String,
    },

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// I/O error while reading a statement bundle
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
