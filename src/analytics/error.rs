//! Analytics error types.

use thiserror::Error;

/// Errors that abort a single analytics feature.
///
/// Malformed individual rows never produce one of these; they are skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Expected input columns are absent from the source table.
    #[error("Missing expected columns: {missing:?}. Found: {found:?}")]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// A feature was configured with unusable parameters.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
