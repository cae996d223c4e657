// In: src/error.rs

//! This module defines the single, unified error type for the entire bolima library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BolimaError {
    // =========================================================================
    // === Structural Errors (abort a run before any issue is processed)
    // =========================================================================
    /// The loaded corpus lacks one or more required columns.
    #[error("Schema error: column(s) not found: {}", .0.join(", "))]
    SchemaError(Vec<String>),

    /// A configuration value (storage format, normalization group, ...) is not recognized.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Source not found: {0}")]
    NotFoundError(String),

    #[error("Workflow error: {0}")]
    WorkflowError(String),

    // =========================================================================
    // === Per-Issue Errors (logged and skipped by the workflow)
    // =========================================================================
    /// A lemma is still missing after fill-empty. This is a tagger/adapter defect.
    #[error("Consistency error: {0}")]
    ConsistencyError(String),

    #[error("Invalid issue title '{0}'")]
    InvalidTitle(String),

    #[error("PoS tag '{tag}' is not part of the {scheme} tagset")]
    UnknownPosTag { tag: String, scheme: &'static str },

    #[error("Tagger failed: {0}")]
    TaggerError(String),

    /// A table does not have the column (or column type) an operation needs.
    #[error("Column '{0}' is missing or has an unexpected type")]
    ColumnError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet operation failed: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// An error originating from the underlying I/O subsystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically on the tagger wire format.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl BolimaError {
    /// True for errors that describe a broken run setup rather than a bad issue.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            BolimaError::SchemaError(_)
                | BolimaError::ConfigurationError(_)
                | BolimaError::NotFoundError(_)
                | BolimaError::WorkflowError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_names_missing_columns() {
        let err = BolimaError::SchemaError(vec!["page".into(), "text".into()]);
        assert_eq!(err.to_string(), "Schema error: column(s) not found: page, text");
        assert!(err.is_structural());
    }

    #[test]
    fn test_issue_level_errors_are_not_structural() {
        assert!(!BolimaError::ConsistencyError("lemma".into()).is_structural());
        assert!(!BolimaError::TaggerError("boom".into()).is_structural());
    }
}
