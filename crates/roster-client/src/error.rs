//! Client error taxonomy.
//!
//! # Purpose
//! Keeps the fetch path and the create path on distinct error types so the
//! rendering layer can show a query-level error state for failed page loads
//! and re-open the submission dialog for failed creates.
use roster_common::validate::FieldError;
use thiserror::Error;

/// Failure while fetching a page or posting a create request.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Transport failure or non-success HTTP status.
    #[error("network error: {0}")]
    Network(String),
    /// Response body could not be decoded into the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Failure surfaced to the caller of the optimistic insert coordinator.
#[derive(Debug, Clone, Error)]
pub enum CreateError {
    /// The draft was rejected before any side effect; carries every failed
    /// field so the form can annotate all of them at once.
    #[error("draft failed validation ({} field(s))", .0.len())]
    Invalid(Vec<FieldError>),
    /// The POST path failed. Any optimistic row already inserted stays.
    #[error("create failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_reports_field_count() {
        let err = CreateError::Invalid(vec![
            FieldError {
                field: "name",
                message: "name is required".to_string(),
            },
            FieldError {
                field: "age",
                message: "age must be at least 18".to_string(),
            },
        ]);
        assert_eq!(err.to_string(), "draft failed validation (2 field(s))");
    }

    #[test]
    fn fetch_errors_render_their_category() {
        assert!(
            FetchError::Network("status 503".to_string())
                .to_string()
                .starts_with("network error")
        );
        assert!(
            FetchError::Parse("expected array".to_string())
                .to_string()
                .starts_with("parse error")
        );
    }
}
