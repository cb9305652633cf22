//! Shared API response types.
use roster_common::validate::FieldError;
use serde::{Deserialize, Serialize};

/// Uniform error body: a stable `code`, a human-readable `message`, and for
/// validation failures the per-field detail.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}
