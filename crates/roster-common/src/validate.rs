//! Draft validation.
//!
//! # Purpose
//! Field-level validation for [`RecordDraft`] submissions, shared by the
//! client-side insert coordinator and the userd create endpoint so both sides
//! reject the same inputs.
use crate::RecordDraft;
use serde::Serialize;

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 99;

/// A single failed field with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a draft, collecting every failed field rather than stopping at
/// the first.
pub fn validate_draft(draft: &RecordDraft) -> std::result::Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    require_non_empty(&mut errors, "name", &draft.name, "name is required");
    if draft.age < MIN_AGE {
        errors.push(FieldError::new("age", format!("age must be at least {MIN_AGE}")));
    } else if draft.age > MAX_AGE {
        errors.push(FieldError::new("age", format!("age must be at most {MAX_AGE}")));
    }
    require_non_empty(&mut errors, "gender", &draft.gender, "gender is required");
    require_non_empty(&mut errors, "balance", &draft.balance, "balance is required");
    require_non_empty(&mut errors, "company", &draft.company, "company is required");
    require_non_empty(&mut errors, "phone", &draft.phone, "phone is required");
    if !looks_like_email(&draft.email) {
        errors.push(FieldError::new("email", "invalid email address"));
    }
    require_non_empty(&mut errors, "about", &draft.about, "about is required");

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn require_non_empty(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    message: &str,
) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}

// Deliberately shallow: one '@' with a non-empty local part and a dotted
// domain. Full address validation belongs to the mail system, not a form.
fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .split_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}
