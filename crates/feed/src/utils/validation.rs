//! Field validation helpers shared by the request types.

use once_cell::sync::Lazy;
use regex::Regex;

use uuid::Uuid;

use crate::types::{FeedError, FeedResult, ValidationErrors};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern compiles")
});

/// Records an error when `value` is blank.
pub fn check_required(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "is required");
    }
}

/// Records an error when the character count of `value` is outside `[min, max]`.
/// Fields already rejected are not reported twice.
pub fn check_length(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    if errors.has_field(field) {
        return;
    }

    let len = value.chars().count();
    if len < min {
        errors.add(field, format!("must be at least {min} characters"));
    } else if len > max {
        errors.add(field, format!("must be at most {max} characters"));
    }
}

pub fn check_email(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.len() > 255 || !EMAIL_REGEX.is_match(value) {
        errors.add(field, "must be a valid email address");
    }
}

/// Parse an identifier supplied by a caller. Malformed values are bad input.
pub fn parse_id(raw: &str, what: &str) -> FeedResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| FeedError::bad_input(format!("invalid {what}: {raw:?}")))
}
