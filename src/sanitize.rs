use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Upper bound enforced by the storage columns.
pub const FIELD_MAX_CHARS: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("value is empty")]
    Empty,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("id must be a positive integer, got {0:?}")]
    InvalidId(String),
}

/// Trims surrounding whitespace, drops control characters and truncates to
/// the column bound. Empty output is an error.
pub fn sanitize_name(raw: &str) -> Result<String, ValidationError> {
    let cleaned: String = raw.trim().chars().filter(|c| !c.is_control()).collect();
    if cleaned.is_empty() {
        return Err(ValidationError::Empty);
    }
    Ok(cleaned.chars().take(FIELD_MAX_CHARS).collect())
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$",
        )
        .expect("email pattern is valid")
    })
}

/// Normalizes an email address (trim + lowercase) and checks its syntax.
pub fn sanitize_email(raw: &str) -> Result<String, ValidationError> {
    let normalized = raw.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(ValidationError::Empty);
    }
    if normalized.chars().count() > FIELD_MAX_CHARS || !email_regex().is_match(&normalized) {
        return Err(ValidationError::InvalidEmail(raw.trim().to_string()));
    }
    Ok(normalized)
}

/// Parses a record id from its query/form string form. Zero is rejected,
/// ids start at 1.
pub fn parse_id(raw: &str) -> Result<u64, ValidationError> {
    let trimmed = raw.trim();
    let id: u64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidId(trimmed.to_string()))?;
    if id == 0 {
        return Err(ValidationError::InvalidId(trimmed.to_string()));
    }
    Ok(id)
}
