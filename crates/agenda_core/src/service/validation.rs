//! Field validators run before any store access.
//!
//! All checks are pure and synchronous.

use crate::service::error::{AgendaError, AgendaResult};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("valid email regex"));

/// Fails with `InvalidField(label)` unless `value` is non-empty.
pub fn validate_string_field(label: &'static str, value: &str) -> AgendaResult<()> {
    if value.is_empty() {
        return Err(AgendaError::InvalidField(label));
    }
    Ok(())
}

/// Fails with `InvalidField("email")` unless `value` looks like an address.
pub fn validate_email(value: &str) -> AgendaResult<()> {
    if !EMAIL_RE.is_match(value) {
        return Err(AgendaError::InvalidField("email"));
    }
    Ok(())
}

/// Parses raw caller input into a timestamp.
///
/// Accepts RFC 3339 text only. Empty input and bare numbers are rejected
/// rather than interpreted as epoch offsets.
pub fn parse_date_field(label: &'static str, raw: &str) -> AgendaResult<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(AgendaError::InvalidField(label));
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|_| AgendaError::InvalidField(label))
}
