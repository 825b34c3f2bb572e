//! Form sanitizing and validation helpers shared by every resource

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::models::book_instance::BookStatus;

/// ASCII letters and digits only, as accepted for author names
pub static ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Za-z]+$").expect("valid alphanumeric regex"));

/// One rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Trim surrounding whitespace and escape markup-significant characters
pub fn sanitize(value: &str) -> String {
    escape(value.trim())
}

/// Trimmed optional field; blank means the field was not filled in
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Replace `& < > " ' / \ `` with HTML entities
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// Case- and accent-insensitive comparison key for names.
///
/// Two names with the same key differ only by letter case or diacritics,
/// which is what a strength-2 collation treats as equal.
pub fn collation_key(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Parse an ISO-8601 date or date-time into a UTC instant.
///
/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339 and zone-less
/// `YYYY-MM-DDTHH:MM[:SS]`.
pub fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// Parse an identifier submitted through a form or a path segment
pub fn parse_id(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value.trim()).ok()
}

/// Flatten validator output into one message per field, in form order.
///
/// Only the first failing rule of a field is reported.
pub fn field_errors(errors: &ValidationErrors, order: &[&'static str]) -> Vec<FieldError> {
    let by_field = errors.field_errors();
    order
        .iter()
        .filter_map(|field| {
            let first = by_field.get(*field)?.first()?;
            let message = first
                .message
                .clone()
                .unwrap_or_else(|| Cow::from(format!("Invalid value for {}", field)));
            Some(FieldError {
                field,
                message: message.into_owned(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Custom rules for `#[validate(custom(...))]`
// ---------------------------------------------------------------------------

pub fn iso8601(value: &str) -> Result<(), ValidationError> {
    parse_iso8601(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("iso8601"))
}

pub fn identifier(value: &str) -> Result<(), ValidationError> {
    parse_id(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("identifier"))
}

pub fn identifiers(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().all(|v| parse_id(v).is_some()) {
        Ok(())
    } else {
        Err(ValidationError::new("identifier"))
    }
}

pub fn book_status(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<BookStatus>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("status"))
}
