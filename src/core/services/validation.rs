//! Validation results
//!
//! Requests are validated into typed values before any write. A failed
//! validation carries one message per offending field.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::core::models::Money;

static LOAN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]{0,31}$").expect("valid regex"));
static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9._-]{2,31}$").expect("valid regex"));
static SETTING_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("valid regex"));

/// Longest free-text field accepted
pub const MAX_TEXT_LEN: usize = 200;

/// One invalid field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// JSON field name
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

/// Accumulated field errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// No errors yet
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record an error for a field
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recorded errors
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether a field has an error
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(value)` when empty, otherwise the errors
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    /// Trimmed, non-empty text no longer than [`MAX_TEXT_LEN`]
    pub fn required_text(&mut self, field: &str, value: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.push(field, format!("{field} cannot be empty"));
        } else if trimmed.chars().count() > MAX_TEXT_LEN {
            self.push(field, format!("{field} is longer than {MAX_TEXT_LEN} characters"));
        }
        trimmed.to_string()
    }

    /// Optional text: blank becomes `None`
    pub fn optional_text(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let trimmed = value.map(str::trim).filter(|v| !v.is_empty())?;
        if trimmed.chars().count() > MAX_TEXT_LEN {
            self.push(field, format!("{field} is longer than {MAX_TEXT_LEN} characters"));
        }
        Some(trimmed.to_string())
    }

    /// Parse a value with `FromStr`, recording the parse error
    pub fn parse<T>(&mut self, field: &str, value: &str) -> Option<T>
    where
        T: std::str::FromStr<Err = String>,
    {
        match value.parse() {
            Ok(v) => Some(v),
            Err(e) => {
                self.push(field, e);
                None
            },
        }
    }

    /// Check a loan number's shape
    pub fn loan_number(&mut self, field: &str, value: &str) -> String {
        let trimmed = value.trim();
        if !LOAN_NUMBER.is_match(trimmed) {
            self.push(
                field,
                "loan number must be 1-32 letters, digits or dashes, starting with a letter or digit",
            );
        }
        trimmed.to_string()
    }

    /// Check a username's shape
    pub fn username(&mut self, field: &str, value: &str) -> String {
        let trimmed = value.trim();
        if !USERNAME.is_match(trimmed) {
            self.push(
                field,
                "username must be 3-32 lowercase letters, digits, '.', '_' or '-', starting with a letter",
            );
        }
        trimmed.to_string()
    }

    /// Check a setting key's shape (kebab-case)
    pub fn setting_key(&mut self, field: &str, value: &str) -> String {
        if !SETTING_KEY.is_match(value) {
            self.push(field, "setting key must be kebab-case");
        }
        value.to_string()
    }

    /// A non-negative amount with at most two decimals
    pub fn money(&mut self, field: &str, value: f64) -> Money {
        Money::from_decimal(value).unwrap_or_else(|e| {
            self.push(field, e.to_string());
            Money::ZERO
        })
    }

    /// A `YYYY-MM-DD` date
    pub fn date(&mut self, field: &str, value: &str) -> Option<NaiveDate> {
        match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.push(field, format!("{field} must be a date like 2026-05-03"));
                None
            },
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}
