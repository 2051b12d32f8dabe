//! Form validation helpers.
//!
//! The public registration forms must report *every* violation in one
//! response, as a field → message map. Presence checks run first over all
//! required fields; format checks only run against fields that are present.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::FieldErrors;

// The patterns are literals; compilation cannot fail.
#[allow(clippy::unwrap_used)]
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[allow(clippy::unwrap_used)]
static NIM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

#[allow(clippy::unwrap_used)]
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9+\-\s()]+$").unwrap());

/// Collects field violations for one form submission.
#[derive(Debug, Default)]
pub struct FormValidator {
    errors: FieldErrors,
}

impl FormValidator {
    /// Create an empty validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-blank value, recording a violation when missing.
    pub fn require(&mut self, field: &str, value: Option<&str>) {
        if value.is_none_or(|v| v.trim().is_empty()) {
            self.errors
                .insert(field.to_string(), format!("{field} wajib diisi"));
        }
    }

    /// Check email format. Skipped when the value is absent.
    pub fn check_email(&mut self, field: &str, value: Option<&str>) {
        self.check_format(field, value, &EMAIL_RE, "Format email tidak valid");
    }

    /// Check that a student number is digits only. Skipped when absent.
    pub fn check_nim(&mut self, field: &str, value: Option<&str>) {
        self.check_format(field, value, &NIM_RE, "NIM harus berupa angka");
    }

    /// Check phone number charset. Skipped when the value is absent.
    pub fn check_phone(&mut self, field: &str, value: Option<&str>) {
        self.check_format(field, value, &PHONE_RE, "Format nomor telepon tidak valid");
    }

    fn check_format(&mut self, field: &str, value: Option<&str>, re: &Regex, message: &str) {
        // Presence violations win; don't stack a format message on top.
        if self.errors.contains_key(field) {
            return;
        }
        if let Some(v) = value {
            let v = v.trim();
            if !v.is_empty() && !re.is_match(v) {
                self.errors.insert(field.to_string(), message.to_string());
            }
        }
    }

    /// Whether any violation has been recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume the validator, yielding the violation map.
    #[must_use]
    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}
