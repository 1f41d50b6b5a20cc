//! Field validation primitives shared by all input models.
//!
//! # Invariants
//! - Validation never panics; failures are returned as values.
//! - Every violated rule is reported, not only the first one.
//! - Lengths are counted in Unicode scalar values.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
});

/// One rejected field with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered collection of field violations for one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns whether any violation names `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    /// Converts the collected violations into a validation outcome.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed")?;
        for (index, error) in self.errors.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{} ({})", error.field, error.message)?;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Rejects blank text.
pub(crate) fn check_not_blank(
    errors: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    value: &str,
) {
    if value.trim().is_empty() {
        errors.push(field, format!("{label} cannot be empty"));
    }
}

/// Rejects blank text, text outside `[1, max_chars]`, and embedded NULs.
pub(crate) fn check_bounded_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    value: &str,
    max_chars: usize,
) {
    check_not_blank(errors, field, label, value);
    let length = value.chars().count();
    if length == 0 || length > max_chars {
        errors.push(field, length_message(label, max_chars));
    }
    // The store measures length up to the first NUL.
    if value.contains('\0') {
        errors.push(field, format!("{label} cannot contain NUL characters"));
    }
}

pub(crate) fn length_message(label: &str, max_chars: usize) -> String {
    format!("{label} must be between 1 and {max_chars} characters")
}

/// Rejects blank or malformed email addresses.
pub(crate) fn check_email(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, "Email cannot be empty");
    } else if !EMAIL_RE.is_match(value) {
        errors.push(field, "Email must be a valid email address");
    }
}

#[cfg(test)]
mod tests {
    use super::{check_bounded_text, check_email, ValidationErrors};

    #[test]
    fn empty_text_reports_blank_and_length() {
        let mut errors = ValidationErrors::new();
        check_bounded_text(&mut errors, "name", "Category name", "", 100);
        assert_eq!(errors.errors().len(), 2);
        assert!(errors.has_field("name"));
    }

    #[test]
    fn whitespace_text_is_blank_but_within_length() {
        let mut errors = ValidationErrors::new();
        check_bounded_text(&mut errors, "title", "Task title", "   ", 200);
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.errors()[0].message, "Task title cannot be empty");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut errors = ValidationErrors::new();
        check_bounded_text(&mut errors, "name", "Category name", &"é".repeat(100), 100);
        assert!(errors.is_empty());

        check_bounded_text(&mut errors, "name", "Category name", &"é".repeat(101), 100);
        assert!(errors.has_field("name"));
    }

    #[test]
    fn embedded_nul_is_rejected() {
        let mut errors = ValidationErrors::new();
        check_bounded_text(&mut errors, "name", "Category name", "\0Work", 100);
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(
            errors.errors()[0].message,
            "Category name cannot contain NUL characters"
        );
    }

    #[test]
    fn email_shape_is_checked() {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "email", "ada@example.com");
        assert!(errors.is_empty());

        check_email(&mut errors, "email", "not-an-email");
        assert_eq!(
            errors.errors()[0].message,
            "Email must be a valid email address"
        );
    }

    #[test]
    fn display_lists_every_field() {
        let mut errors = ValidationErrors::new();
        errors.push("name", "bad");
        errors.push("email", "worse");
        assert_eq!(
            errors.to_string(),
            "validation failed: name (bad); email (worse)"
        );
    }
}
