//! User domain record.
//!
//! # Responsibility
//! - Define the canonical user shape used across all layers.
//! - Enforce non-empty fields and the basic email pattern.
//!
//! # Invariants
//! - `id` is `None` until storage assigns one; records read back from
//!   storage always carry an id.
//! - Write paths must call `validate()` before SQL mutations.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned identifier (SQLite rowid).
pub type UserId = i64;

// local@domain.tld, no whitespace, exactly one '@' segment split.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern must compile"));

/// Field-level validation failure for a user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    EmptyEmail,
    InvalidEmail(String),
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "user name must not be empty"),
            Self::EmptyEmail => write!(f, "user email must not be empty"),
            Self::InvalidEmail(email) => write!(f, "invalid email format: `{email}`"),
        }
    }
}

impl Error for UserValidationError {}

/// Canonical user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Storage-assigned id. `None` for not-yet-persisted records.
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
}

impl User {
    /// Creates a record that has not been persisted yet.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Creates a record carrying an already-assigned storage id.
    pub fn with_id(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Checks field invariants. Must pass before any write is attempted.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if self.email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !is_valid_email(&self.email) {
            return Err(UserValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

/// Returns whether `email` matches the basic `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::{is_valid_email, User, UserValidationError};

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("bob.smith@mail.example.org"));
        assert!(is_valid_email("x@y.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("alice@@example.com"));
        assert!(!is_valid_email("alice bob@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn validate_reports_first_failing_field() {
        let no_name = User::new("", "alice@example.com");
        assert_eq!(no_name.validate(), Err(UserValidationError::EmptyName));

        let no_email = User::new("Alice", "");
        assert_eq!(no_email.validate(), Err(UserValidationError::EmptyEmail));

        let bad_email = User::new("Alice", "not-an-email");
        assert_eq!(
            bad_email.validate(),
            Err(UserValidationError::InvalidEmail("not-an-email".to_string()))
        );

        assert!(User::new("Alice", "alice@example.com").validate().is_ok());
    }

    #[test]
    fn serializes_with_expected_field_names() {
        let user = User::with_id(7, "Alice", "alice@example.com");
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["email"], "alice@example.com");
    }
}
