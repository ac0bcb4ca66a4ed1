use std::fmt;

use validator::ValidateEmail;

use crate::application::app_error::{AppError, AppResult};

/// Syntactically valid, normalized (trimmed, lowercased) email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let candidate = raw.trim().to_lowercase();
        if candidate.is_empty() {
            return Err(AppError::Validation("Email is required".to_string()));
        }
        if !candidate.validate_email() {
            return Err(AppError::Validation("Invalid email format".to_string()));
        }
        Ok(Self(candidate))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
