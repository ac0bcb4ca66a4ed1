use crate::application::app_error::{AppError, AppResult};

const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?~`";

/// Password strength rules applied to every new credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            require_uppercase: true,
            require_lowercase: false,
            require_digit: true,
            require_special: true,
        }
    }
}

impl PasswordPolicy {
    /// Returns every rule the password breaks, in a stable order.
    pub fn violations(&self, password: &str) -> Vec<String> {
        let mut violations = Vec::new();
        let length = password.chars().count();

        if length < self.min_length {
            violations.push(format!("Password must be at least {} characters long", self.min_length));
        }
        if length > self.max_length {
            violations.push(format!("Password must be at most {} characters long", self.max_length));
        }
        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            violations.push("Password must contain at least one uppercase letter (A-Z)".to_string());
        }
        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            violations.push("Password must contain at least one lowercase letter (a-z)".to_string());
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push("Password must contain at least one digit (0-9)".to_string());
        }
        if self.require_special && !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
            violations.push("Password must contain at least one special character (!@#$%^&* etc.)".to_string());
        }

        violations
    }

    pub fn check(&self, password: &str) -> AppResult<()> {
        let violations = self.violations(password);
        if violations.is_empty() {
            return Ok(());
        }
        Err(AppError::WeakPassword(violations.join("; ")))
    }
}
