use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid or expired password reset token")]
    InvalidResetToken,
    #[error("{0}")]
    WeakPassword(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("User with this username or email already exists")]
    UserAlreadyExists,
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Failed to hash password")]
    PasswordHashError,
    #[error("Failed to send email: {0}")]
    EmailSendError(String),
    #[error("Reset token lifetime of {0} seconds is out of range")]
    InvalidTokenLifetime(i64),
}

impl AppError {
    /// Client errors are caused by the request and are never worth retrying.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::InvalidResetToken
                | AppError::WeakPassword(_)
                | AppError::InvalidId(_)
                | AppError::UserAlreadyExists
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
