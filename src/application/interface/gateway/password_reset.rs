use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::app_error::AppResult;
use crate::domain::entities::id::Id;
use crate::domain::entities::password_reset::PasswordResetToken;
use crate::domain::entities::user::User;

#[async_trait]
pub trait PasswordResetTokenWriter: Send + Sync {
    /// Stores `token` as the only token of its user, superseding any previous one.
    async fn replace(&self, token: PasswordResetToken) -> AppResult<Id<PasswordResetToken>>;
    /// Marks the token used if it is still unused and unexpired at `now`.
    /// Returns `false` when another completion got there first.
    async fn consume(&self, token_id: &Id<PasswordResetToken>, now: DateTime<Utc>) -> AppResult<bool>;
    /// Removes expired and consumed tokens, returning how many were removed.
    async fn delete_stale(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

#[async_trait]
pub trait PasswordResetTokenReader: Send + Sync {
    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<PasswordResetToken>>;
    async fn find_by_user(&self, user_id: &Id<User>) -> AppResult<Option<PasswordResetToken>>;
}
