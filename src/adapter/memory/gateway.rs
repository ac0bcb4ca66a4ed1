use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::adapter::memory::session::MemorySession;
use crate::application::app_error::{AppError, AppResult};
use crate::application::interface::gateway::password_reset::{PasswordResetTokenReader, PasswordResetTokenWriter};
use crate::application::interface::gateway::user::{UserReader, UserWriter};
use crate::domain::entities::id::Id;
use crate::domain::entities::password_reset::PasswordResetToken;
use crate::domain::entities::user::User;

/// Users and reset tokens backed by a [`MemorySession`].
#[derive(Clone)]
pub struct MemoryGateway {
    session: MemorySession,
}

impl MemoryGateway {
    pub fn new(session: MemorySession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl UserWriter for MemoryGateway {
    async fn insert(&self, user: User) -> AppResult<Id<User>> {
        self.session
            .with_tx(|data| {
                let taken = data
                    .users
                    .values()
                    .any(|u| u.username == user.username || u.email == user.email);
                if taken {
                    return Err(AppError::UserAlreadyExists);
                }
                let id = user.id.clone();
                data.users.insert(id.value, user);
                Ok(id)
            })
            .await
    }

    async fn update(&self, user: User) -> AppResult<Id<User>> {
        self.session
            .with_tx(|data| match data.users.get_mut(&user.id.value) {
                Some(stored) => {
                    let id = user.id.clone();
                    *stored = user;
                    Ok(id)
                }
                None => Err(AppError::DatabaseError(sqlx::Error::RowNotFound)),
            })
            .await
    }
}

#[async_trait]
impl UserReader for MemoryGateway {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.session
            .with_tx(|data| Ok(data.users.values().find(|u| u.email == email).cloned()))
            .await
    }

    async fn find_by_id(&self, user_id: &Id<User>) -> AppResult<Option<User>> {
        self.session
            .with_tx(|data| Ok(data.users.get(&user_id.value).cloned()))
            .await
    }

    async fn is_user(&self, username: &str, email: &str) -> AppResult<bool> {
        self.session
            .with_tx(|data| Ok(data.users.values().any(|u| u.username == username || u.email == email)))
            .await
    }
}

#[async_trait]
impl PasswordResetTokenWriter for MemoryGateway {
    async fn replace(&self, token: PasswordResetToken) -> AppResult<Id<PasswordResetToken>> {
        self.session
            .with_tx(|data| {
                let id = token.id.clone();
                data.reset_tokens.insert(token.user_id.value, token);
                Ok(id)
            })
            .await
    }

    async fn consume(&self, token_id: &Id<PasswordResetToken>, now: DateTime<Utc>) -> AppResult<bool> {
        self.session
            .with_tx(|data| {
                let token = data
                    .reset_tokens
                    .values_mut()
                    .find(|t| t.id == *token_id && t.is_active(now));
                match token {
                    Some(token) => {
                        token.used_at = Some(now);
                        Ok(true)
                    }
                    None => Ok(false),
                }
            })
            .await
    }

    async fn delete_stale(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.session
            .with_tx(|data| {
                let before = data.reset_tokens.len();
                data.reset_tokens.retain(|_, t| t.is_active(now));
                Ok((before - data.reset_tokens.len()) as u64)
            })
            .await
    }
}

#[async_trait]
impl PasswordResetTokenReader for MemoryGateway {
    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<PasswordResetToken>> {
        self.session
            .with_tx(|data| {
                Ok(data
                    .reset_tokens
                    .values()
                    .find(|t| t.token_hash == token_hash)
                    .cloned())
            })
            .await
    }

    async fn find_by_user(&self, user_id: &Id<User>) -> AppResult<Option<PasswordResetToken>> {
        self.session
            .with_tx(|data| Ok(data.reset_tokens.get(&user_id.value).cloned()))
            .await
    }
}
