use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use sha2::{Digest, Sha256};

use crate::application::app_error::{AppError, AppResult};
use crate::domain::entities::id::Id;
use crate::domain::entities::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetTokenStatus {
    Issued,
    Consumed,
    Expired,
}

/// A single-use reset credential. Only the digest of the emailed token is kept.
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub id: Id<PasswordResetToken>,
    pub user_id: Id<User>,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Fails when `now + ttl` does not fit in a timestamp.
    pub fn issue(user_id: Id<User>, raw_token: &str, now: DateTime<Utc>, ttl: i64) -> AppResult<Self> {
        let expires_at = TimeDelta::try_seconds(ttl)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(AppError::InvalidTokenLifetime(ttl))?;

        Ok(Self {
            id: Id::generate(),
            user_id,
            token_hash: hash_token(raw_token),
            expires_at,
            used_at: None,
            created_at: now,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    pub fn status(&self, now: DateTime<Utc>) -> ResetTokenStatus {
        if self.is_used() {
            ResetTokenStatus::Consumed
        } else if self.is_expired(now) {
            ResetTokenStatus::Expired
        } else {
            ResetTokenStatus::Issued
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == ResetTokenStatus::Issued
    }
}

pub fn hash_token(raw_token: &str) -> String {
    let digest = Sha256::digest(raw_token.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}
