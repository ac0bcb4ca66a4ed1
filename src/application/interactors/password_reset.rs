use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::application::app_error::{AppError, AppResult};
use crate::application::dto::password_reset::{RequestPasswordResetDTO, ResetPasswordDTO};
use crate::application::interactors::rollback_on_error;
use crate::application::interface::clock::Clock;
use crate::application::interface::crypto::{CredentialsHasher, TokenGenerator};
use crate::application::interface::db::DBSession;
use crate::application::interface::email::EmailSender;
use crate::application::interface::gateway::password_reset::{PasswordResetTokenReader, PasswordResetTokenWriter};
use crate::application::interface::gateway::user::{UserReader, UserWriter};
use crate::domain::entities::password_reset::{PasswordResetToken, ResetTokenStatus, hash_token};
use crate::domain::entities::user::User;
use crate::domain::policy::PasswordPolicy;
use crate::domain::values::email::EmailAddress;

const RESET_EMAIL_SUBJECT: &str = "Password reset";

#[derive(Clone)]
pub struct RequestPasswordResetInteractor {
    db_session: Arc<dyn DBSession>,
    password_reset_writer: Arc<dyn PasswordResetTokenWriter>,
    user_reader: Arc<dyn UserReader>,
    email_sender: Arc<dyn EmailSender>,
    token_generator: Arc<dyn TokenGenerator>,
    clock: Arc<dyn Clock>,
}

impl RequestPasswordResetInteractor {
    pub fn new(
        db_session: Arc<dyn DBSession>,
        password_reset_writer: Arc<dyn PasswordResetTokenWriter>,
        user_reader: Arc<dyn UserReader>,
        email_sender: Arc<dyn EmailSender>,
        token_generator: Arc<dyn TokenGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db_session,
            password_reset_writer,
            user_reader,
            email_sender,
            token_generator,
            clock,
        }
    }

    /// Issues a reset token for the account behind `dto.email`.
    ///
    /// Succeeds without doing anything when the address is well formed but not
    /// registered. Delivery runs detached after the commit, so neither latency
    /// nor a delivery failure tells callers which case they hit.
    pub async fn execute(&self, dto: RequestPasswordResetDTO) -> AppResult<()> {
        let email = EmailAddress::parse(&dto.email)?;

        let issued = self.issue_token(&email, dto.ttl).await;
        let Some((user, raw_token, expires_at)) = rollback_on_error(self.db_session.as_ref(), issued).await? else {
            return Ok(());
        };

        let reset_link = format!("{}?token={}", dto.reset_url, raw_token);
        let body = format!(
            "To reset your password follow the link: {}\nThe link expires at {} UTC.",
            reset_link,
            expires_at.format("%Y-%m-%d %H:%M:%S")
        );

        let email_sender = Arc::clone(&self.email_sender);
        tokio::spawn(async move {
            info!(user_id = %user.id, "Sending password reset email");
            if let Err(err) = email_sender.send(&user.email, RESET_EMAIL_SUBJECT, &body).await {
                error!(user_id = %user.id, "Failed to send password reset email: {}", err);
                return;
            }
            info!(user_id = %user.id, "Password reset email sent");
        });

        Ok(())
    }

    async fn issue_token(
        &self,
        email: &EmailAddress,
        ttl: i64,
    ) -> AppResult<Option<(User, String, DateTime<Utc>)>> {
        let user = match self.user_reader.find_by_email(email.as_str()).await? {
            Some(user) => user,
            None => {
                warn!(email = %email, "Password reset requested for non-existent email");
                self.db_session.rollback().await?;
                return Ok(None);
            }
        };

        let raw_token = self.token_generator.generate();
        let reset_token = PasswordResetToken::issue(user.id.clone(), &raw_token, self.clock.now(), ttl)?;
        let expires_at = reset_token.expires_at;
        self.password_reset_writer.replace(reset_token).await?;
        self.db_session.commit().await?;

        Ok(Some((user, raw_token, expires_at)))
    }
}

#[derive(Clone)]
pub struct ResetPasswordInteractor {
    db_session: Arc<dyn DBSession>,
    password_reset_reader: Arc<dyn PasswordResetTokenReader>,
    password_reset_writer: Arc<dyn PasswordResetTokenWriter>,
    user_reader: Arc<dyn UserReader>,
    user_writer: Arc<dyn UserWriter>,
    hasher: Arc<dyn CredentialsHasher>,
    policy: PasswordPolicy,
    clock: Arc<dyn Clock>,
}

impl ResetPasswordInteractor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db_session: Arc<dyn DBSession>,
        password_reset_reader: Arc<dyn PasswordResetTokenReader>,
        password_reset_writer: Arc<dyn PasswordResetTokenWriter>,
        user_reader: Arc<dyn UserReader>,
        user_writer: Arc<dyn UserWriter>,
        hasher: Arc<dyn CredentialsHasher>,
        policy: PasswordPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db_session,
            password_reset_reader,
            password_reset_writer,
            user_reader,
            user_writer,
            hasher,
            policy,
            clock,
        }
    }

    pub async fn execute(&self, dto: ResetPasswordDTO) -> AppResult<()> {
        let result = self.reset(dto).await;
        rollback_on_error(self.db_session.as_ref(), result).await
    }

    async fn reset(&self, dto: ResetPasswordDTO) -> AppResult<()> {
        let now = self.clock.now();

        let reset_token = self
            .password_reset_reader
            .find_by_hash(&hash_token(&dto.token))
            .await?
            .ok_or_else(|| {
                warn!("Password reset attempt with invalid token");
                AppError::InvalidResetToken
            })?;

        let status = reset_token.status(now);
        if status != ResetTokenStatus::Issued {
            warn!(token_id = %reset_token.id, ?status, "Password reset attempt with inactive token");
            return Err(AppError::InvalidResetToken);
        }

        // The token stays unconsumed so the user can retry with a stronger password.
        if let Err(err) = self.policy.check(&dto.password) {
            info!(token_id = %reset_token.id, "Password reset rejected by password policy");
            return Err(err);
        }

        let mut user = self
            .user_reader
            .find_by_id(&reset_token.user_id)
            .await?
            .ok_or_else(|| {
                warn!("User not found for password reset token");
                AppError::InvalidResetToken
            })?;

        let hash = self.hasher.hash_password(&dto.password).await?;

        if !self.password_reset_writer.consume(&reset_token.id, now).await? {
            warn!(token_id = %reset_token.id, "Password reset token was consumed concurrently");
            return Err(AppError::InvalidResetToken);
        }

        user.change_password(hash, now);
        self.user_writer.update(user).await?;
        self.db_session.commit().await?;

        info!("Password reset successfully for user {}", reset_token.user_id);
        Ok(())
    }
}

#[derive(Clone)]
pub struct PurgeStaleResetTokensInteractor {
    db_session: Arc<dyn DBSession>,
    password_reset_writer: Arc<dyn PasswordResetTokenWriter>,
    clock: Arc<dyn Clock>,
}

impl PurgeStaleResetTokensInteractor {
    pub fn new(
        db_session: Arc<dyn DBSession>,
        password_reset_writer: Arc<dyn PasswordResetTokenWriter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db_session,
            password_reset_writer,
            clock,
        }
    }

    pub async fn execute(&self) -> AppResult<u64> {
        let result = async {
            let removed = self.password_reset_writer.delete_stale(self.clock.now()).await?;
            self.db_session.commit().await?;
            Ok(removed)
        }
        .await;
        rollback_on_error(self.db_session.as_ref(), result).await
    }
}
