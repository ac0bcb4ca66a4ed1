use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::adapter::db::session::SqlxSession;
use crate::application::app_error::AppResult;
use crate::application::interface::gateway::password_reset::{PasswordResetTokenReader, PasswordResetTokenWriter};
use crate::domain::entities::id::Id;
use crate::domain::entities::password_reset::PasswordResetToken;
use crate::domain::entities::user::User;

#[derive(Clone)]
pub struct PasswordResetTokenGateway {
    session: SqlxSession,
}

impl PasswordResetTokenGateway {
    pub fn new(session: SqlxSession) -> Self {
        Self { session }
    }

    fn get_password_reset(row: Option<PgRow>) -> AppResult<Option<PasswordResetToken>> {
        match row {
            Some(row) => Ok(Some(PasswordResetToken {
                id: Id::new(row.try_get("id")?),
                user_id: Id::new(row.try_get("user_id")?),
                token_hash: row.try_get("token_hash")?,
                expires_at: row.try_get("expires_at")?,
                used_at: row.try_get("used_at")?,
                created_at: row.try_get("created_at")?,
            })),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PasswordResetTokenWriter for PasswordResetTokenGateway {
    async fn replace(&self, token: PasswordResetToken) -> AppResult<Id<PasswordResetToken>> {
        self.session
            .with_tx(|tx| {
                async move {
                    // One row per user: the upsert swaps the id, so a completion racing
                    // on the previous token matches nothing once this commits.
                    let row = sqlx::query(
                        r#"
                        INSERT INTO password_reset_tokens
                            (id, user_id, token_hash, expires_at, used_at, created_at)
                        VALUES
                            ($1, $2, $3, $4, $5, $6)
                        ON CONFLICT (user_id) DO UPDATE
                        SET
                            id = EXCLUDED.id,
                            token_hash = EXCLUDED.token_hash,
                            expires_at = EXCLUDED.expires_at,
                            used_at = EXCLUDED.used_at,
                            created_at = EXCLUDED.created_at
                        RETURNING id
                    "#,
                    )
                    .bind(token.id.value)
                    .bind(token.user_id.value)
                    .bind(&token.token_hash)
                    .bind(token.expires_at)
                    .bind(token.used_at)
                    .bind(token.created_at)
                    .fetch_one(tx.as_mut())
                    .await?;

                    let id: Uuid = row.try_get("id")?;
                    Ok(Id::new(id))
                }
                .boxed()
            })
            .await
    }

    async fn consume(&self, token_id: &Id<PasswordResetToken>, now: DateTime<Utc>) -> AppResult<bool> {
        self.session
            .with_tx(|tx| {
                let token_id = token_id.value;
                async move {
                    let result = sqlx::query(
                        r#"
                        UPDATE password_reset_tokens
                        SET used_at = $2
                        WHERE id = $1
                          AND used_at IS NULL
                          AND expires_at > $2
                    "#,
                    )
                    .bind(token_id)
                    .bind(now)
                    .execute(tx.as_mut())
                    .await?;

                    Ok(result.rows_affected() == 1)
                }
                .boxed()
            })
            .await
    }

    async fn delete_stale(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.session
            .with_tx(|tx| {
                async move {
                    let result = sqlx::query(
                        r#"
                        DELETE FROM password_reset_tokens
                        WHERE used_at IS NOT NULL
                           OR expires_at <= $1
                    "#,
                    )
                    .bind(now)
                    .execute(tx.as_mut())
                    .await?;

                    Ok(result.rows_affected())
                }
                .boxed()
            })
            .await
    }
}

#[async_trait]
impl PasswordResetTokenReader for PasswordResetTokenGateway {
    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<PasswordResetToken>> {
        self.session
            .with_tx(|tx| {
                let token_hash = token_hash.to_owned();
                async move {
                    let row = sqlx::query(
                        r#"
                            SELECT id, user_id, token_hash, expires_at, used_at, created_at
                            FROM password_reset_tokens
                            WHERE token_hash = $1
                        "#,
                    )
                    .bind(token_hash)
                    .fetch_optional(tx.as_mut())
                    .await?;

                    Self::get_password_reset(row)
                }
                .boxed()
            })
            .await
    }

    async fn find_by_user(&self, user_id: &Id<User>) -> AppResult<Option<PasswordResetToken>> {
        self.session
            .with_tx(|tx| {
                let user_id = user_id.value;
                async move {
                    let row = sqlx::query(
                        r#"
                            SELECT id, user_id, token_hash, expires_at, used_at, created_at
                            FROM password_reset_tokens
                            WHERE user_id = $1
                        "#,
                    )
                    .bind(user_id)
                    .fetch_optional(tx.as_mut())
                    .await?;

                    Self::get_password_reset(row)
                }
                .boxed()
            })
            .await
    }
}
