use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use sqlx::PgPool;

use crate::adapter::db::gateway::password_reset::PasswordResetTokenGateway;
use crate::adapter::db::gateway::user::UserGateway;
use crate::adapter::db::session::SqlxSession;
use crate::adapter::memory::gateway::MemoryGateway;
use crate::adapter::memory::session::{MemorySession, MemoryStore};
use crate::application::app_error::{AppError, AppResult};
use crate::application::interactors::password_reset::{
    PurgeStaleResetTokensInteractor, RequestPasswordResetInteractor, ResetPasswordInteractor,
};
use crate::application::interactors::users::CreateUserInteractor;
use crate::application::interface::clock::Clock;
use crate::application::interface::crypto::{CredentialsHasher, TokenGenerator};
use crate::application::interface::db::DBSession;
use crate::application::interface::email::EmailSender;
use crate::application::interface::gateway::password_reset::{PasswordResetTokenReader, PasswordResetTokenWriter};
use crate::application::interface::gateway::user::{UserReader, UserWriter};
use crate::domain::policy::PasswordPolicy;
use crate::infra::config::AppConfig;

/// Backing store selected by `db.provider`.
#[derive(Clone)]
pub enum Storage {
    Postgres(PgPool),
    Memory(MemoryStore),
}

/// Gateways sharing one unit of work.
struct UnitOfWork {
    session: Arc<dyn DBSession>,
    user_reader: Arc<dyn UserReader>,
    user_writer: Arc<dyn UserWriter>,
    token_reader: Arc<dyn PasswordResetTokenReader>,
    token_writer: Arc<dyn PasswordResetTokenWriter>,
}

impl Storage {
    fn unit_of_work(&self) -> UnitOfWork {
        match self {
            Storage::Postgres(pool) => {
                let session = SqlxSession::new_lazy(pool.clone());
                let users = Arc::new(UserGateway::new(session.clone()));
                let tokens = Arc::new(PasswordResetTokenGateway::new(session.clone()));
                UnitOfWork {
                    session: Arc::new(session),
                    user_reader: users.clone(),
                    user_writer: users,
                    token_reader: tokens.clone(),
                    token_writer: tokens,
                }
            }
            Storage::Memory(store) => {
                let session = MemorySession::new_lazy(store.clone());
                let gateway = Arc::new(MemoryGateway::new(session.clone()));
                UnitOfWork {
                    session: Arc::new(session),
                    user_reader: gateway.clone(),
                    user_writer: gateway.clone(),
                    token_reader: gateway.clone(),
                    token_writer: gateway,
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub hasher: Arc<dyn CredentialsHasher>,
    pub config: Arc<AppConfig>,
    pub email_sender: Arc<dyn EmailSender>,
    pub token_generator: Arc<dyn TokenGenerator>,
    pub clock: Arc<dyn Clock>,
    pub policy: PasswordPolicy,
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

#[async_trait]
pub trait FromAppState: Sized {
    async fn from_app_state(state: &AppState) -> AppResult<Self>;
}

// CreateUserInteractor
#[async_trait]
impl FromAppState for CreateUserInteractor {
    async fn from_app_state(state: &AppState) -> AppResult<Self> {
        let uow = state.storage.unit_of_work();

        Ok(CreateUserInteractor::new(
            uow.session,
            uow.user_reader,
            uow.user_writer,
            state.hasher.clone(),
            state.policy.clone(),
            state.clock.clone(),
        ))
    }
}

impl<S> FromRequestParts<S> for CreateUserInteractor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> AppResult<Self> {
        let app_state = AppState::from_ref(state);
        CreateUserInteractor::from_app_state(&app_state).await
    }
}

// RequestPasswordResetInteractor
#[async_trait]
impl FromAppState for RequestPasswordResetInteractor {
    async fn from_app_state(state: &AppState) -> AppResult<Self> {
        let uow = state.storage.unit_of_work();

        Ok(RequestPasswordResetInteractor::new(
            uow.session,
            uow.token_writer,
            uow.user_reader,
            state.email_sender.clone(),
            state.token_generator.clone(),
            state.clock.clone(),
        ))
    }
}

impl<S> FromRequestParts<S> for RequestPasswordResetInteractor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> AppResult<Self> {
        let app_state = AppState::from_ref(state);
        RequestPasswordResetInteractor::from_app_state(&app_state).await
    }
}

// ResetPasswordInteractor
#[async_trait]
impl FromAppState for ResetPasswordInteractor {
    async fn from_app_state(state: &AppState) -> AppResult<Self> {
        let uow = state.storage.unit_of_work();

        Ok(ResetPasswordInteractor::new(
            uow.session,
            uow.token_reader,
            uow.token_writer,
            uow.user_reader,
            uow.user_writer,
            state.hasher.clone(),
            state.policy.clone(),
            state.clock.clone(),
        ))
    }
}

impl<S> FromRequestParts<S> for ResetPasswordInteractor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> AppResult<Self> {
        let app_state = AppState::from_ref(state);
        ResetPasswordInteractor::from_app_state(&app_state).await
    }
}

// PurgeStaleResetTokensInteractor, driven by the background purge task only.
#[async_trait]
impl FromAppState for PurgeStaleResetTokensInteractor {
    async fn from_app_state(state: &AppState) -> AppResult<Self> {
        let uow = state.storage.unit_of_work();

        Ok(PurgeStaleResetTokensInteractor::new(
            uow.session,
            uow.token_writer,
            state.clock.clone(),
        ))
    }
}
