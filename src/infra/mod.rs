use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::adapter::clock::SystemClock;
use crate::adapter::crypto::argon2::ArgonPasswordHasher;
use crate::adapter::crypto::token::RandomTokenGenerator;
use crate::adapter::email::local::LocalEmailSender;
use crate::adapter::email::smtp::SMTPEmailSender;
use crate::adapter::memory::session::MemoryStore;
use crate::application::interactors::password_reset::PurgeStaleResetTokensInteractor;
use crate::application::interface::email::EmailSender;
use crate::domain::policy::PasswordPolicy;
use crate::infra::config::{AppConfig, DatabaseProvider, EmailProvider};
use crate::infra::db::init_db;
use crate::infra::state::{AppState, FromAppState, Storage};

pub mod app;
pub mod config;
pub mod db;
pub mod setup;
pub mod state;

async fn init_storage(config: &AppConfig) -> anyhow::Result<Storage> {
    match config.db.provider {
        DatabaseProvider::Postgres => Ok(Storage::Postgres(init_db(config).await?)),
        DatabaseProvider::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            Ok(Storage::Memory(MemoryStore::new()))
        }
    }
}

fn init_email_sender(config: &AppConfig) -> anyhow::Result<Arc<dyn EmailSender>> {
    match config.email.provider {
        EmailProvider::Smtp => {
            let smtp = config.smtp.as_ref().context("[smtp] section is missing")?;
            Ok(Arc::new(SMTPEmailSender::new(smtp)?))
        }
        EmailProvider::Local => Ok(Arc::new(LocalEmailSender::new(Path::new(
            &config.email.local_output_dir,
        )))),
    }
}

pub async fn init_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage = init_storage(config).await?;
    let hasher = ArgonPasswordHasher::from_config(&config.hasher)?;
    let email_sender = init_email_sender(config)?;

    Ok(AppState {
        storage,
        hasher: Arc::new(hasher),
        config: Arc::new(config.clone()),
        email_sender,
        token_generator: Arc::new(RandomTokenGenerator),
        clock: Arc::new(SystemClock),
        policy: PasswordPolicy::from(&config.password_policy),
    })
}

async fn purge_stale_tokens(state: &AppState) {
    let interactor = match PurgeStaleResetTokensInteractor::from_app_state(state).await {
        Ok(interactor) => interactor,
        Err(err) => {
            error!("Failed to build purge interactor: {}", err);
            return;
        }
    };
    match interactor.execute().await {
        Ok(0) => {}
        Ok(removed) => info!(removed, "Purged stale password reset tokens"),
        Err(err) => error!("Failed to purge stale password reset tokens: {}", err),
    }
}

/// Periodically removes expired and consumed reset tokens.
/// Returns `None` when `password_reset.purge_interval` is zero.
pub fn spawn_purge_task(state: AppState) -> Option<JoinHandle<()>> {
    let period = state.config.password_reset.purge_interval;
    if period == 0 {
        return None;
    }

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(period));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            purge_stale_tokens(&state).await;
        }
    }))
}
