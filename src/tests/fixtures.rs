#![cfg(test)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::fixture;
use uuid::Uuid;

use crate::adapter::crypto::token::RandomTokenGenerator;
use crate::adapter::memory::session::MemoryStore;
use crate::domain::entities::user::User;
use crate::domain::policy::PasswordPolicy;
use crate::infra::config::{
    AppConfig, ApplicationConfig, DatabaseConfig, DatabaseProvider, EmailConfig, EmailProvider, LoggerConfig,
    PasswordPolicyConfig, PasswordResetConfig,
};
use crate::infra::state::{AppState, Storage};
use crate::tests::helpers::{Outbox, TestClock, fast_hasher, fast_hasher_config};

#[fixture]
pub fn test_config() -> AppConfig {
    AppConfig {
        db: DatabaseConfig {
            provider: DatabaseProvider::Memory,
            url: String::new(),
            max_connections: 5,
            run_migrations: false,
        },
        logger: LoggerConfig {
            log_path: "./test.log".to_string(),
        },
        application: ApplicationConfig {
            allow_origins: vec!["*".to_string()],
            address: "127.0.0.1:0".to_string(),
        },
        password_reset: PasswordResetConfig {
            ttl: 3_600,
            reset_url: "http://localhost/reset-password".to_string(),
            purge_interval: 0,
        },
        password_policy: PasswordPolicyConfig::default(),
        hasher: fast_hasher_config(),
        email: EmailConfig {
            provider: EmailProvider::Local,
            local_output_dir: "./tmp/test-emails".to_string(),
        },
        smtp: None,
    }
}

/// An isolated application over a fresh in-memory store.
pub struct TestApp {
    pub state: AppState,
    pub store: MemoryStore,
    pub outbox: Outbox,
    pub clock: TestClock,
}

impl TestApp {
    pub fn new(config: AppConfig, outbox: Outbox) -> Self {
        let store = MemoryStore::new();
        let clock = TestClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
        let state = AppState {
            storage: Storage::Memory(store.clone()),
            hasher: Arc::new(fast_hasher()),
            policy: PasswordPolicy::from(&config.password_policy),
            config: Arc::new(config),
            email_sender: Arc::new(outbox.clone()),
            token_generator: Arc::new(RandomTokenGenerator),
            clock: Arc::new(clock.clone()),
        };

        Self {
            state,
            store,
            outbox,
            clock,
        }
    }

    pub async fn stored_user(&self, user_id: &str) -> User {
        let id = Uuid::parse_str(user_id).expect("uuid user id");
        self.store.snapshot().await.users.remove(&id).expect("stored user")
    }

    pub async fn stored_password(&self, user_id: &str) -> String {
        self.stored_user(user_id).await.password
    }
}

#[fixture]
pub fn test_app(test_config: AppConfig) -> TestApp {
    TestApp::new(test_config, Outbox::default())
}
