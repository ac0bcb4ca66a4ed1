use crate::{
    application::{
        app_error::{AppError, AppResult},
        interface::crypto::CredentialsHasher,
    },
    infra::config::HasherConfig,
};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{SaltString, rand_core::OsRng},
};
use async_trait::async_trait;

/// Argon2id hasher. Hashing runs on the blocking pool so it never stalls the runtime.
#[derive(Default, Clone)]
pub struct ArgonPasswordHasher {
    hasher: Argon2<'static>,
}

impl ArgonPasswordHasher {
    pub fn from_config(config: &HasherConfig) -> anyhow::Result<Self> {
        let params = Params::new(config.memory_cost, config.time_cost, config.parallelism, None)
            .map_err(|err| anyhow::anyhow!("invalid argon2 parameters: {}", err))?;
        Ok(Self {
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

#[async_trait]
impl CredentialsHasher for ArgonPasswordHasher {
    async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_owned();
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            hasher
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|_| AppError::PasswordHashError)
        })
        .await
        .map_err(|_| AppError::PasswordHashError)?
    }

    async fn verify_password(&self, password: &str, hashed: &str) -> AppResult<bool> {
        let password = password.to_owned();
        let hashed = hashed.to_owned();
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&hashed).map_err(|_| AppError::PasswordHashError)?;
            Ok(hasher.verify_password(password.as_bytes(), &parsed_hash).is_ok())
        })
        .await
        .map_err(|_| AppError::PasswordHashError)?
    }
}
