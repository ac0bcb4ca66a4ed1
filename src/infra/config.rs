use serde::{Deserialize, Serialize};

use crate::domain::policy::PasswordPolicy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseProvider {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub provider: DatabaseProvider,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub log_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub allow_origins: Vec<String>,
    pub address: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    Smtp,
    #[default]
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub provider: EmailProvider,
    pub local_output_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SMTPConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub from: String,
}

/// Token lifetime and link settings. `ttl` and `purge_interval` are seconds;
/// a zero `purge_interval` disables the background purge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetConfig {
    pub ttl: i64,
    pub reset_url: String,
    #[serde(default = "default_purge_interval")]
    pub purge_interval: u64,
}

fn default_purge_interval() -> u64 {
    3_600
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicyConfig {
    pub min_length: usize,
    pub max_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        let policy = PasswordPolicy::default();
        Self {
            min_length: policy.min_length,
            max_length: policy.max_length,
            require_uppercase: policy.require_uppercase,
            require_lowercase: policy.require_lowercase,
            require_digit: policy.require_digit,
            require_special: policy.require_special,
        }
    }
}

impl From<&PasswordPolicyConfig> for PasswordPolicy {
    fn from(config: &PasswordPolicyConfig) -> Self {
        PasswordPolicy {
            min_length: config.min_length,
            max_length: config.max_length,
            require_uppercase: config.require_uppercase,
            require_lowercase: config.require_lowercase,
            require_digit: config.require_digit,
            require_special: config.require_special,
        }
    }
}

/// Argon2id cost parameters. Memory is in KiB.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HasherConfig {
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_cost: argon2::Params::DEFAULT_M_COST,
            time_cost: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub db: DatabaseConfig,
    pub logger: LoggerConfig,
    pub application: ApplicationConfig,
    pub password_reset: PasswordResetConfig,
    #[serde(default)]
    pub password_policy: PasswordPolicyConfig,
    #[serde(default)]
    pub hasher: HasherConfig,
    pub email: EmailConfig,
    #[serde(default)]
    pub smtp: Option<SMTPConfig>,
}

/// Longest reset link lifetime a config may ask for, in seconds.
pub const MAX_RESET_TTL: i64 = 30 * 24 * 60 * 60;

impl AppConfig {
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<AppConfig> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<AppConfig> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.password_reset.ttl <= 0 {
            anyhow::bail!("password_reset.ttl must be positive");
        }
        if self.password_reset.ttl > MAX_RESET_TTL {
            anyhow::bail!("password_reset.ttl must not exceed {} seconds", MAX_RESET_TTL);
        }
        if self.password_policy.min_length > self.password_policy.max_length {
            anyhow::bail!("password_policy.min_length exceeds password_policy.max_length");
        }
        if self.db.provider == DatabaseProvider::Postgres && self.db.url.is_empty() {
            anyhow::bail!("db.url is required for the postgres provider");
        }
        if self.email.provider == EmailProvider::Smtp && self.smtp.is_none() {
            anyhow::bail!("[smtp] section is required for the smtp email provider");
        }
        Ok(())
    }
}
