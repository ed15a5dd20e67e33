use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::EnvironmentProvider;
use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ApplicationError;
use crate::providers::crypto_provider::is_recognized_password_hash;
use crate::types::MasterPassword;

const DEFAULT_ADMINS_FILE: &str = "admins.json";
const DEFAULT_INTEGRITY_INTERVAL_SECS: u64 = 15;
const DEFAULT_NOTIFY_DELAY_MS: u64 = 250;

/// Externally supplied credentials for creating the master non-interactively
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultMaster {
    pub name: String,
    pub password: MasterPassword,
}

/// Settings for the admin vault
pub struct VaultSettings {
    admins_file: PathBuf,
    integrity_interval: Duration,
    notify_delay: Duration,
    default_master: Option<DefaultMaster>,
}

impl VaultSettings {
    /// Load vault settings from environment variables using ConfigSpec
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ApplicationError> {
        let admins_file = ConfigSpec::new(env_provider.clone())
            .env_override("ADMINS_FILE")
            .default_value(DEFAULT_ADMINS_FILE)
            .min_length(1)
            .load_setting_with_source()?
            .value;

        let interval_value = ConfigSpec::new(env_provider.clone())
            .env_override("ADMINS_INTEGRITY_INTERVAL_SECS")
            .default_value("15")
            .load_setting_with_source()?
            .value;
        let integrity_interval =
            ConfigSpec::parse_duration_secs(&interval_value, "ADMINS_INTEGRITY_INTERVAL_SECS", 1..=3600)?;

        let delay_value = ConfigSpec::new(env_provider.clone())
            .env_override("ADMINS_NOTIFY_DELAY_MS")
            .default_value("250")
            .load_setting_with_source()?
            .value;
        let notify_delay =
            ConfigSpec::parse_duration_millis(&delay_value, "ADMINS_NOTIFY_DELAY_MS", 0..=10_000)?;

        let default_master = Self::load_default_master(env_provider)?;

        Ok(Self {
            admins_file: PathBuf::from(admins_file),
            integrity_interval,
            notify_delay,
            default_master,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    /// Default settings for a given admins file, without default credentials
    pub fn for_file(admins_file: impl Into<PathBuf>) -> Self {
        Self {
            admins_file: admins_file.into(),
            integrity_interval: Duration::from_secs(DEFAULT_INTEGRITY_INTERVAL_SECS),
            notify_delay: Duration::from_millis(DEFAULT_NOTIFY_DELAY_MS),
            default_master: None,
        }
    }

    pub fn with_integrity_interval(mut self, interval: Duration) -> Self {
        self.integrity_interval = interval;
        self
    }

    pub fn with_notify_delay(mut self, delay: Duration) -> Self {
        self.notify_delay = delay;
        self
    }

    pub fn with_default_master(mut self, default_master: DefaultMaster) -> Self {
        self.default_master = Some(default_master);
        self
    }

    pub fn admins_file(&self) -> &Path {
        &self.admins_file
    }

    pub fn integrity_interval(&self) -> Duration {
        self.integrity_interval
    }

    pub fn notify_delay(&self) -> Duration {
        self.notify_delay
    }

    pub fn default_master(&self) -> Option<&DefaultMaster> {
        self.default_master.as_ref()
    }

    /// A name plus exactly one of the two password variables
    fn load_default_master(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Option<DefaultMaster>, ApplicationError> {
        let name = ConfigSpec::new(env_provider.clone())
            .env_override("DEFAULT_MASTER_NAME")
            .min_length(3)
            .max_length(20)
            .load_optional()?
            .map(|v| v.value.trim().to_string());

        let plaintext = ConfigSpec::new(env_provider.clone())
            .env_override("DEFAULT_MASTER_PASSWORD")
            .load_optional()?
            .map(|v| v.value);

        let hashed = ConfigSpec::new(env_provider)
            .env_override("DEFAULT_MASTER_PASSWORD_HASH")
            .validator(|value| {
                if is_recognized_password_hash(value) {
                    Ok(())
                } else {
                    Err("Value is not a recognized password hash".to_string())
                }
            })
            .load_optional()?
            .map(|v| v.value);

        let password = match (plaintext, hashed) {
            (Some(_), Some(_)) => {
                return Err(ApplicationError::invalid_setting(
                    "DEFAULT_MASTER_PASSWORD",
                    "Set either DEFAULT_MASTER_PASSWORD or DEFAULT_MASTER_PASSWORD_HASH, not both",
                ));
            }
            (Some(plaintext), None) => Some(MasterPassword::Plaintext(plaintext)),
            (None, Some(hash)) => Some(MasterPassword::Hashed(hash)),
            (None, None) => None,
        };

        match (name, password) {
            (Some(name), Some(password)) => Ok(Some(DefaultMaster { name, password })),
            (None, None) => Ok(None),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!(
                    "Default master credentials need both DEFAULT_MASTER_NAME and a password; ignoring them"
                );
                Ok(None)
            }
        }
    }
}

impl fmt::Debug for VaultSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultSettings")
            .field("admins_file", &self.admins_file)
            .field("integrity_interval", &self.integrity_interval)
            .field("notify_delay", &self.notify_delay)
            .field(
                "default_master",
                &self.default_master.as_ref().map(|m| m.name.as_str()),
            )
            .finish()
    }
}
