use std::sync::Arc;

use crate::config::{EnvironmentProvider, VaultSettings};
use crate::errors::InternalError;
use crate::providers::CryptoProvider;
use crate::services::OnlineAdminsNotifier;
use crate::stores::{AdminVault, VaultDependencies};

/// Centralized application data following the main-owned pattern
///
/// Everything is created once in main.rs (or by an embedding host) and
/// passed by reference; the vault itself is a cheap clonable handle.
///
/// ```text
/// AppData::init(env_provider, notifier)
///   ├─ settings (VaultSettings from the environment)
///   ├─ crypto (Arc<CryptoProvider>: argon2 hasher + token source)
///   └─ vault (AdminVault, not loaded until init/load is called)
/// ```
pub struct AppData {
    pub env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    pub settings: VaultSettings,
    pub crypto: Arc<CryptoProvider>,
    pub vault: AdminVault,
}

impl AppData {
    /// Build settings, providers and the vault
    ///
    /// # Errors
    ///
    /// Returns `InternalError::Config` when a setting is invalid
    pub fn init(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
        notifier: OnlineAdminsNotifier,
    ) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        let settings = VaultSettings::from_env_provider(env_provider.clone())?;
        tracing::debug!(settings = ?settings, "Vault settings loaded");

        let crypto = Arc::new(CryptoProvider::new());
        let vault = AdminVault::new(&settings, VaultDependencies::new(crypto.clone(), notifier));

        tracing::info!("AppData initialization complete");

        Ok(Self {
            env_provider,
            settings,
            crypto,
            vault,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApplicationError, MockEnvironment};

    #[test]
    fn test_init_uses_environment_settings() {
        let env = Arc::new(MockEnvironment::empty().with_var("ADMINS_FILE", "/tmp/vault-admins.json"));

        let app_data = AppData::init(env, OnlineAdminsNotifier::detached()).unwrap();

        assert_eq!(
            app_data.vault.admins_file(),
            std::path::Path::new("/tmp/vault-admins.json")
        );
        assert!(!app_data.vault.has_admins());
    }

    #[test]
    fn test_init_rejects_invalid_settings() {
        let env = Arc::new(MockEnvironment::empty().with_var("ADMINS_NOTIFY_DELAY_MS", "99999"));

        let result = AppData::init(env, OnlineAdminsNotifier::detached());

        assert!(matches!(
            result,
            Err(InternalError::Config(ApplicationError::InvalidSetting { .. }))
        ));
    }
}
