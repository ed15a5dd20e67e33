use super::mutations::{validate_links, validate_new_name};
use super::{AdminVault, VaultState};
use crate::config::DefaultMaster;
use crate::errors::{AdminVaultError, BootstrapError, LoadError};
use crate::providers::crypto_provider::is_recognized_password_hash;
use crate::services::permission_registry::ALL_PERMISSIONS;
use crate::services::record_migrator::parse_admins;
use crate::stores::admin_file_store::AdminFileStore;
use crate::types::admin::ADMIN_SCHEMA_VERSION;
use crate::types::{AdminRecord, MasterPassword, ProviderLinks};

/// What startup produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// An existing admins file was loaded
    Loaded { admins: usize },
    /// No file existed; the master was created from default credentials
    Created { name: String },
    /// No file and no default credentials; the operator must create the master
    AwaitingMaster { pin: String },
}

impl AdminVault {
    /// Run first-start logic: load the file, or create or await the master
    pub async fn init(&self, default_master: Option<&DefaultMaster>) -> Result<BootstrapOutcome, BootstrapError> {
        match self.load().await {
            Ok(admins) => Ok(BootstrapOutcome::Loaded { admins }),
            Err(LoadError::NotFound) if self.has_admins() => {
                Err(AdminVaultError::AlreadyInitialized.into())
            }
            Err(LoadError::NotFound) => match default_master {
                Some(master) => {
                    tracing::info!(admin = %master.name, "No admins file, creating master from default credentials");
                    self.create_master(&master.name, ProviderLinks::new(), master.password.clone())
                        .await?;
                    Ok(BootstrapOutcome::Created {
                        name: master.name.clone(),
                    })
                }
                None => {
                    let pin = self.issue_master_pin();
                    tracing::warn!("No admins file found, waiting for the master account to be created");
                    Ok(BootstrapOutcome::AwaitingMaster { pin })
                }
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Load, validate and migrate the admins file, replacing the directory
    ///
    /// On failure the previous state is left untouched. A migrated file is
    /// rewritten right away; if that write fails the integrity monitor retries it.
    pub async fn load(&self) -> Result<usize, LoadError> {
        let raw = self.inner.store.load().await?;
        let loaded = parse_admins(&raw)?;
        let count = loaded.admins.len();

        {
            let _writes = self.lock_writes().await;
            self.inner.store.remember(AdminFileStore::fingerprint(&raw));
            *self.write_state() = VaultState::Ready {
                admins: loaded.admins.clone(),
            };

            if loaded.migrated {
                tracing::warn!("Admins file was migrated to schema version {}, rewriting it", ADMIN_SCHEMA_VERSION);
                if let Err(e) = self.inner.store.save(&loaded.admins).await {
                    tracing::warn!(error = %e, "Failed to rewrite migrated admins file");
                }
            }
        }

        tracing::info!(admins = count, path = %self.inner.store.path().display(), "Admins file loaded");
        self.start_monitor();
        Ok(count)
    }

    /// Create the master account and the admins file
    ///
    /// The file is created strictly: an existing file is an error, never overwritten.
    pub async fn create_master(
        &self,
        name: &str,
        providers: ProviderLinks,
        password: MasterPassword,
    ) -> Result<(), AdminVaultError> {
        if self.has_admins() {
            return Err(AdminVaultError::AlreadyInitialized);
        }
        let name = validate_new_name(name)?;
        validate_links(providers.iter().map(|(kind, link)| (*kind, link)))?;

        let password_hash = match password {
            MasterPassword::Plaintext(plaintext) => self.inner.hasher.hash_password(&plaintext)?,
            MasterPassword::Hashed(hash) if is_recognized_password_hash(&hash) => hash,
            MasterPassword::Hashed(_) => return Err(AdminVaultError::InvalidPasswordHash),
        };

        let master = AdminRecord {
            schema_version: ADMIN_SCHEMA_VERSION,
            name: name.clone(),
            is_master: true,
            password_hash,
            password_temporary: false,
            providers,
            permissions: vec![ALL_PERMISSIONS.to_string()],
        };

        {
            let _writes = self.lock_writes().await;
            if self.has_admins() {
                return Err(AdminVaultError::AlreadyInitialized);
            }

            let admins = vec![master];
            self.inner.store.create(&admins).await?;
            *self.write_state() = VaultState::Ready { admins };
        }

        tracing::info!(admin = %name, "Master admin created");
        self.start_monitor();
        if let Some(admins) = self.snapshot() {
            self.inner.notifier.refresh(&admins);
        }
        Ok(())
    }

    /// Move an empty directory into the PIN-protected awaiting state
    fn issue_master_pin(&self) -> String {
        let mut state = self.write_state();
        if let VaultState::AwaitingMaster { pin } = &*state {
            return pin.clone();
        }

        let pin = self.inner.tokens.gen_pin();
        *state = VaultState::AwaitingMaster { pin: pin.clone() };
        pin
    }
}
