// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use admin_vault::config::VaultSettings;
use admin_vault::errors::CollaboratorError;
use admin_vault::providers::{CryptoProvider, PlayerRoster, ProcessControl, SessionManager};
use admin_vault::services::OnlineAdminsNotifier;
use admin_vault::stores::{AdminVault, VaultDependencies};
use admin_vault::types::OnlinePlayer;
use serde_json::Value;
use tempfile::TempDir;

pub const BCRYPT_HASH: &str = "$2b$11$K3HwDzkoUfhU6.W.tScfhOLEtR5uNc9qpQ685emtERx3dZ7fmgXCy";

/// Argon2id with minimal cost so tests stay fast
pub fn fast_crypto() -> Arc<CryptoProvider> {
    Arc::new(CryptoProvider::with_cost(8, 1).expect("Failed to build test crypto provider"))
}

/// Fake game server host: fixed roster, records sent events
#[derive(Default)]
pub struct FakeHost {
    pub players: Vec<OnlinePlayer>,
    pub rechecks: Mutex<usize>,
    pub events: Mutex<Vec<(String, Value)>>,
}

impl SessionManager for FakeHost {
    fn re_check_admin_auths(&self) {
        *self.rechecks.lock().unwrap() += 1;
    }
}

impl PlayerRoster for FakeHost {
    fn player_list(&self) -> Result<Vec<OnlinePlayer>, CollaboratorError> {
        Ok(self.players.clone())
    }
}

impl ProcessControl for FakeHost {
    fn send_event(&self, event: &str, payload: Value) -> Result<(), CollaboratorError> {
        self.events.lock().unwrap().push((event.to_string(), payload));
        Ok(())
    }
}

pub fn notifier_for(host: &Arc<FakeHost>) -> OnlineAdminsNotifier {
    OnlineAdminsNotifier::new(host.clone(), host.clone(), host.clone())
}

/// Vault over `admins.json` inside `dir`; the monitor is slow so tests trigger checks
pub fn vault_in(dir: &TempDir, notifier: OnlineAdminsNotifier) -> AdminVault {
    let settings = VaultSettings::for_file(dir.path().join("admins.json"))
        .with_integrity_interval(Duration::from_secs(3600))
        .with_notify_delay(Duration::from_millis(10));
    AdminVault::new(&settings, VaultDependencies::new(fast_crypto(), notifier))
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
///
/// Environment variables are process-global, so tests that modify them
/// must run serially to avoid race conditions.
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
