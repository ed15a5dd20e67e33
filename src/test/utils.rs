// Test utilities shared across unit tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tempfile::TempDir;

use crate::config::VaultSettings;
use crate::errors::CollaboratorError;
use crate::providers::collaborators::{PlayerRoster, ProcessControl, SessionManager};
use crate::providers::crypto_provider::CryptoProvider;
use crate::services::online_admins::OnlineAdminsNotifier;
use crate::stores::admin_vault::{AdminVault, VaultDependencies};
use crate::types::admin::ADMIN_SCHEMA_VERSION;
use crate::types::{AdminRecord, MasterPassword, OnlinePlayer, ProviderKind, ProviderLink, ProviderLinks};

pub const TEST_BCRYPT_HASH: &str = "$2b$11$K3HwDzkoUfhU6.W.tScfhOLEtR5uNc9qpQ685emtERx3dZ7fmgXCy";

/// Argon2id with minimal cost so tests stay fast
pub fn fast_crypto_provider() -> Arc<CryptoProvider> {
    Arc::new(CryptoProvider::with_cost(8, 1).expect("Failed to build test crypto provider"))
}

pub fn admin_with_links(name: &str, is_master: bool, links: &[(ProviderKind, ProviderLink)]) -> AdminRecord {
    AdminRecord {
        schema_version: ADMIN_SCHEMA_VERSION,
        name: name.to_string(),
        is_master,
        password_hash: TEST_BCRYPT_HASH.to_string(),
        password_temporary: false,
        providers: links.iter().cloned().collect(),
        permissions: Vec::new(),
    }
}

pub fn discord_link(id: &str) -> ProviderLinks {
    let mut links = ProviderLinks::new();
    links.insert(
        ProviderKind::Discord,
        ProviderLink::new(id, format!("discord:{}", id)),
    );
    links
}

#[derive(Default)]
struct HostState {
    players: Vec<OnlinePlayer>,
    roster_fails: bool,
    rechecks: usize,
    events: Vec<(String, Value)>,
}

/// Fake host recording every collaborator call
#[derive(Clone, Default)]
pub struct RecordingHost {
    state: Arc<Mutex<HostState>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players(players: Vec<OnlinePlayer>) -> Self {
        let host = Self::new();
        host.state.lock().unwrap().players = players;
        host
    }

    pub fn failing_roster() -> Self {
        let host = Self::new();
        host.state.lock().unwrap().roster_fails = true;
        host
    }

    pub fn notifier(&self) -> OnlineAdminsNotifier {
        let host = Arc::new(self.clone());
        OnlineAdminsNotifier::new(host.clone(), host.clone(), host)
    }

    pub fn recheck_count(&self) -> usize {
        self.state.lock().unwrap().rechecks
    }

    pub fn events(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().events.clone()
    }
}

impl SessionManager for RecordingHost {
    fn re_check_admin_auths(&self) {
        self.state.lock().unwrap().rechecks += 1;
    }
}

impl PlayerRoster for RecordingHost {
    fn player_list(&self) -> Result<Vec<OnlinePlayer>, CollaboratorError> {
        let state = self.state.lock().unwrap();
        if state.roster_fails {
            return Err(CollaboratorError::new("RecordingHost", "player_list", "roster offline"));
        }
        Ok(state.players.clone())
    }
}

impl ProcessControl for RecordingHost {
    fn send_event(&self, event: &str, payload: Value) -> Result<(), CollaboratorError> {
        self.state.lock().unwrap().events.push((event.to_string(), payload));
        Ok(())
    }
}

/// Vault over `admins.json` in a temp dir; the monitor period is long so
/// tests drive integrity checks by hand.
pub fn create_test_vault(dir: &TempDir, host: &RecordingHost) -> AdminVault {
    let settings = VaultSettings::for_file(dir.path().join("admins.json"))
        .with_integrity_interval(Duration::from_secs(3600))
        .with_notify_delay(Duration::ZERO);
    AdminVault::new(
        &settings,
        VaultDependencies::new(fast_crypto_provider(), host.notifier()),
    )
}

/// Vault with a freshly created master "tabarra"
pub async fn setup_ready_vault() -> (TempDir, AdminVault, RecordingHost) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let host = RecordingHost::new();
    let vault = create_test_vault(&dir, &host);

    vault
        .create_master(
            "tabarra",
            discord_link("272800190639898628"),
            MasterPassword::Hashed(TEST_BCRYPT_HASH.to_string()),
        )
        .await
        .expect("Failed to create master");

    (dir, vault, host)
}
