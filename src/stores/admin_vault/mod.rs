//! Admin Directory: the in-memory admin collection and its invariants.
//!
//! Reads are served from memory and always return owned copies. Mutations
//! update memory synchronously and hand the disk write plus the online-admin
//! notification to a background task, returning a [`PendingFlush`] the
//! caller may await or drop.

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::Duration;

use tokio::sync::{oneshot, watch};

use crate::config::VaultSettings;
use crate::providers::crypto_provider::{CredentialHasher, CryptoProvider, TokenSource};
use crate::services::integrity_monitor::{self, IntegrityStatus, MonitorHandle, MonitorPhase};
use crate::services::online_admins::OnlineAdminsNotifier;
use crate::stores::admin_file_store::{AdminFileStore, Fingerprint};
use crate::types::admin::normalize_key;
use crate::types::{AdminRecord, ProviderKind, PublicAdmin};

mod bootstrap;
mod mutations;

pub use bootstrap::BootstrapOutcome;
pub use mutations::{AdminEdit, ProviderUpdate};

/// Lifecycle of the directory contents
#[derive(Debug, Clone)]
pub(crate) enum VaultState {
    /// Nothing loaded yet
    Absent,
    /// No admins file; a master must be created with the operator PIN
    AwaitingMaster { pin: String },
    Ready { admins: Vec<AdminRecord> },
}

/// Outcome of a background flush
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    Persisted { fingerprint: Fingerprint },
    /// The directory was not loaded, nothing to write
    Skipped,
    Failed { reason: String },
}

/// Completion signal of the write + notify tail of a mutation
#[derive(Debug)]
pub struct PendingFlush {
    rx: oneshot::Receiver<FlushOutcome>,
}

impl PendingFlush {
    pub async fn wait(self) -> FlushOutcome {
        self.rx.await.unwrap_or_else(|_| FlushOutcome::Failed {
            reason: "flush task ended before reporting".to_string(),
        })
    }
}

/// Collaborators the vault is built with
#[derive(Clone)]
pub struct VaultDependencies {
    pub hasher: Arc<dyn CredentialHasher>,
    pub tokens: Arc<dyn TokenSource>,
    pub notifier: OnlineAdminsNotifier,
}

impl VaultDependencies {
    pub fn new(crypto: Arc<CryptoProvider>, notifier: OnlineAdminsNotifier) -> Self {
        Self {
            hasher: crypto.clone(),
            tokens: crypto,
            notifier,
        }
    }
}

struct VaultInner {
    store: AdminFileStore,
    state: RwLock<VaultState>,
    /// Serializes every file write (flushes, restores, master creation)
    write_lock: tokio::sync::Mutex<()>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenSource>,
    notifier: OnlineAdminsNotifier,
    integrity_interval: Duration,
    notify_delay: Duration,
    monitor: Mutex<Option<MonitorHandle>>,
    phase: watch::Sender<MonitorPhase>,
}

/// Shared handle to the admin directory
#[derive(Clone)]
pub struct AdminVault {
    inner: Arc<VaultInner>,
}

/// Non-owning handle held by background tasks
#[derive(Clone)]
pub struct WeakAdminVault(Weak<VaultInner>);

impl WeakAdminVault {
    pub fn upgrade(&self) -> Option<AdminVault> {
        self.0.upgrade().map(|inner| AdminVault { inner })
    }
}

impl AdminVault {
    pub fn new(settings: &VaultSettings, deps: VaultDependencies) -> Self {
        let (phase, _) = watch::channel(MonitorPhase::Idle);
        Self {
            inner: Arc::new(VaultInner {
                store: AdminFileStore::new(settings.admins_file()),
                state: RwLock::new(VaultState::Absent),
                write_lock: tokio::sync::Mutex::new(()),
                hasher: deps.hasher,
                tokens: deps.tokens,
                notifier: deps.notifier,
                integrity_interval: settings.integrity_interval(),
                notify_delay: settings.notify_delay(),
                monitor: Mutex::new(None),
                phase,
            }),
        }
    }

    pub fn downgrade(&self) -> WeakAdminVault {
        WeakAdminVault(Arc::downgrade(&self.inner))
    }

    /// True once a directory with a master is loaded or created
    pub fn has_admins(&self) -> bool {
        matches!(*self.read_state(), VaultState::Ready { .. })
    }

    /// PIN for creating the master, while no admins file exists
    pub fn add_master_pin(&self) -> Option<String> {
        match &*self.read_state() {
            VaultState::AwaitingMaster { pin } => Some(pin.clone()),
            _ => None,
        }
    }

    pub fn admin_by_name(&self, name: &str) -> Option<AdminRecord> {
        let wanted = normalize_key(name)?;
        self.find(|admin| admin.matches_name(&wanted))
    }

    pub fn admin_by_provider_uid(&self, provider: ProviderKind, uid: &str) -> Option<AdminRecord> {
        let wanted = normalize_key(uid)?;
        self.find(|admin| admin.has_provider_id(provider, &wanted))
    }

    /// First admin linked to any of the given connection identifiers
    pub fn admin_by_identifiers(&self, identifiers: &[String]) -> Option<AdminRecord> {
        let wanted: Vec<String> = identifiers.iter().filter_map(|id| normalize_key(id)).collect();
        if wanted.is_empty() {
            return None;
        }
        self.find(|admin| admin.matches_any_identifier(&wanted))
    }

    pub fn list_public(&self) -> Vec<PublicAdmin> {
        match &*self.read_state() {
            VaultState::Ready { admins } => admins.iter().map(PublicAdmin::from).collect(),
            _ => Vec::new(),
        }
    }

    pub fn list_raw(&self) -> Vec<AdminRecord> {
        self.snapshot().unwrap_or_default()
    }

    /// Fresh anti-forgery token for the web layer
    pub fn csrf_token(&self) -> String {
        self.inner.tokens.gen_token()
    }

    /// Run one integrity check now, outside of the monitor schedule
    pub async fn check_integrity(&self) -> IntegrityStatus {
        integrity_monitor::check_integrity(self).await
    }

    pub fn monitor_phase(&self) -> MonitorPhase {
        *self.inner.phase.borrow()
    }

    pub fn is_monitoring(&self) -> bool {
        self.inner
            .monitor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn admins_file(&self) -> &std::path::Path {
        self.inner.store.path()
    }

    /// Stop the integrity monitor task, if running
    pub async fn stop_monitor(&self) {
        let monitor = self
            .inner
            .monitor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = monitor {
            handle.stop().await;
        }
    }

    /// Stop the integrity monitor and write the directory one last time
    pub async fn shutdown(&self) -> FlushOutcome {
        self.stop_monitor().await;

        let outcome = self.flush().await;
        tracing::info!(outcome = ?outcome, "Admin vault shut down");
        outcome
    }

    pub(crate) fn store(&self) -> &AdminFileStore {
        &self.inner.store
    }

    pub(crate) async fn lock_writes(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.inner.write_lock.lock().await
    }

    pub(crate) fn set_monitor_phase(&self, phase: MonitorPhase) {
        self.inner.phase.send_replace(phase);
    }

    /// Copy of the loaded admins, `None` before a directory exists
    pub(crate) fn snapshot(&self) -> Option<Vec<AdminRecord>> {
        match &*self.read_state() {
            VaultState::Ready { admins } => Some(admins.clone()),
            _ => None,
        }
    }

    fn find(&self, predicate: impl Fn(&AdminRecord) -> bool) -> Option<AdminRecord> {
        match &*self.read_state() {
            VaultState::Ready { admins } => admins.iter().find(|admin| predicate(admin)).cloned(),
            _ => None,
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, VaultState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, VaultState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_monitor(&self) {
        let mut monitor = self
            .inner
            .monitor
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if monitor.is_none() {
            *monitor = Some(integrity_monitor::spawn(
                self.downgrade(),
                self.inner.integrity_interval,
            ));
        }
    }

    /// Write the current in-memory directory to disk
    async fn flush(&self) -> FlushOutcome {
        let _writes = self.lock_writes().await;
        let Some(admins) = self.snapshot() else {
            return FlushOutcome::Skipped;
        };

        match self.inner.store.save(&admins).await {
            Ok(fingerprint) => FlushOutcome::Persisted { fingerprint },
            Err(e) => {
                tracing::error!(error = %e, "Failed to save admins file");
                FlushOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Hand the write and the notification to a background task
    fn schedule_flush(&self, notify_delay: Duration) -> PendingFlush {
        let (tx, rx) = oneshot::channel();
        let vault = self.clone();

        tokio::spawn(async move {
            let outcome = vault.flush().await;

            if !notify_delay.is_zero() {
                tokio::time::sleep(notify_delay).await;
            }
            if let Some(admins) = vault.snapshot() {
                vault.inner.notifier.refresh(&admins);
            }

            let _ = tx.send(outcome);
        });

        PendingFlush { rx }
    }
}
