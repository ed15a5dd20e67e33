use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::stores::admin_file_store::{AdminFileStore, Fingerprint};
use crate::stores::admin_vault::{AdminVault, WeakAdminVault};

/// Where the monitor currently is in its check cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    Idle,
    Checking,
    Restoring,
}

/// Result of one integrity check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityStatus {
    /// Nothing loaded yet, so there is no known-good state to compare against
    Skipped,
    Intact,
    Restored { fingerprint: Fingerprint },
    RestoreFailed { reason: String },
}

/// Handle to the periodic check task
pub struct MonitorHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Signal the task to exit and wait for it
    pub async fn stop(self) {
        self.shutdown.send_replace(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Integrity monitor task ended abnormally");
        }
    }
}

/// Start checking the vault's file every `period`
///
/// The first check happens one period after start. The task holds only a
/// weak reference and exits once the vault is dropped.
pub fn spawn(vault: WeakAdminVault, period: Duration) -> MonitorHandle {
    let (shutdown, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let Some(vault) = vault.upgrade() else {
                break;
            };
            check_integrity(&vault).await;
        }

        tracing::debug!("Integrity monitor stopped");
    });

    tracing::info!(period_secs = period.as_secs_f64(), "Integrity monitor started");
    MonitorHandle { shutdown, task }
}

/// Compare the file against the last known-good fingerprint and restore on drift
///
/// Holds the vault's write lock for the whole cycle so a concurrent flush
/// cannot be mistaken for tampering. Failures are logged, never returned.
pub(crate) async fn check_integrity(vault: &AdminVault) -> IntegrityStatus {
    let store = vault.store();
    let _writes = vault.lock_writes().await;

    let Some(expected) = store.last_known_fingerprint() else {
        return IntegrityStatus::Skipped;
    };
    let Some(admins) = vault.snapshot() else {
        return IntegrityStatus::Skipped;
    };

    vault.set_monitor_phase(MonitorPhase::Checking);
    let current = match store.load().await {
        Ok(bytes) => Some(AdminFileStore::fingerprint(&bytes)),
        Err(e) if e.is_not_found() => None,
        Err(e) => {
            tracing::warn!(error = %e, "Integrity check could not read admins file");
            None
        }
    };

    if current.as_ref() == Some(&expected) {
        vault.set_monitor_phase(MonitorPhase::Idle);
        return IntegrityStatus::Intact;
    }

    tracing::warn!(
        path = %store.path().display(),
        expected = %expected,
        found = current.as_ref().map(Fingerprint::as_str).unwrap_or("<missing>"),
        "Admins file was modified or deleted externally, restoring"
    );
    vault.set_monitor_phase(MonitorPhase::Restoring);
    let status = match store.save(&admins).await {
        Ok(fingerprint) => {
            tracing::info!(fingerprint = %fingerprint, "Admins file restored");
            IntegrityStatus::Restored { fingerprint }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to restore admins file");
            IntegrityStatus::RestoreFailed {
                reason: e.to_string(),
            }
        }
    };
    vault.set_monitor_phase(MonitorPhase::Idle);
    status
}
