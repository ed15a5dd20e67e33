use serde_json::Value;

use crate::errors::CollaboratorError;
use crate::types::OnlinePlayer;

/// Web session manager of the host; asked to re-evaluate logged-in admins
pub trait SessionManager: Send + Sync {
    fn re_check_admin_auths(&self);
}

/// Source of the currently connected players
pub trait PlayerRoster: Send + Sync {
    fn player_list(&self) -> Result<Vec<OnlinePlayer>, CollaboratorError>;
}

/// Channel to the managed game server process
pub trait ProcessControl: Send + Sync {
    fn send_event(&self, event: &str, payload: Value) -> Result<(), CollaboratorError>;
}

/// Collaborator set for running without a host (operator console, tests)
///
/// No sessions, no players, and events are dropped after a debug log.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl SessionManager for Detached {
    fn re_check_admin_auths(&self) {
        tracing::debug!("No session manager attached; skipping admin auth re-check");
    }
}

impl PlayerRoster for Detached {
    fn player_list(&self) -> Result<Vec<OnlinePlayer>, CollaboratorError> {
        Ok(Vec::new())
    }
}

impl ProcessControl for Detached {
    fn send_event(&self, event: &str, payload: Value) -> Result<(), CollaboratorError> {
        tracing::debug!(event = %event, payload = %payload, "No server process attached; event dropped");
        Ok(())
    }
}
