use std::sync::Arc;

use serde_json::json;

use crate::providers::collaborators::{Detached, PlayerRoster, ProcessControl, SessionManager};
use crate::types::admin::normalize_key;
use crate::types::{AdminRecord, OnlinePlayer};

/// Event pushed to the game server after the directory changes
pub const ADMINS_UPDATED_EVENT: &str = "adminsUpdated";

/// Post-mutation notification: session re-check plus the online admin list
///
/// Every step is best-effort. Collaborator failures are logged and swallowed.
#[derive(Clone)]
pub struct OnlineAdminsNotifier {
    sessions: Arc<dyn SessionManager>,
    roster: Arc<dyn PlayerRoster>,
    process: Arc<dyn ProcessControl>,
}

impl OnlineAdminsNotifier {
    pub fn new(
        sessions: Arc<dyn SessionManager>,
        roster: Arc<dyn PlayerRoster>,
        process: Arc<dyn ProcessControl>,
    ) -> Self {
        Self {
            sessions,
            roster,
            process,
        }
    }

    /// Notifier for a vault running without a host
    pub fn detached() -> Self {
        let detached = Arc::new(Detached);
        Self::new(detached.clone(), detached.clone(), detached)
    }

    pub fn refresh(&self, admins: &[AdminRecord]) {
        self.sessions.re_check_admin_auths();

        let players = match self.roster.player_list() {
            Ok(players) => players,
            Err(e) => {
                tracing::warn!(error = %e, "Could not fetch player list for online admins");
                return;
            }
        };

        let net_ids = online_admin_net_ids(admins, &players);
        tracing::debug!(online_admins = net_ids.len(), "Sending {}", ADMINS_UPDATED_EVENT);
        if let Err(e) = self.process.send_event(ADMINS_UPDATED_EVENT, json!(net_ids)) {
            tracing::error!(error = %e, "Failed to send {} event", ADMINS_UPDATED_EVENT);
        }
    }
}

/// Net ids of connected players holding an identifier linked to any admin
pub fn online_admin_net_ids(admins: &[AdminRecord], players: &[OnlinePlayer]) -> Vec<u32> {
    players
        .iter()
        .filter(|player| {
            let ids: Vec<String> = player.ids.iter().filter_map(|id| normalize_key(id)).collect();
            !ids.is_empty() && admins.iter().any(|admin| admin.matches_any_identifier(&ids))
        })
        .map(|player| player.net_id)
        .collect()
}
