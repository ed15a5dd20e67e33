/// Blanket permission held by the master and by full-access admins
pub const ALL_PERMISSIONS: &str = "all_permissions";

/// Combined messaging permission from before schema version 1
pub const LEGACY_MESSAGE: &str = "players.message";

pub const DIRECT_MESSAGE: &str = "players.direct_message";
pub const ANNOUNCEMENT: &str = "announcement";
pub const SERVER_LOG_VIEW: &str = "server.log.view";

/// A permission key and its human-readable label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permission {
    pub key: &'static str,
    pub label: &'static str,
}

const fn permission(key: &'static str, label: &'static str) -> Permission {
    Permission { key, label }
}

static PERMISSIONS: &[Permission] = &[
    permission(ALL_PERMISSIONS, "All Permissions"),
    permission("manage.admins", "Manage Admins"),
    permission("commands.resources", "Start/Stop Resources"),
    permission("server.cfg.editor", "Read/Write server.cfg"),
    permission("txadmin.log.view", "View System Logs"),
    permission(SERVER_LOG_VIEW, "View Server Logs"),
    permission("console.view", "Console: View"),
    permission("console.write", "Console: Write"),
    permission("control.server", "Start/Stop Server + Scheduler"),
    permission(ANNOUNCEMENT, "Send Announcements"),
    permission("settings.view", "Settings: View (no tokens)"),
    permission("settings.write", "Settings: Change"),
    permission("menu.vehicle", "Spawn / Fix Vehicles"),
    permission("menu.clear_area", "Reset world area"),
    permission("menu.viewids", "View Player IDs in-game"),
    permission(DIRECT_MESSAGE, "Direct Message"),
    permission("players.whitelist", "Whitelist"),
    permission("players.warn", "Warn"),
    permission("players.kick", "Kick"),
    permission("players.ban", "Ban"),
    permission("players.freeze", "Freeze Players"),
    permission("players.heal", "Heal"),
    permission("players.playermode", "NoClip / God Mode"),
    permission("players.spectate", "Spectate"),
    permission("players.teleport", "Teleport"),
    permission("players.troll", "Troll Actions"),
];

/// Static, ordered catalogue of the permissions an admin can hold
///
/// Stored permission lists are not validated against it.
pub struct PermissionRegistry;

impl PermissionRegistry {
    pub fn list() -> &'static [Permission] {
        PERMISSIONS
    }

    pub fn label(key: &str) -> Option<&'static str> {
        PERMISSIONS.iter().find(|p| p.key == key).map(|p| p.label)
    }

    pub fn is_registered(key: &str) -> bool {
        Self::label(key).is_some()
    }
}
