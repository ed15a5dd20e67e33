// Services layer - Registry, migration, integrity checks and notifications
pub mod integrity_monitor;
pub mod online_admins;
pub mod permission_registry;
pub mod record_migrator;

pub use integrity_monitor::{IntegrityStatus, MonitorHandle, MonitorPhase};
pub use online_admins::{ADMINS_UPDATED_EVENT, OnlineAdminsNotifier};
pub use permission_registry::{Permission, PermissionRegistry};
pub use record_migrator::{LoadedAdmins, parse_admins};
