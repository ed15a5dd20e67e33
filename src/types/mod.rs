// Types layer - Data structures shared by every layer
pub mod admin;
pub mod player;

pub use admin::{
    ADMIN_SCHEMA_VERSION, AdminRecord, MasterPassword, ProviderKind, ProviderLink, ProviderLinks,
    PublicAdmin,
};
pub use player::OnlinePlayer;
