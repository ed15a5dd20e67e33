// Stores layer - Persistence and the in-memory admin directory
pub mod admin_file_store;
pub mod admin_vault;

pub use admin_file_store::{AdminFileStore, Fingerprint};
pub use admin_vault::{
    AdminEdit, AdminVault, BootstrapOutcome, FlushOutcome, PendingFlush, ProviderUpdate,
    VaultDependencies, WeakAdminVault,
};
