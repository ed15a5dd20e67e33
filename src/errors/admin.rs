use thiserror::Error;

use crate::errors::internal::{CryptoError, LoadError, PersistenceError};
use crate::types::ProviderKind;

/// Recoverable admin directory errors surfaced to callers (e.g. the web layer)
#[derive(Error, Debug)]
pub enum AdminVaultError {
    #[error("Admin directory is not initialized")]
    Uninitialized,

    #[error("Admin directory is already initialized")]
    AlreadyInitialized,

    #[error("Username already taken: {0}")]
    NameTaken(String),

    #[error("{provider} ID already taken: {id}")]
    ProviderIdTaken { provider: ProviderKind, id: String },

    #[error("Invalid {provider} link: {reason}")]
    InvalidProviderLink { provider: ProviderKind, reason: String },

    #[error("Admin not found: {0}")]
    NotFound(String),

    #[error("The master admin cannot be deleted: {0}")]
    MasterProtected(String),

    #[error("Invalid admin name: {0}")]
    InvalidName(String),

    #[error("Password hash is not in a recognized hash format")]
    InvalidPasswordHash,

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl AdminVaultError {
    pub fn name_taken(name: &str) -> Self {
        Self::NameTaken(name.to_string())
    }

    pub fn provider_id_taken(provider: ProviderKind, id: &str) -> Self {
        Self::ProviderIdTaken {
            provider,
            id: id.to_string(),
        }
    }

    pub fn invalid_provider_link(provider: ProviderKind, reason: impl Into<String>) -> Self {
        Self::InvalidProviderLink {
            provider,
            reason: reason.into(),
        }
    }

    pub fn not_found(name: &str) -> Self {
        Self::NotFound(name.to_string())
    }

    pub fn invalid_name(reason: impl Into<String>) -> Self {
        Self::InvalidName(reason.into())
    }

    /// Error code identifier for the web layer
    pub fn code(&self) -> &'static str {
        match self {
            Self::Uninitialized => "directory_uninitialized",
            Self::AlreadyInitialized => "already_initialized",
            Self::NameTaken(_) => "name_taken",
            Self::ProviderIdTaken { .. } => "provider_id_taken",
            Self::InvalidProviderLink { .. } => "invalid_provider_link",
            Self::NotFound(_) => "admin_not_found",
            Self::MasterProtected(_) => "master_protected",
            Self::InvalidName(_) => "invalid_name",
            Self::InvalidPasswordHash => "invalid_password_hash",
            Self::Crypto(_) => "crypto_error",
            Self::Persistence(_) => "persistence_error",
        }
    }
}

/// Startup failure of the vault
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Failed to load admins: {0}")]
    Load(#[from] LoadError),

    #[error("Failed to create master admin: {0}")]
    Vault(#[from] AdminVaultError),
}
