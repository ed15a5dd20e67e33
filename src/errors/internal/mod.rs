use thiserror::Error;

pub mod collaborator;
pub mod crypto;
pub mod load;
pub mod persistence;

pub use collaborator::CollaboratorError;
pub use crypto::CryptoError;
pub use load::LoadError;
pub use persistence::PersistenceError;

use crate::config::{ApplicationError, LoggingError};
use crate::errors::admin::{AdminVaultError, BootstrapError};

/// Process-level error type for startup and the operator console
///
/// Infrastructure errors (config, logging) sit next to the domain errors of the vault.
/// Not meant for the web layer, which matches on `AdminVaultError` directly.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Config(#[from] ApplicationError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Vault(#[from] AdminVaultError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
}
