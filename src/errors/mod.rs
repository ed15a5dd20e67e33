// Errors layer - Error type definitions
pub mod admin;
pub mod internal;

// Re-exports for convenience
pub use admin::{AdminVaultError, BootstrapError};
pub use internal::{
    CollaboratorError, CryptoError, InternalError, LoadError, PersistenceError,
};

#[cfg(test)]
mod admin_test;
