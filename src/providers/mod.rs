// Providers layer - Collaborators the vault depends on
//
// Crypto is implemented here; the host-side collaborators (sessions, player
// roster, server process) are traits implemented by the embedding application.
pub mod collaborators;
pub mod crypto_provider;

pub use collaborators::{Detached, PlayerRoster, ProcessControl, SessionManager};
pub use crypto_provider::{CredentialHasher, CryptoProvider, TokenSource};
