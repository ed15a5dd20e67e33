use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::errors::CryptoError;

/// Hash prefixes accepted as "looks like a real hash, not plaintext"
pub const RECOGNIZED_HASH_PREFIXES: &[&str] = &[
    "$2a$",
    "$2b$",
    "$2y$",
    "$argon2id$",
    "$argon2i$",
    "$argon2d$",
];

const TOKEN_LENGTH: usize = 32;
const COMPONENT: &str = "CryptoProvider";

/// One-way password hashing function used by the admin directory
pub trait CredentialHasher: Send + Sync {
    fn hash_password(&self, plaintext: &str) -> Result<String, CryptoError>;
}

/// Random material for bootstrap PINs and anti-forgery tokens
pub trait TokenSource: Send + Sync {
    /// Opaque random token
    fn gen_token(&self) -> String;

    /// 4-digit numeric PIN, zero padded
    fn gen_pin(&self) -> String;
}

pub fn is_recognized_password_hash(candidate: &str) -> bool {
    RECOGNIZED_HASH_PREFIXES
        .iter()
        .any(|prefix| candidate.starts_with(prefix))
}

/// Cryptographic operations provider
///
/// Hashes with Argon2id and draws tokens from the thread-local CSPRNG.
pub struct CryptoProvider {
    params: Params,
}

impl CryptoProvider {
    /// Create a provider with the default Argon2id cost parameters
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Create a provider with explicit memory (KiB) and time costs
    ///
    /// Intended for constrained hosts and test suites.
    pub fn with_cost(m_cost_kib: u32, t_cost: u32) -> Result<Self, CryptoError> {
        let params = Params::new(m_cost_kib, t_cost, Params::DEFAULT_P_COST, None)
            .map_err(|e| CryptoError::hashing(COMPONENT, "argon2_params", e))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Verify a plaintext against a stored Argon2 hash
    ///
    /// Other recognized families (bcrypt) are reported as unsupported rather than as a mismatch.
    pub fn verify_password(&self, password_hash: &str, plaintext: &str) -> Result<bool, CryptoError> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| CryptoError::unsupported_hash(COMPONENT, e))?;

        Ok(self
            .argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}

impl Default for CryptoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for CryptoProvider {
    fn hash_password(&self, plaintext: &str) -> Result<String, CryptoError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| CryptoError::hashing(COMPONENT, "hash_password", e))?;
        Ok(hash.to_string())
    }
}

impl TokenSource for CryptoProvider {
    fn gen_token(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }

    fn gen_pin(&self) -> String {
        let pin: u32 = rand::rng().random_range(0..10_000);
        format!("{:04}", pin)
    }
}
