use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::errors::PersistenceError;
use crate::types::AdminRecord;

/// SHA-256 digest of admins file content, hex encoded
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persistence layer for the admins file
///
/// Owns the "last known good" fingerprint: the digest of whatever this
/// process last wrote or accepted as valid. The integrity monitor compares
/// the on-disk content against it.
pub struct AdminFileStore {
    path: PathBuf,
    last_good: Mutex<Option<Fingerprint>>,
}

impl AdminFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_good: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw file content
    pub async fn load(&self) -> Result<Vec<u8>, PersistenceError> {
        fs::read(&self.path)
            .await
            .map_err(|e| PersistenceError::from_io("read", &self.path, e))
    }

    /// Serialize records as pretty JSON and replace the file
    ///
    /// Writes to a sibling temp file and renames it over the target, then
    /// records the new fingerprint. Failures are returned, never retried.
    pub async fn save(&self, admins: &[AdminRecord]) -> Result<Fingerprint, PersistenceError> {
        let bytes = serde_json::to_vec_pretty(admins)?;
        let tmp_path = self.path.with_extension("tmp");

        fs::write(&tmp_path, &bytes)
            .await
            .map_err(|e| PersistenceError::from_io("write", &tmp_path, e))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| PersistenceError::from_io("rename", &self.path, e))?;

        let fingerprint = Fingerprint::of(&bytes);
        self.remember(fingerprint.clone());
        tracing::debug!(
            path = %self.path.display(),
            fingerprint = %fingerprint,
            admins = admins.len(),
            "Admins file saved"
        );
        Ok(fingerprint)
    }

    /// Create the file with compact JSON, failing if it already exists
    pub async fn create(&self, admins: &[AdminRecord]) -> Result<Fingerprint, PersistenceError> {
        let bytes = serde_json::to_vec(admins)?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
            .map_err(|e| PersistenceError::from_io("create", &self.path, e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| PersistenceError::from_io("write", &self.path, e))?;
        file.sync_all()
            .await
            .map_err(|e| PersistenceError::from_io("sync", &self.path, e))?;

        let fingerprint = Fingerprint::of(&bytes);
        self.remember(fingerprint.clone());
        Ok(fingerprint)
    }

    pub fn fingerprint(bytes: &[u8]) -> Fingerprint {
        Fingerprint::of(bytes)
    }

    /// Accept externally loaded content as the current known-good state
    pub fn remember(&self, fingerprint: Fingerprint) {
        *self.last_good.lock().unwrap_or_else(PoisonError::into_inner) = Some(fingerprint);
    }

    pub fn last_known_fingerprint(&self) -> Option<Fingerprint> {
        self.last_good
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
