use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Admins file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Permission denied on admins file: {}", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("Admins file already exists: {}", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("I/O error: {operation} on {} failed: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize admins: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PersistenceError {
    /// Classify an I/O failure by kind so callers can tell "missing" from "broken"
    pub fn from_io(operation: &'static str, path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            _ => Self::Io {
                operation,
                path,
                source,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
