use thiserror::Error;

use super::PersistenceError;

/// Fatal reasons an admins file cannot become the live directory
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Admins file not found")]
    NotFound,

    #[error("Admins file unreadable: {0}")]
    Unreadable(#[source] PersistenceError),

    #[error("Admins file is empty")]
    Empty,

    #[error("Admins file is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("Admins file must contain a JSON array")]
    NotAList,

    #[error("Admins file contains no admins")]
    EmptyList,

    #[error("Admin at index {index} is invalid: {reason}")]
    StructurallyInvalid { index: usize, reason: String },

    #[error("Admins file must have exactly one master admin, found {count}")]
    MasterCountInvalid { count: usize },
}

impl LoadError {
    pub fn structurally_invalid(index: usize, reason: impl Into<String>) -> Self {
        Self::StructurallyInvalid {
            index,
            reason: reason.into(),
        }
    }

    /// Stable machine-readable category
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            Self::Unreadable(_) => "unreadable",
            Self::Empty => "empty",
            Self::MalformedJson(_) => "malformed-json",
            Self::NotAList => "not-a-list",
            Self::EmptyList => "empty-list",
            Self::StructurallyInvalid { .. } => "structurally-invalid",
            Self::MasterCountInvalid { .. } => "master-count-invalid",
        }
    }
}

impl From<PersistenceError> for LoadError {
    fn from(err: PersistenceError) -> Self {
        if err.is_not_found() {
            Self::NotFound
        } else {
            Self::Unreadable(err)
        }
    }
}
