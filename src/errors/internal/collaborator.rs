use thiserror::Error;

/// Failure reported by a host-side collaborator (roster, process control)
#[derive(Error, Debug)]
#[error("{collaborator} failed during {operation}: {message}")]
pub struct CollaboratorError {
    pub collaborator: &'static str,
    pub operation: &'static str,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(collaborator: &'static str, operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            operation,
            message: message.into(),
        }
    }
}
