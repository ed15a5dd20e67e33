#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Password hashing failed in {component} during {operation}: {message}")]
    Hashing {
        operation: &'static str,
        component: &'static str,
        message: String,
    },

    #[error("Unsupported password hash in {component}: {message}")]
    UnsupportedHash {
        component: &'static str,
        message: String,
    },
}

impl CryptoError {
    pub fn hashing(component: &'static str, operation: &'static str, message: impl ToString) -> Self {
        Self::Hashing {
            operation,
            component,
            message: message.to_string(),
        }
    }

    pub fn unsupported_hash(component: &'static str, message: impl ToString) -> Self {
        Self::UnsupportedHash {
            component,
            message: message.to_string(),
        }
    }
}
