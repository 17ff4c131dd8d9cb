use thiserror::Error;

/// Outcome of every operation that can reach the auth backend.
///
/// `Ok` is the success variant; `Err` always carries a user-facing message.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Login errors, all of them recoverable by further input or a retry.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Input rejected locally (phone too short, code incomplete). Never reaches the backend.
    #[error("{0}")]
    Validation(String),

    /// The backend answered but refused the request (unknown phone, wrong code).
    #[error("{0}")]
    Rejected(String),

    /// The backend call itself failed.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        cause: anyhow::Error,
    },
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn transport(message: impl Into<String>, cause: anyhow::Error) -> Self {
        Self::Transport {
            message: message.into(),
            cause,
        }
    }

    /// Message shown to the user.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message) | Self::Rejected(message) => message,
            Self::Transport { message, .. } => message,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
