//! Client error types.
//!
//! ```text
//! request ──► connect / timeout / decode failure ──► ClientError::Transient
//!         └─► non-2xx with { code, message }      ──► ClientError::Rejected
//! ```
//!
//! Both are recoverable: the console prints them and keeps running.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached or replied with something unreadable.
    #[error("Server unreachable: {0}")]
    Transient(#[from] reqwest::Error),

    /// The server answered with an error body.
    #[error("{message} ({code}, HTTP {status})")]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Transient(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Rejected { status: 404, .. })
    }

    /// The server's error code, when it sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Rejected { code, .. } => Some(code),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
