//! Error handling for webrequest

use crate::config::HttpMethod;
use thiserror::Error;

/// Main error type for webrequest operations
#[derive(Error, Debug)]
pub enum WebRequestError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unknown request method: {0}")]
    UnsupportedMethod(HttpMethod),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network timeout")]
    Timeout,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Declared content length {0} exceeds the supported maximum")]
    ContentTooLarge(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse category of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request could not be built from the given configuration.
    Configuration,
    Timeout,
    Transport,
    /// The response arrived but its body could not be turned into text.
    Decode,
}

impl WebRequestError {
    pub fn kind(&self) -> FailureKind {
        match self {
            WebRequestError::InvalidArgument(_)
            | WebRequestError::InvalidState(_)
            | WebRequestError::UnsupportedMethod(_) => FailureKind::Configuration,
            WebRequestError::Timeout => FailureKind::Timeout,
            WebRequestError::Http(err) if err.is_timeout() => FailureKind::Timeout,
            WebRequestError::Http(err) if err.is_decode() => FailureKind::Decode,
            WebRequestError::Http(_) => FailureKind::Transport,
            WebRequestError::Decode(_) | WebRequestError::ContentTooLarge(_) => {
                FailureKind::Decode
            }
            WebRequestError::Io(_) => FailureKind::Transport,
        }
    }
}

/// Result type alias for webrequest operations
pub type Result<T> = std::result::Result<T, WebRequestError>;
