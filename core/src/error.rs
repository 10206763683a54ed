//! Error types for the PokeAPI client and the repository boundary.
//!
//! # Design
//! `ApiError` describes what went wrong at the HTTP level and is plain data
//! (`Clone + PartialEq`) so it can live inside published view-states.
//! `ErrorInfo` is what presentation sees: a coarse `ErrorKind`, a message,
//! and the originating `ApiError` kept for logging.

use std::fmt;

use thiserror::Error;

/// Errors returned by `PokeApiClient` parse methods and by transports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 404. PokeAPI answers this for unknown names.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The server returned 2xx without a payload.
    #[error("empty body")]
    EmptyBody,

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// No response was received (DNS, connect, TLS, timeout, read).
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Coarse failure category carried by `ErrorInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request did not produce a successful response.
    RequestFailed,
    /// A successful response arrived with no payload.
    EmptyBody,
    /// Anything else, e.g. a payload that failed to decode.
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::RequestFailed => write!(f, "request failed"),
            ErrorKind::EmptyBody => write!(f, "empty body"),
            ErrorKind::Unknown => write!(f, "unknown error"),
        }
    }
}

/// Failure cause published in `ViewState::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<ApiError>,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }
}

impl From<ApiError> for ErrorInfo {
    fn from(err: ApiError) -> Self {
        let kind = match &err {
            ApiError::NotFound | ApiError::HttpError { .. } | ApiError::Transport(_) => {
                ErrorKind::RequestFailed
            }
            ApiError::EmptyBody => ErrorKind::EmptyBody,
            ApiError::DeserializationError(_) => ErrorKind::Unknown,
        };
        Self {
            kind,
            message: err.to_string(),
            source: Some(err),
        }
    }
}
