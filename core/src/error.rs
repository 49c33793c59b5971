//! Error types for the CallFire client core.
//!
//! # Design
//! Failures split by where they happen. `EncodeError` covers body
//! preparation, which runs before any byte touches the network, and is
//! surfaced unwrapped. Everything that goes wrong once a request is
//! dispatched is normalized into a single `TransportError`, whose kind is
//! decided at the transport boundary rather than by inspecting the
//! underlying HTTP library's error types. The original cause is kept for
//! callers that want to dig deeper.

use std::error::Error as StdError;

use thiserror::Error;
use ureq::http::StatusCode;

/// Boxed error used for connector failures of unknown concrete type.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result alias for operations that may fail with any client [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error returned by `Transport` and `CallFireClient`.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// The transport failure, if this error came from the network.
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Error::Transport(e) => Some(e),
            _ => None,
        }
    }
}

/// A request body could not be produced.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to serialize JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read multipart payload: {0}")]
    Read(#[from] std::io::Error),
}

/// Required configuration is missing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {0} is not valid unicode")]
    InvalidVar(&'static str),
}

/// How a dispatched request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No response was obtained: DNS, refusal, timeout, broken connection.
    Connection,

    /// The server answered with a non-2xx status.
    HttpStatus { status: u16 },
}

/// Cause recorded for HTTP-status failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP Error {status}: {reason}")]
pub struct HttpStatusError {
    pub status: u16,
    pub reason: String,
}

impl HttpStatusError {
    pub fn new(status: u16) -> Self {
        let reason = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Status");
        Self {
            status,
            reason: reason.to_string(),
        }
    }
}

/// The single error kind for every network-originating failure.
///
/// `Display` yields the synthesized diagnostic: the cause's description,
/// followed by `": "` and the raw response body when the server sent one.
#[derive(Debug, Error)]
#[error("{diagnostic}")]
pub struct TransportError {
    kind: FailureKind,
    #[source]
    cause: BoxError,
    body: Option<String>,
    diagnostic: String,
}

impl TransportError {
    /// Wrap a failure where no response was obtained.
    pub fn connection(cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        let diagnostic = cause.to_string();
        Self {
            kind: FailureKind::Connection,
            cause,
            body: None,
            diagnostic,
        }
    }

    /// Wrap a non-success response and its body text.
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        let cause = HttpStatusError::new(status);
        let body = body.into();
        let diagnostic = format!("{cause}: {body}");
        Self {
            kind: FailureKind::HttpStatus { status },
            cause: Box::new(cause),
            body: Some(body),
            diagnostic,
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Status code for HTTP-status failures.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            FailureKind::HttpStatus { status } => Some(status),
            FailureKind::Connection => None,
        }
    }

    pub fn is_connection(&self) -> bool {
        self.kind == FailureKind::Connection
    }

    /// Raw text of the failure response body, if one was received.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }

    /// The wrapped original failure.
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    /// Downcast the wrapped cause to a concrete error type.
    pub fn cause_as<E: StdError + 'static>(&self) -> Option<&E> {
        self.cause.downcast_ref::<E>()
    }
}
