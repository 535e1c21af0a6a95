//! Error types for the Armis client.
//!
//! # Design
//! Validation failures are their own enum so callers can match on the exact
//! field that was rejected. They are always produced before any request is
//! built. Everything the remote side rejects, including 401/403, lands in
//! `Error::Api` with the status code and the envelope's `error` message.

use thiserror::Error;

/// A request field rejected locally, before any network I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The policy name is empty or whitespace-only.
    #[error("policy name is required")]
    Name,

    /// The policy description exceeds the maximum length.
    #[error("policy description must be at most 500 characters, got {length}")]
    Description { length: usize },

    /// The rule type is not one of the supported values.
    #[error("invalid policy rule type {0:?}, expected one of ACTIVITY, IP_CONNECTION, DEVICE, VULNERABILITY")]
    RuleType(String),

    /// The policy id is empty or whitespace-only.
    #[error("policy id is required")]
    Id,
}

/// Errors returned by the Armis client.
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected locally; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Non-2xx status, or a 2xx envelope with `success: false`.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("failed to serialize request: {0}")]
    Serialization(String),

    /// The request never produced a response (connection, DNS, TLS, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// A `ClientConfig` value (usually from the environment) is missing or malformed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The call's `CancellationToken` fired, before dispatch or while in flight.
    #[error("request cancelled")]
    Cancelled,

    /// The call's deadline passed, before dispatch or while in flight.
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

impl Error {
    /// The validation failure, if this error is one.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(err) => Some(err),
            _ => None,
        }
    }

    /// Status code of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401 or 403 from the API.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The call was abandoned because its context was cancelled or expired.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Cancelled | Error::DeadlineExceeded)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
