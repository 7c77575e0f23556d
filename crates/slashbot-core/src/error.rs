//! Error types for slashbot-core.

use thiserror::Error;

/// Result type alias for slashbot-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while decoding or narrowing webhook payloads.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The event does not carry the payload shape the caller asked for.
    #[error("unsupported payload: expected issue_comment, got '{0}'")]
    UnsupportedPayload(String),

    /// A known event kind whose body could not be decoded.
    #[error("malformed '{kind}' payload: {source}")]
    MalformedPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors returned by the remote state gateway and the notification channel.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The platform answered with a non-success status.
    #[error("{operation} failed with status {status}: {message}")]
    Status {
        operation: &'static str,
        status: u16,
        message: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A notification was attempted with an empty body.
    #[error("content cannot be empty")]
    EmptyContent,
}

/// Errors returned from a handler's execution step.
#[derive(Debug, Error)]
pub enum ActorError {
    /// `handle` was called without a preceding successful `capture`.
    #[error("actor '{0}' was invoked without a captured event")]
    NotCaptured(&'static str),

    /// A remote read or mutation failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The platform refused the reviewer request as unprocessable.
    #[error("failed to request reviewers for #{number}: status {status}")]
    ReviewersRejected { number: u64, status: u16 },

    /// The handler needs a notification channel and none was configured.
    #[error("no notification channel configured")]
    NotifierUnavailable,
}
