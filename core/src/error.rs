//! Error types for the HTTP client wrapper.
//!
//! # Design
//! A single `ClientError` covers every stage of a call. `kind()` groups the
//! variants into the stage that produced them so callers can tell a request
//! that was never built apart from one that failed on the wire. `NotFound`
//! and `Status` are only produced by `Response::error_for_status`; a non-2xx
//! response is otherwise a successful call.

use thiserror::Error;

/// Stage of a call that produced a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be built.
    Construction,
    /// The request was built but the exchange with the server failed.
    Transport,
    /// The response arrived but its body could not be read.
    Read,
    /// The buffered body could not be decoded into the requested type.
    Decode,
    /// The server answered with a non-2xx status.
    Status,
}

/// Errors returned while building, sending or decoding a request.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL plus endpoint did not form a valid absolute URL.
    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A header name or value is not valid HTTP.
    #[error("invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Parameters could not be serialized to a JSON body.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Parameters could not be encoded as a query string.
    #[error("query encoding failed: {0}")]
    QueryEncoding(String),

    /// The call did not complete before its timeout or deadline.
    #[error("request timed out")]
    Timeout,

    /// The call context was cancelled.
    #[error("request cancelled")]
    Cancelled,

    /// The server could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// Any other failure reported by the underlying transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be read to completion.
    #[error("failed to read response body: {0}")]
    BodyRead(String),

    /// The response body is not valid JSON for the target type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::InvalidUrl { .. }
            | ClientError::InvalidHeader { .. }
            | ClientError::Serialization(_)
            | ClientError::QueryEncoding(_) => ErrorKind::Construction,
            ClientError::Timeout
            | ClientError::Cancelled
            | ClientError::Connection(_)
            | ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::BodyRead(_) => ErrorKind::Read,
            ClientError::Deserialization(_) => ErrorKind::Decode,
            ClientError::NotFound | ClientError::Status { .. } => ErrorKind::Status,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout)
    }
}
