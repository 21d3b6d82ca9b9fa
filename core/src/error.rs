//! Error types for request dispatch.
//!
//! # Design
//! Three independent failure classes, one variant each on `DispatchError`:
//! the exchange never produced a response (`Transport`), the server answered
//! with a non-2xx status (`Response`), or a payload could not be encoded or
//! decoded (`Codec`). The first two can be suppressed per call through
//! [`crate::builder::ErrorPolicy`]; codec failures always surface.

use thiserror::Error;

/// Boxed underlying cause carried by transport and codec errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used across the crate.
pub type Result<T, E = DispatchError> = std::result::Result<T, E>;

/// The exchange could not complete, so there is no response to inspect.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The call's cancellation token fired before the exchange finished.
    #[error("request cancelled")]
    Cancelled,

    #[error("request timed out: {0}")]
    Timeout(#[source] BoxError),

    /// DNS, TCP or TLS failure while establishing the connection.
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    /// The transport refused the descriptor (illegal URI, header name or value).
    #[error("invalid request: {0}")]
    InvalidRequest(#[source] BoxError),

    /// The response head arrived but reading its body failed.
    #[error("failed to read response body: {0}")]
    Body(#[source] BoxError),

    #[error("transport failure: {0}")]
    Other(#[source] BoxError),
}

/// A payload could not be turned into bytes or back.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("failed to encode request body: {0}")]
    Encode(#[source] BoxError),

    #[error("failed to decode response body: {0}")]
    Decode(#[source] BoxError),
}

/// Errors returned by [`crate::Dispatcher`].
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned a non-2xx status. `body` is the raw response text.
    #[error("HTTP {status}: {body}")]
    Response { status: u16, body: String },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl DispatchError {
    /// Status code of a `Response` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            DispatchError::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, DispatchError::Transport(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, DispatchError::Transport(TransportError::Cancelled))
    }

    pub fn is_codec(&self) -> bool {
        matches!(self, DispatchError::Codec(_))
    }
}
