//! Typed HTTP request dispatch.
//!
//! # Overview
//! One call builds a request from a method, base URI, optional relative path,
//! optional typed body, headers and multipart fields; sends it over a
//! [`Transport`]; and resolves the response into a decoded value or a typed
//! [`DispatchError`].
//!
//! # Design
//! - [`build_request`] is pure: it produces a plain-data [`HttpRequest`] and
//!   never touches the network.
//! - [`Dispatcher`] owns a transport and a [`Codec`] and carries no mutable
//!   state, so one instance can serve concurrent callers.
//! - Transport failures and non-2xx responses can each be suppressed per call
//!   through [`ErrorPolicy`]; codec failures always surface.
//! - [`ReqwestTransport`] is the shipped network transport. Tests swap in
//!   in-memory transports returning [`HttpResponse`].

pub mod builder;
pub mod codec;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod transport;

pub use builder::{build_request, target_uri, ErrorPolicy, SendOptions};
pub use codec::{Codec, JsonCodec};
pub use dispatcher::{Dispatcher, ResponseOutcome};
pub use error::{CodecError, DispatchError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use tokio_util::sync::CancellationToken;
pub use transport::{ReqwestTransport, Transport, TransportConfig, TransportResponse};
