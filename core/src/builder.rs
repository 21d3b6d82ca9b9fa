//! Request assembly.
//!
//! # Design
//! [`build_request`] is a pure function: it turns a method, a base URI and a
//! set of [`SendOptions`] into an [`HttpRequest`] without any I/O. The only
//! way it can fail is the codec refusing to serialize the typed body.
//!
//! Body precedence is fixed: when multipart fields are present they become
//! the body and the typed body is not serialized at all.

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::codec::Codec;
use crate::error::CodecError;
use crate::http::{HttpMethod, HttpRequest, RequestBody, ACCEPT, APPLICATION_JSON};

/// Whether each of the two suppressible failure classes surfaces as an error.
///
/// When a flag is `false` the matching failure resolves as "no response":
/// `()` for calls without a result, `None` for calls with one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPolicy {
    pub fail_on_transport_error: bool,
    pub fail_on_response_error: bool,
}

impl ErrorPolicy {
    /// Both failure classes surface. This is the default.
    pub const fn strict() -> Self {
        Self {
            fail_on_transport_error: true,
            fail_on_response_error: true,
        }
    }

    /// Both failure classes are swallowed.
    pub const fn lenient() -> Self {
        Self {
            fail_on_transport_error: false,
            fail_on_response_error: false,
        }
    }
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::strict()
    }
}

/// Per-call inputs besides method, base URI and typed body.
///
/// ```
/// use courier_core::{ErrorPolicy, SendOptions};
///
/// let options = SendOptions::new()
///     .relative_uri("/items")
///     .header("x-request-id", "42")
///     .policy(ErrorPolicy::lenient());
/// assert_eq!(options.headers.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Appended verbatim to the base URI when non-empty.
    pub relative_uri: Option<String>,
    /// Sent in order, repeated names included.
    pub headers: Vec<(String, String)>,
    /// `Some` switches the body to multipart, even with no fields.
    pub multipart: Option<Vec<(String, String)>>,
    pub policy: ErrorPolicy,
    /// Aborts the exchange and the body read when cancelled.
    pub cancel: CancellationToken,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relative_uri(mut self, relative_uri: impl Into<String>) -> Self {
        self.relative_uri = Some(relative_uri.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn multipart_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.multipart
            .get_or_insert_with(Vec::new)
            .push((name.into(), value.into()));
        self
    }

    pub fn multipart<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.multipart
            .get_or_insert_with(Vec::new)
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn fail_on_transport_error(mut self, fail: bool) -> Self {
        self.policy.fail_on_transport_error = fail;
        self
    }

    pub fn fail_on_response_error(mut self, fail: bool) -> Self {
        self.policy.fail_on_response_error = fail;
        self
    }

    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }
}

/// `base_uri` followed by `relative_uri` when the latter is non-empty. No
/// separator is inserted and nothing is normalized.
pub fn target_uri(base_uri: &str, relative_uri: Option<&str>) -> String {
    match relative_uri {
        Some(rel) if !rel.is_empty() => format!("{base_uri}{rel}"),
        _ => base_uri.to_string(),
    }
}

/// Assemble the descriptor for one call.
///
/// Caller headers come first in their given order, followed by
/// `accept: application/json`.
pub fn build_request<C, B>(
    codec: &C,
    method: HttpMethod,
    base_uri: &str,
    body: Option<&B>,
    options: &SendOptions,
) -> Result<HttpRequest, CodecError>
where
    C: Codec,
    B: Serialize + ?Sized,
{
    let mut headers = Vec::with_capacity(options.headers.len() + 1);
    headers.extend(options.headers.iter().cloned());
    headers.push((ACCEPT.to_string(), APPLICATION_JSON.to_string()));

    let body = match (&options.multipart, body) {
        (Some(fields), _) => RequestBody::Multipart(fields.clone()),
        (None, Some(value)) => RequestBody::Bytes {
            content_type: codec.content_type().to_string(),
            data: codec.encode(value)?,
        },
        (None, None) => RequestBody::Empty,
    };

    Ok(HttpRequest {
        method,
        uri: target_uri(base_uri, options.relative_uri.as_deref()),
        headers,
        body,
    })
}
