//! Build, send and resolve one request.
//!
//! # Design
//! Every public entry point funnels into one of two primitives:
//!
//! - [`Dispatcher::send_no_result`] reads the response body only when the
//!   status is not 2xx, since that is the only case where it is needed (for
//!   the error message).
//! - [`Dispatcher::send_with_result`] always reads the body before looking at
//!   the status, because both the decoded value and the error need it.
//!
//! Transport failures and non-2xx responses are each governed by one flag of
//! [`ErrorPolicy`]. A suppressed failure resolves as "no response" (`()` or
//! `None`). Decode failures on a 2xx response are never suppressed.
//!
//! The dispatcher holds no mutable state; concurrent calls on a shared
//! `Dispatcher` are independent.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::builder::{build_request, ErrorPolicy, SendOptions};
use crate::codec::{Codec, JsonCodec};
use crate::error::{DispatchError, Result, TransportError};
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::{Transport, TransportResponse};

/// Raw result of one exchange, before any policy is applied.
#[derive(Debug)]
pub enum ResponseOutcome {
    /// No response was obtained.
    TransportFailure(TransportError),
    Response {
        status: u16,
        success: bool,
        body: Vec<u8>,
    },
}

/// Sends requests over a [`Transport`], encoding and decoding typed payloads
/// with a [`Codec`].
#[derive(Debug, Clone)]
pub struct Dispatcher<T, C = JsonCodec> {
    transport: T,
    codec: C,
}

impl<T: Transport> Dispatcher<T> {
    /// Dispatcher using JSON for typed bodies and results.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            codec: JsonCodec,
        }
    }
}

impl<T: Transport, C: Codec> Dispatcher<T, C> {
    pub fn with_codec(transport: T, codec: C) -> Self {
        Self { transport, codec }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// No body, no result.
    pub async fn send(&self, method: HttpMethod, base_uri: &str, options: &SendOptions) -> Result<()> {
        let request = build_request::<C, ()>(&self.codec, method, base_uri, None, options)?;
        self.send_no_result(request, options.policy, &options.cancel)
            .await
    }

    /// Typed body, no result.
    pub async fn send_body<B>(
        &self,
        method: HttpMethod,
        body: &B,
        base_uri: &str,
        options: &SendOptions,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = build_request(&self.codec, method, base_uri, Some(body), options)?;
        self.send_no_result(request, options.policy, &options.cancel)
            .await
    }

    /// No body, typed result.
    pub async fn fetch<R>(
        &self,
        method: HttpMethod,
        base_uri: &str,
        options: &SendOptions,
    ) -> Result<Option<R>>
    where
        R: DeserializeOwned,
    {
        let request = build_request::<C, ()>(&self.codec, method, base_uri, None, options)?;
        self.send_with_result(request, options.policy, &options.cancel)
            .await
    }

    /// Typed body, typed result.
    pub async fn fetch_with_body<B, R>(
        &self,
        method: HttpMethod,
        body: &B,
        base_uri: &str,
        options: &SendOptions,
    ) -> Result<Option<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = build_request(&self.codec, method, base_uri, Some(body), options)?;
        self.send_with_result(request, options.policy, &options.cancel)
            .await
    }

    /// Send `request` and discard any successful body unread.
    pub async fn send_no_result(
        &self,
        request: HttpRequest,
        policy: ErrorPolicy,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let Some(response) = self.exchange(request, policy, cancel).await? else {
            return Ok(());
        };
        if response.is_success() {
            return Ok(());
        }

        let status = response.status();
        let Some(body) = read_body(response, policy, cancel).await? else {
            return Ok(());
        };
        if policy.fail_on_response_error {
            return Err(response_error(status, &body));
        }
        Ok(())
    }

    /// Send `request` and decode a 2xx body into `R`.
    ///
    /// `Ok(None)` means a failure was suppressed by `policy`.
    pub async fn send_with_result<R>(
        &self,
        request: HttpRequest,
        policy: ErrorPolicy,
        cancel: &CancellationToken,
    ) -> Result<Option<R>>
    where
        R: DeserializeOwned,
    {
        let Some(response) = self.exchange(request, policy, cancel).await? else {
            return Ok(None);
        };

        let status = response.status();
        let success = response.is_success();
        let Some(body) = read_body(response, policy, cancel).await? else {
            return Ok(None);
        };

        if success {
            return Ok(Some(self.codec.decode(&body)?));
        }
        if policy.fail_on_response_error {
            return Err(response_error(status, &body));
        }
        Ok(None)
    }

    /// Send `request` and always read the body, applying no policy.
    pub async fn outcome(&self, request: HttpRequest, cancel: &CancellationToken) -> ResponseOutcome {
        let response = match execute(&self.transport, request, cancel).await {
            Ok(response) => response,
            Err(err) => return ResponseOutcome::TransportFailure(err),
        };
        let status = response.status();
        let success = response.is_success();
        match read(response, cancel).await {
            Ok(body) => ResponseOutcome::Response {
                status,
                success,
                body,
            },
            Err(err) => ResponseOutcome::TransportFailure(err),
        }
    }

    async fn exchange(
        &self,
        request: HttpRequest,
        policy: ErrorPolicy,
        cancel: &CancellationToken,
    ) -> Result<Option<T::Response>> {
        suppress(execute(&self.transport, request, cancel).await, policy)
    }
}

async fn execute<T: Transport>(
    transport: &T,
    request: HttpRequest,
    cancel: &CancellationToken,
) -> std::result::Result<T::Response, TransportError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TransportError::Cancelled),
        response = transport.execute(request, cancel) => response,
    }
}

async fn read<R: TransportResponse>(
    response: R,
    cancel: &CancellationToken,
) -> std::result::Result<Vec<u8>, TransportError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TransportError::Cancelled),
        body = response.read_body(cancel) => body,
    }
}

async fn read_body<R: TransportResponse>(
    response: R,
    policy: ErrorPolicy,
    cancel: &CancellationToken,
) -> Result<Option<Vec<u8>>> {
    suppress(read(response, cancel).await, policy)
}

fn suppress<V>(outcome: std::result::Result<V, TransportError>, policy: ErrorPolicy) -> Result<Option<V>> {
    match outcome {
        Ok(value) => Ok(Some(value)),
        Err(err) if policy.fail_on_transport_error => Err(err.into()),
        Err(_) => Ok(None),
    }
}

fn response_error(status: u16, body: &[u8]) -> DispatchError {
    DispatchError::Response {
        status,
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppress_follows_transport_flag() {
        let strict = suppress::<()>(Err(TransportError::Cancelled), ErrorPolicy::strict());
        assert!(matches!(strict, Err(DispatchError::Transport(TransportError::Cancelled))));

        let lenient = suppress::<()>(Err(TransportError::Cancelled), ErrorPolicy::lenient());
        assert!(matches!(lenient, Ok(None)));

        let ok = suppress(Ok(7), ErrorPolicy::strict());
        assert!(matches!(ok, Ok(Some(7))));
    }

    #[test]
    fn response_error_is_lossy_utf8() {
        let err = response_error(500, &[b'o', b'k', 0xff]);
        match err {
            DispatchError::Response { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "ok\u{fffd}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
