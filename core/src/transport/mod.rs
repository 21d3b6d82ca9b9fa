//! The network boundary.
//!
//! # Design
//! A [`Transport`] executes one [`HttpRequest`] and yields a
//! [`TransportResponse`] whose head (status) is available immediately and
//! whose body is read in a separate, cancellable step. Splitting the two lets
//! the dispatcher skip the body read entirely on calls that do not need it.
//!
//! Retries, timeouts and connection reuse are the transport's business; the
//! dispatcher makes exactly one attempt per call.

mod config;
mod reqwest_client;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TransportError;
use crate::http::{self, HttpRequest, HttpResponse};

pub use config::TransportConfig;
pub use reqwest_client::{ReqwestResponse, ReqwestTransport};

/// Performs the network exchange for a fully built request.
#[async_trait]
pub trait Transport: Send + Sync {
    type Response: TransportResponse;

    /// Send `request` and wait for the response head.
    ///
    /// Implementations should return [`TransportError::Cancelled`] once
    /// `cancel` fires; the dispatcher also races this future against the
    /// token, so a transport that ignores it still resolves as cancelled.
    async fn execute(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<Self::Response, TransportError>;
}

/// A received response whose body has not necessarily been read yet.
#[async_trait]
pub trait TransportResponse: Send {
    fn status(&self) -> u16;

    fn is_success(&self) -> bool {
        http::is_success(self.status())
    }

    /// Read the whole body, consuming the response.
    async fn read_body(self, cancel: &CancellationToken) -> Result<Vec<u8>, TransportError>;
}

#[async_trait]
impl TransportResponse for HttpResponse {
    fn status(&self) -> u16 {
        self.status
    }

    async fn read_body(self, cancel: &CancellationToken) -> Result<Vec<u8>, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        Ok(self.body)
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    type Response = T::Response;

    async fn execute(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<Self::Response, TransportError> {
        (**self).execute(request, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_response_reads_its_body() {
        let response = HttpResponse::new(201, b"{\"id\":1}".to_vec());
        assert!(response.is_success());
        let body = response.read_body(&CancellationToken::new()).await.unwrap();
        assert_eq!(body, b"{\"id\":1}");
    }

    #[tokio::test]
    async fn in_memory_response_honours_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let err = HttpResponse::new(200, Vec::new())
            .read_body(&token)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Cancelled));
    }

    #[test]
    fn non_2xx_is_not_success() {
        assert!(!HttpResponse::new(404, Vec::new()).is_success());
        assert!(!HttpResponse::new(302, Vec::new()).is_success());
    }
}
