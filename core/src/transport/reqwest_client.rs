//! [`Transport`] over a shared `reqwest::Client`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::multipart::Form;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{Transport, TransportConfig, TransportResponse};
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, RequestBody};

/// Network transport backed by `reqwest`.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Other(Box::new(e)))?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(Box::new(err))
    } else if err.is_connect() {
        TransportError::Connect(Box::new(err))
    } else if err.is_builder() {
        TransportError::InvalidRequest(Box::new(err))
    } else if err.is_body() || err.is_decode() {
        TransportError::Body(Box::new(err))
    } else {
        TransportError::Other(Box::new(err))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    type Response = ReqwestResponse;

    async fn execute(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<ReqwestResponse, TransportError> {
        let HttpRequest {
            method,
            uri,
            headers,
            body,
        } = request;
        debug!(%method, %uri, "sending request");

        let mut builder = self.client.request(to_reqwest_method(method), &uri);
        // `header` appends, so repeated names go out as separate lines.
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Bytes { content_type, data } => {
                builder.header(CONTENT_TYPE, content_type).body(data)
            }
            RequestBody::Multipart(fields) => {
                let form = fields
                    .into_iter()
                    .fold(Form::new(), |form, (name, value)| form.text(name, value));
                builder.multipart(form)
            }
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            sent = builder.send() => sent.map_err(classify),
        };

        match result {
            Ok(inner) => {
                debug!(%method, %uri, status = inner.status().as_u16(), "received response");
                Ok(ReqwestResponse { inner })
            }
            Err(err) => {
                warn!(%method, %uri, error = %err, "request failed");
                Err(err)
            }
        }
    }
}

/// Response head from [`ReqwestTransport`]; the body stays on the wire until
/// [`TransportResponse::read_body`] is called.
#[derive(Debug)]
pub struct ReqwestResponse {
    inner: reqwest::Response,
}

impl ReqwestResponse {
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }
}

#[async_trait]
impl TransportResponse for ReqwestResponse {
    fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    async fn read_body(self, cancel: &CancellationToken) -> Result<Vec<u8>, TransportError> {
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            bytes = self.inner.bytes() => bytes,
        };
        read.map(|bytes| bytes.to_vec()).map_err(|err| {
            if err.is_timeout() {
                TransportError::Timeout(Box::new(err))
            } else {
                TransportError::Body(Box::new(err))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_method() {
        assert_eq!(to_reqwest_method(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(to_reqwest_method(HttpMethod::Patch), reqwest::Method::PATCH);
        assert_eq!(to_reqwest_method(HttpMethod::Options), reqwest::Method::OPTIONS);
    }

    #[test]
    fn builds_from_default_config() {
        assert!(ReqwestTransport::new(&TransportConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn illegal_header_name_is_an_invalid_request() {
        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        let request = HttpRequest {
            method: HttpMethod::Get,
            uri: "http://127.0.0.1:9/".to_string(),
            headers: vec![("bad header".to_string(), "x".to_string())],
            body: RequestBody::Empty,
        };
        let err = transport
            .execute(request, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)), "{err:?}");
    }

    #[tokio::test]
    async fn pre_cancelled_token_short_circuits() {
        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let request = HttpRequest {
            method: HttpMethod::Get,
            uri: "http://127.0.0.1:9/".to_string(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        };
        let err = transport.execute(request, &token).await.unwrap_err();
        assert!(matches!(err, TransportError::Cancelled));
    }
}
