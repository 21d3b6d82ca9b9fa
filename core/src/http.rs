//! Plain-data request and response types.
//!
//! # Design
//! `HttpRequest` is the fully assembled descriptor of one outgoing call. It is
//! built by [`crate::builder::build_request`], handed by value to a
//! [`crate::transport::Transport`], and never touched again. Keeping it plain
//! data means any transport (reqwest, a blocking client, an in-memory fake)
//! can execute it without knowing how it was built.
//!
//! All fields use owned types so a descriptor can move across tasks freely.

use std::fmt;

/// Media type for typed request bodies and for the unconditional `Accept`.
pub const APPLICATION_JSON: &str = "application/json";

/// Media type declared by multipart request bodies.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Name of the header every request carries to advertise JSON responses.
pub const ACCEPT: &str = "accept";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of an outgoing request. Exactly one shape is ever present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    #[default]
    Empty,

    /// A single encoded payload and its declared content type.
    Bytes { content_type: String, data: Vec<u8> },

    /// Text fields sent as `multipart/form-data`, one part per field, in order.
    Multipart(Vec<(String, String)>),
}

impl RequestBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }

    /// Content type the body declares, if it has one. Multipart boundaries are
    /// chosen by the transport, so only the bare media type is reported.
    pub fn content_type(&self) -> Option<&str> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Bytes { content_type, .. } => Some(content_type),
            RequestBody::Multipart(_) => Some(MULTIPART_FORM_DATA),
        }
    }
}

/// An HTTP request described as plain data.
///
/// `headers` keeps insertion order and allows repeated names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    /// Values of every header named `name`, compared case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Transports that already hold the whole response in memory (tests, replay
/// fixtures) can return this directly; it implements
/// [`crate::transport::TransportResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// `true` for statuses in `200..=299`.
pub fn is_success(status: u16) -> bool {
    (200..=299).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_inclusive_2xx() {
        assert!(!is_success(199));
        assert!(is_success(200));
        assert!(is_success(204));
        assert!(is_success(299));
        assert!(!is_success(300));
        assert!(!is_success(404));
    }

    #[test]
    fn method_displays_uppercase() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Get.as_str(), "GET");
    }

    #[test]
    fn body_content_types() {
        assert_eq!(RequestBody::Empty.content_type(), None);
        assert_eq!(
            RequestBody::Multipart(Vec::new()).content_type(),
            Some(MULTIPART_FORM_DATA)
        );
        let bytes = RequestBody::Bytes {
            content_type: APPLICATION_JSON.to_string(),
            data: b"{}".to_vec(),
        };
        assert_eq!(bytes.content_type(), Some(APPLICATION_JSON));
    }

    #[test]
    fn header_values_matches_any_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            uri: "http://localhost".to_string(),
            headers: vec![
                ("X-Tag".to_string(), "a".to_string()),
                ("x-tag".to_string(), "b".to_string()),
                ("accept".to_string(), APPLICATION_JSON.to_string()),
            ],
            body: RequestBody::Empty,
        };
        let values: Vec<&str> = req.header_values("x-tag").collect();
        assert_eq!(values, vec!["a", "b"]);
    }
}
