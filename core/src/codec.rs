//! Payload encoding.
//!
//! The dispatcher is generic over a [`Codec`] so the wire format of typed
//! bodies and results is swappable. [`JsonCodec`] is the default and the only
//! one shipped.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;
use crate::http::APPLICATION_JSON;

/// Turns typed values into request payloads and response payloads back into
/// typed values.
pub trait Codec: Send + Sync {
    /// Content type declared on bodies produced by [`Codec::encode`].
    fn content_type(&self) -> &str;

    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized;

    /// Fails with [`CodecError::Decode`] on malformed or mismatched input.
    fn decode<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned;
}

/// `serde_json` codec producing `application/json` payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn content_type(&self) -> &str {
        APPLICATION_JSON
    }

    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_vec(value).map_err(|e| CodecError::Encode(Box::new(e)))
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(Box::new(e)))
    }
}
