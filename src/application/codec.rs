//! Canonical byte representation of entities, shared by search documents and
//! cache payloads.

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode payload: {0}")]
    Decode(#[source] serde_json::Error),
}

pub trait Codec<T>: Send + Sync {
    fn encode(&self, value: &T) -> Result<Bytes, CodecError>;

    fn decode(&self, payload: &[u8]) -> Result<T, CodecError>;
}

/// JSON codec; the search engine stores documents in the same form.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Decode a document source already parsed from a backend response.
    pub fn decode_document<T: DeserializeOwned>(&self, source: Value) -> Result<T, CodecError> {
        serde_json::from_value(source).map_err(CodecError::Decode)
    }
}

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<Bytes, CodecError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(CodecError::Encode)
    }

    fn decode(&self, payload: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(payload).map_err(CodecError::Decode)
    }
}
