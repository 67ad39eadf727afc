//! JSON decoding.

use super::{Content, Decoder};
use crate::error::DecodeError;

/// Decodes a JSON document into a [`serde_json::Value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn name(&self) -> &'static str {
        "json"
    }

    fn decode(&self, body: &[u8]) -> Result<Content, DecodeError> {
        Ok(Content::Json(serde_json::from_slice(body)?))
    }
}
