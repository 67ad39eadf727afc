//! YAML decoding.

use super::{Content, Decoder};
use crate::error::DecodeError;

/// Decodes a YAML document into a [`serde_yaml::Value`]. Tags are kept as
/// data; nothing is instantiated from them.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl Decoder for YamlDecoder {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn decode(&self, body: &[u8]) -> Result<Content, DecodeError> {
        Ok(Content::Yaml(serde_yaml::from_slice(body)?))
    }
}
