//! PDF decoding.

use lopdf::Document;

use super::{Content, Decoder};
use crate::error::DecodeError;

/// Parses a PDF into a [`lopdf::Document`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfDecoder;

impl Decoder for PdfDecoder {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn decode(&self, body: &[u8]) -> Result<Content, DecodeError> {
        Ok(Content::Pdf(Document::load_mem(body)?))
    }
}
