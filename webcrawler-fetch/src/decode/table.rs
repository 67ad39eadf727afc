//! CSV decoding into rows of fields.

use csv::ReaderBuilder;

use super::{Content, Decoder};
use crate::error::DecodeError;

/// Decodes CSV into rows. The first row is data, not a header, and rows may
/// differ in width.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvDecoder;

impl Decoder for CsvDecoder {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn decode(&self, body: &[u8]) -> Result<Content, DecodeError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(body);

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Ok(Content::Table(rows))
    }
}
