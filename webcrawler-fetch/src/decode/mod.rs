//! Content decoding by media subtype.
//!
//! A [`DecoderRegistry`] maps media subtypes (the part of a Content-Type after
//! the `/`) to [`Decoder`] implementations. Bodies whose subtype has no entry
//! are passed through untouched. New formats are added by registering another
//! decoder:
//!
//! ```ignore
//! let mut registry = DecoderRegistry::standard();
//! registry.register("toml", Arc::new(MyTomlDecoder));
//! ```

pub mod json;
pub mod markup;
pub mod pdf;
pub mod table;
pub mod yaml;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::DecodeError;

pub use json::JsonDecoder;
pub use markup::{Element, HtmlDecoder, Node, XmlDecoder};
pub use pdf::PdfDecoder;
pub use table::CsvDecoder;
pub use yaml::YamlDecoder;

// ============================================================================
// Decoded Values
// ============================================================================

/// A structured value produced by a decoder.
#[derive(Debug)]
pub enum Content {
    /// Rows of fields (CSV).
    Table(Vec<Vec<String>>),
    /// A JSON document.
    Json(serde_json::Value),
    /// A YAML document.
    Yaml(serde_yaml::Value),
    /// An HTML or XML element tree.
    Markup(Element),
    /// A parsed PDF.
    Pdf(lopdf::Document),
}

/// The result of decoding a response body.
#[derive(Debug)]
pub enum DecodedContent {
    /// Produced by the named decoder.
    Decoded {
        /// Name of the decoder that produced `content`.
        decoder: &'static str,
        /// The decoded value.
        content: Content,
    },
    /// No decoder matched; the body is returned unchanged.
    Passthrough(Vec<u8>),
}

impl DecodedContent {
    /// Returns the decoded value, if any.
    pub fn content(&self) -> Option<&Content> {
        match self {
            Self::Decoded { content, .. } => Some(content),
            Self::Passthrough(_) => None,
        }
    }

    /// Consumes self, returning the decoded value, if any.
    pub fn into_content(self) -> Option<Content> {
        match self {
            Self::Decoded { content, .. } => Some(content),
            Self::Passthrough(_) => None,
        }
    }

    /// Returns the untouched body of a passthrough result.
    pub fn raw(&self) -> Option<&[u8]> {
        match self {
            Self::Passthrough(body) => Some(body),
            Self::Decoded { .. } => None,
        }
    }

    /// Returns a passthrough body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.raw().map(String::from_utf8_lossy)
    }

    /// Returns true if no decoder was applied.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Passthrough(_))
    }
}

// ============================================================================
// Decoder Trait
// ============================================================================

/// Turns a response body into a structured value.
pub trait Decoder: Send + Sync {
    /// Short name of the format, e.g. `"csv"`.
    fn name(&self) -> &'static str;

    /// Decodes `body`.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the body is malformed for this format.
    fn decode(&self, body: &[u8]) -> Result<Content, DecodeError>;
}

// ============================================================================
// Registry
// ============================================================================

/// Extracts the subtype from a media type: `text/csv` becomes `csv`.
///
/// Parameters are dropped and case is preserved.
pub fn media_subtype(media_type: &str) -> &str {
    let essence = media_type.split(';').next().unwrap_or_default().trim();
    essence.rsplit('/').next().unwrap_or_default().trim()
}

/// Subtype-to-decoder table.
#[derive(Clone, Default)]
pub struct DecoderRegistry {
    decoders: HashMap<String, Arc<dyn Decoder>>,
}

impl DecoderRegistry {
    /// Creates a registry with no decoders; everything passes through.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry covering csv, html, json, pdf, xml and the yaml
    /// spellings.
    pub fn standard() -> Self {
        let yaml: Arc<dyn Decoder> = Arc::new(YamlDecoder);

        Self::empty()
            .with("csv", Arc::new(CsvDecoder))
            .with("html", Arc::new(HtmlDecoder))
            .with("json", Arc::new(JsonDecoder))
            .with("pdf", Arc::new(PdfDecoder))
            .with("xml", Arc::new(XmlDecoder))
            .with("x-yaml", yaml.clone())
            .with("x-yml", yaml.clone())
            .with("yaml", yaml.clone())
            .with("yml", yaml)
    }

    /// Registers `decoder` for `subtype`, returning any decoder it replaces.
    pub fn register(
        &mut self,
        subtype: impl Into<String>,
        decoder: Arc<dyn Decoder>,
    ) -> Option<Arc<dyn Decoder>> {
        self.decoders.insert(subtype.into(), decoder)
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, subtype: impl Into<String>, decoder: Arc<dyn Decoder>) -> Self {
        self.register(subtype, decoder);
        self
    }

    /// Looks up the decoder for an exact subtype.
    pub fn lookup(&self, subtype: &str) -> Option<&dyn Decoder> {
        self.decoders.get(subtype).map(AsRef::as_ref)
    }

    /// Registered subtypes, sorted.
    pub fn subtypes(&self) -> Vec<&str> {
        let mut subtypes: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        subtypes.sort_unstable();
        subtypes
    }

    /// Decodes `body` according to its declared media type.
    ///
    /// # Errors
    ///
    /// Propagates the matching decoder's [`DecodeError`].
    pub fn decode(
        &self,
        body: Vec<u8>,
        media_type: Option<&str>,
    ) -> Result<DecodedContent, DecodeError> {
        let Some(decoder) = media_type.map(media_subtype).and_then(|s| self.lookup(s)) else {
            debug!(media_type = ?media_type, "No decoder registered, passing body through");
            return Ok(DecodedContent::Passthrough(body));
        };

        debug!(decoder = decoder.name(), bytes = body.len(), "Decoding body");
        let content = decoder.decode(&body)?;
        Ok(DecodedContent::Decoded {
            decoder: decoder.name(),
            content,
        })
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("subtypes", &self.subtypes())
            .finish()
    }
}
