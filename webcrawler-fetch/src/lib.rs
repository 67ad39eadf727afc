// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Webcrawler Fetch
//!
//! Fetches one web resource, resolves redirects, authentication challenges
//! and rate limits along the way, and decodes the final body by media type.
//!
//! ## Resolution
//!
//! - [`transport::Transport`] - One HTTP GET per call
//! - [`host::http::HttpTransport`] - reqwest-backed transport
//! - [`outcome::classify`] - Maps a raw response to an [`Outcome`]
//! - [`resolver::ResponseResolver`] - Bounded retry loop over outcomes
//! - [`clock::Clock`] - Injectable waits
//!
//! ## Decoding
//!
//! - [`decode::DecoderRegistry`] - Media subtype to [`decode::Decoder`] table
//! - [`decode::DecodedContent`] - Structured value or passthrough body
//!
//! ## Example
//!
//! ```ignore
//! use webcrawler_core::CrawlerSettings;
//! use webcrawler_fetch::{Crawler, FetchOptions};
//!
//! let crawler = Crawler::new(CrawlerSettings::new().with_credentials("user", "pass"))?;
//! let content = crawler
//!     .fetch("https://example.com/report.csv", FetchOptions::default())
//!     .await?;
//! ```

pub mod clock;
pub mod crawler;
pub mod decode;
pub mod error;
pub mod host;
pub mod outcome;
pub mod resolver;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

// Errors
pub use error::{ConnectionError, DecodeError, FetchError};

// Resolution
pub use clock::{Clock, TokioClock};
pub use host::http::HttpTransport;
pub use outcome::{Outcome, classify};
pub use resolver::{RequestAttempt, Resolution, ResponseResolver};
pub use transport::{RawResponse, Transport};

// Decoding
pub use decode::{Content, DecodedContent, Decoder, DecoderRegistry, Element, Node};

// Facade
pub use crawler::{Crawler, CrawlerBuilder, FetchOptions};
