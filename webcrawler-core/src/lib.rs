// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Webcrawler Core
//!
//! Core types shared by the webcrawler crates.
//!
//! This crate holds the plain data the fetch machinery is configured with.
//! It performs no I/O.
//!
//! ## Key Types
//!
//! - [`Credentials`] - Basic-auth pair with an opaque [`Secret`] password
//! - [`DelayPolicy`] - Wait durations used to throttle and back off requests
//! - [`CrawlerSettings`] - Construction-time configuration
//! - [`resolve_location`] - Joins a redirect location onto the requested target
//! - [`CoreError`] - Configuration and target errors

pub mod credentials;
pub mod delay;
pub mod error;
pub mod settings;
pub mod target;

pub use credentials::{Credentials, Secret};
pub use delay::DelayPolicy;
pub use error::CoreError;
pub use settings::{CrawlerSettings, DEFAULT_MAX_ATTEMPTS};
pub use target::resolve_location;
