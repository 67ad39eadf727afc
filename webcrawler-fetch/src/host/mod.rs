//! Host implementations of the fetch seams.
//!
//! - [`http`] - reqwest-backed [`Transport`](crate::transport::Transport)

pub mod http;

pub use http::HttpTransport;
