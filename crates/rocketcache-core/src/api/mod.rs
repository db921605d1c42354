//! REST API client module for the public rocket catalog.
//!
//! `RocketSource` is the seam the store talks to; `ApiClient` implements
//! it over HTTP with reqwest.

pub mod client;
pub mod error;
pub mod source;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use source::RocketSource;
