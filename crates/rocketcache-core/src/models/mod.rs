//! Data models for the rocket catalog.
//!
//! - `Rocket`: a catalog record, remote or locally created
//! - `RocketFilter`, `ActiveFilter`: criteria for the filtered view

pub mod filter;
pub mod rocket;

pub use filter::{ActiveFilter, ParseActiveFilterError, RocketFilter};
pub use rocket::Rocket;
