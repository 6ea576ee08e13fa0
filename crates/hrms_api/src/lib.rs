//! Request/response boundary over `hrms_core`.
//!
//! Each operation takes a JSON field set and/or an id string and returns an
//! [`ApiResponse`]. Transport (HTTP routing, auth) is left to the embedder.

pub mod api;
pub mod config;
mod request;

pub use api::{ApiResponse, Hrms, StartupError};
pub use config::ApiConfig;
