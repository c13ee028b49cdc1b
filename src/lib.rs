/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # SSAPI Client
//!
//! A thin, session-aware client for the SSAPI v2 HTTP/JSON API.
//!
//! The client logs in with a login/password pair, caches the returned token
//! together with its expiry and transparently re-authenticates whenever the
//! cached expiry has passed. Every request goes through a single generic
//! dispatch primitive, [`HttpClient::send_request`], which normalizes the
//! heterogeneous error payloads returned by the API into [`AppError`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ssapi_client::prelude::*;
//!
//! # async fn run() -> Result<(), AppError> {
//! let config = Config::with_credentials("manager@example.com", "secret");
//! let client = HttpClient::new(config).await?;
//! let pong = client.send_request("/ping", "GET", None).await?;
//! println!("{pong}");
//! # Ok(())
//! # }
//! ```
//!
//! [`HttpClient::send_request`]: model::http::HttpClient::send_request
//! [`AppError`]: error::AppError

/// Authentication manager and application configuration
pub mod application;
/// Library-wide constants
pub mod constants;
/// Error taxonomy returned by every fallible operation
pub mod error;
/// Request/response models, dispatch and transport
pub mod model;
/// Commonly used re-exports
pub mod prelude;
/// Environment and logging helpers
pub mod utils;

/// Crate version as declared in `Cargo.toml`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version
#[must_use]
pub fn version() -> &'static str {
    VERSION
}
