/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # SSAPI Client Prelude
//!
//! Brings the types needed for most interactions with the API into scope.
//!
//! ## Usage
//!
//! ```rust
//! use ssapi_client::prelude::*;
//!
//! let config = Config::with_credentials("manager@example.com", "secret");
//! assert_eq!(config.rest_api.base_url, DEFAULT_BASE_URL);
//! ```

// ============================================================================
// CORE CONFIGURATION AND SETUP
// ============================================================================

/// Configuration for the SSAPI client
pub use crate::application::config::{Config, Credentials, RestApiConfig};

/// Default API base
pub use crate::constants::DEFAULT_BASE_URL;

/// Library version information
pub use crate::{VERSION, version};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Main error type for the library
pub use crate::error::{AppError, AppResult, RequestDiagnostics};

// ============================================================================
// AUTHENTICATION AND REQUESTS
// ============================================================================

/// Session cache and authentication manager
pub use crate::application::auth::{Auth, Session};

/// Client facade
pub use crate::model::http::HttpClient;

/// Request description
pub use crate::model::requests::RequestDescriptor;

/// Error payload helpers
pub use crate::model::responses::{decode_error_body, parse_error_message};

/// Transport seam
pub use crate::model::transport::{
    HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportFailure,
};

// ============================================================================
// UTILITIES
// ============================================================================

/// Logging setup
pub use crate::utils::logger::setup_logger;
