/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Error taxonomy for the SSAPI client.
//!
//! Every failure surfaced by the client is an [`AppError`]. Failures that
//! happen after a request was built carry a [`RequestDiagnostics`] snapshot
//! describing what was sent and, when available, what came back.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Context captured for a failed request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestDiagnostics {
    /// Upper-cased HTTP method
    pub method: String,
    /// Absolute URL, including any query string built from the payload
    pub url: String,
    /// JSON serialization of the request payload, if any
    pub payload: Option<String>,
    /// Request headers, with the token masked
    pub headers: Vec<(String, String)>,
    /// Response status code, when a response was received
    pub status: Option<u16>,
    /// Best-effort decoded response body
    pub response_body: Option<Value>,
}

impl fmt::Display for RequestDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Main error type for the library
#[derive(Debug, Error)]
pub enum AppError {
    /// The login endpoint reported an application-level error
    #[error("authentication error: {message}")]
    Authentication {
        /// Message extracted from the error payload
        message: String,
    },

    /// The HTTP exchange could not complete at the network layer
    #[error("request failed: {message} ({diagnostics})")]
    Transport {
        /// Transport failure description
        message: String,
        /// Request context
        diagnostics: Box<RequestDiagnostics>,
    },

    /// HTTP 200 whose JSON body carries an error
    #[error("request error result: {message}")]
    Request {
        /// Message extracted from the error payload
        message: String,
        /// Request context
        diagnostics: Box<RequestDiagnostics>,
    },

    /// 2xx (other than 200) response to a non-HEAD request
    #[error("unsupported data received: {content_type} ({diagnostics})")]
    UnsupportedResponse {
        /// `Content-Type` of the response
        content_type: String,
        /// Request context
        diagnostics: Box<RequestDiagnostics>,
    },

    /// Status code outside the handled ranges
    #[error("request failed with code {status} ({diagnostics})")]
    HttpStatus {
        /// Response status code
        status: u16,
        /// Request context
        diagnostics: Box<RequestDiagnostics>,
    },

    /// HTTP 200 whose body is not valid JSON
    #[error("malformed response body: {message} ({diagnostics})")]
    MalformedResponse {
        /// Parser error description
        message: String,
        /// Request context
        diagnostics: Box<RequestDiagnostics>,
    },

    /// JSON (de)serialization error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client construction error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Caller supplied an unusable argument
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Returns the request context attached to this error, if any
    #[must_use]
    pub fn diagnostics(&self) -> Option<&RequestDiagnostics> {
        match self {
            AppError::Transport { diagnostics, .. }
            | AppError::Request { diagnostics, .. }
            | AppError::UnsupportedResponse { diagnostics, .. }
            | AppError::HttpStatus { diagnostics, .. }
            | AppError::MalformedResponse { diagnostics, .. } => Some(&**diagnostics),
            _ => None,
        }
    }

    /// Returns the response status code, if a response was received
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.diagnostics().and_then(|d| d.status)
    }
}

/// Result alias used across the crate
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostics() -> Box<RequestDiagnostics> {
        Box::new(RequestDiagnostics {
            method: "GET".to_string(),
            url: "http://localhost/api/ping".to_string(),
            status: Some(404),
            ..Default::default()
        })
    }

    #[test]
    fn test_display_authentication() {
        let error = AppError::Authentication {
            message: "bad password".to_string(),
        };
        assert_eq!(error.to_string(), "authentication error: bad password");
        assert!(error.diagnostics().is_none());
    }

    #[test]
    fn test_display_http_status() {
        let error = AppError::HttpStatus {
            status: 404,
            diagnostics: diagnostics(),
        };
        assert_eq!(
            error.to_string(),
            "request failed with code 404 (GET http://localhost/api/ping)"
        );
        assert_eq!(error.status(), Some(404));
    }

    #[test]
    fn test_from_serde() {
        let serde_error = serde_json::from_str::<Value>("{invalid").unwrap_err();
        let error: AppError = serde_error.into();
        assert!(matches!(error, AppError::Json(_)));
    }
}
