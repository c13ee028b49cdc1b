/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! HTTP transport seam.
//!
//! The session never talks to `reqwest` directly: it hands a fully built
//! [`HttpRequest`] to an [`HttpTransport`] and gets back either the raw
//! [`HttpResponse`] or a [`TransportFailure`] when no response was received.

use crate::application::config::RestApiConfig;
use crate::constants::USER_AGENT;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, Method, Version};
use std::time::Duration;
use tracing::debug;

/// A fully built outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Header name/value pairs, sent in order
    pub headers: Vec<(String, String)>,
    /// Raw body
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A received response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Response headers
    pub headers: Vec<(String, String)>,
    /// Raw body, empty for HEAD
    pub body: String,
}

impl HttpResponse {
    /// Case-insensitive header lookup
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// The exchange could not complete: no response was received
#[derive(Debug, Clone, PartialEq)]
pub struct TransportFailure {
    /// Human-readable cause
    pub message: String,
    /// Whatever part of the body arrived before the failure
    pub body: Option<String>,
}

impl From<reqwest::Error> for TransportFailure {
    fn from(e: reqwest::Error) -> Self {
        Self {
            message: e.to_string(),
            body: None,
        }
    }
}

/// Executes a single HTTP exchange
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `request` and returns the response, or why none was received
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure>;
}

/// [`HttpTransport`] backed by `reqwest`
///
/// Requests are sent as HTTP/1.0 and no connect timeout is configured.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds the underlying client from the REST API settings
    pub fn new(config: &RestApiConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder().user_agent(USER_AGENT).http1_only();
        if config.timeout > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .version(Version::HTTP_10);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = response.text().await.map_err(|e| TransportFailure {
            message: format!("failed to read response body: {e}"),
            body: None,
        })?;
        debug!("Received {} bytes with status {}", body.len(), status);

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
