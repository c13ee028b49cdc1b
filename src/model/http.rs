/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

use crate::application::auth::{Auth, Session};
use crate::application::config::Config;
use crate::constants::{JSON_CONTENT_TYPE, REDACTED};
use crate::error::{AppError, RequestDiagnostics};
use crate::model::requests::RequestDescriptor;
use crate::model::responses::{decode_error_body, error_field, parse_error_message};
use crate::model::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Client for the SSAPI with automatic authentication
///
/// This client handles the session lifecycle internally:
/// - Initial login on construction
/// - Re-authentication before any request once the token expiry has passed
/// - Normalization of every failure into [`AppError`]
pub struct HttpClient {
    auth: Arc<Auth>,
    transport: Arc<dyn HttpTransport>,
    config: Arc<Config>,
}

impl HttpClient {
    /// Creates a new client over `reqwest` and performs initial authentication
    ///
    /// # Returns
    /// * `Ok(HttpClient)` - Authenticated client ready to use
    /// * `Err(AppError)` - If the HTTP client cannot be built or login fails
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let transport = Arc::new(ReqwestTransport::new(&config.rest_api)?);
        Self::with_transport(config, transport).await
    }

    /// Creates a new client over a custom transport and performs initial authentication
    pub async fn with_transport(
        config: Config,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, AppError> {
        let client = Self::lazy_with_transport(config, transport);
        client.auth.authenticate().await?;
        Ok(client)
    }

    /// Creates a new client without performing initial authentication
    ///
    /// The first request logs in.
    pub fn new_lazy(config: Config) -> Result<Self, AppError> {
        let transport = Arc::new(ReqwestTransport::new(&config.rest_api)?);
        Ok(Self::lazy_with_transport(config, transport))
    }

    /// Creates a new client over a custom transport without authenticating
    pub fn lazy_with_transport(config: Config, transport: Arc<dyn HttpTransport>) -> Self {
        let config = Arc::new(config);
        let auth = Arc::new(Auth::new(config.clone(), transport.clone()));
        Self {
            auth,
            transport,
            config,
        }
    }

    /// Creates a client that starts from a previously obtained session
    pub fn from_session(
        config: Config,
        transport: Arc<dyn HttpTransport>,
        session: Session,
    ) -> Self {
        let config = Arc::new(config);
        let auth = Arc::new(Auth::with_session(
            config.clone(),
            transport.clone(),
            session,
        ));
        Self {
            auth,
            transport,
            config,
        }
    }

    /// Sends a request to `path`, refreshing the session first if it expired
    ///
    /// For GET the payload is appended as a query string, for every other
    /// method it is sent as a JSON body.
    ///
    /// # Returns
    /// * The parsed JSON body of a 200 response, without its `error` flag
    /// * `Value::Bool(true)` for a HEAD request answered with 201..=299
    pub async fn send_request(
        &self,
        path: &str,
        method: &str,
        payload: Option<Value>,
    ) -> Result<Value, AppError> {
        let descriptor = RequestDescriptor::new(path, method, payload)?;
        self.execute(&descriptor).await
    }

    /// Sends a prepared request, refreshing the session first if it expired
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<Value, AppError> {
        let session = self.auth.ensure_fresh().await?;
        make_http_request(
            self.transport.as_ref(),
            &self.config.rest_api.base_url,
            session.token.as_deref().unwrap_or_default(),
            descriptor,
        )
        .await
    }

    /// Makes a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        self.typed(path, Method::GET, None).await
    }

    /// Makes a GET request with query parameters
    pub async fn get_with_query<Q: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        query: Q,
    ) -> Result<T, AppError> {
        self.typed(path, Method::GET, Some(serde_json::to_value(query)?))
            .await
    }

    /// Makes a POST request
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: B,
    ) -> Result<T, AppError> {
        self.typed(path, Method::POST, Some(serde_json::to_value(body)?))
            .await
    }

    /// Makes a PUT request
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: B,
    ) -> Result<T, AppError> {
        self.typed(path, Method::PUT, Some(serde_json::to_value(body)?))
            .await
    }

    /// Makes a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        self.typed(path, Method::DELETE, None).await
    }

    /// Makes a HEAD request, returning `false` when the resource does not exist
    pub async fn head(&self, path: &str) -> Result<bool, AppError> {
        match self.send_request(path, Method::HEAD.as_str(), None).await {
            Ok(_) => Ok(true),
            Err(AppError::HttpStatus { status: 404, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn typed<T: DeserializeOwned>(
        &self,
        path: &str,
        method: Method,
        payload: Option<Value>,
    ) -> Result<T, AppError> {
        let value = self.send_request(path, method.as_str(), payload).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Forces a new login, replacing the cached token
    pub async fn authenticate(&self) -> Result<Session, AppError> {
        self.auth.authenticate().await
    }

    /// Re-authenticates if the cached token expired
    pub async fn ensure_fresh(&self) -> Result<Session, AppError> {
        self.auth.ensure_fresh().await
    }

    /// Gets the cached session without refreshing it
    pub async fn get_session(&self) -> Session {
        self.auth.get_session().await
    }

    /// Gets Auth reference
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Gets the client configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Builds, sends and classifies a single request without touching the session
///
/// This is the low-level path shared by regular requests and by login, which
/// must not go through the expiry check.
///
/// # Arguments
///
/// * `transport` - Transport executing the exchange
/// * `base_url` - API base every path is appended to
/// * `token` - Value of the `Authorization` header
/// * `descriptor` - Path, method and payload of the call
///
/// # Returns
///
/// * `Ok(Value)` - Parsed body of a 200 response (minus `error`), or `true`
///   for HEAD answered with 201..=299
/// * `Err(AppError)` - Transport, application or status failure
pub async fn make_http_request(
    transport: &dyn HttpTransport,
    base_url: &str,
    token: &str,
    descriptor: &RequestDescriptor,
) -> Result<Value, AppError> {
    let url = descriptor.url(base_url);
    let payload = descriptor.serialized_payload()?;
    let body = descriptor.body()?;

    let mut headers = vec![
        ("Authorization".to_string(), token.to_string()),
        ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
    ];
    if let Some(body) = &body {
        headers.push(("Content-Length".to_string(), body.len().to_string()));
    }

    let diagnostics = |status: Option<u16>, raw_body: Option<&str>| {
        Box::new(RequestDiagnostics {
            method: descriptor.method.to_string(),
            url: url.clone(),
            payload: payload.clone(),
            headers: masked(&headers),
            status,
            response_body: raw_body.and_then(decode_error_body),
        })
    };

    debug!("{} {}", descriptor.method, url);

    let request = HttpRequest {
        method: descriptor.method.clone(),
        url: url.clone(),
        headers: headers.clone(),
        body,
    };

    let response = match transport.execute(request).await {
        Ok(response) => response,
        Err(failure) => {
            error!("{} {} failed: {}", descriptor.method, url, failure.message);
            return Err(AppError::Transport {
                diagnostics: diagnostics(None, failure.body.as_deref()),
                message: failure.message,
            });
        }
    };
    debug!("Response status: {}", response.status);

    classify_response(descriptor, response, diagnostics)
}

fn classify_response<F>(
    descriptor: &RequestDescriptor,
    response: HttpResponse,
    diagnostics: F,
) -> Result<Value, AppError>
where
    F: Fn(Option<u16>, Option<&str>) -> Box<RequestDiagnostics>,
{
    let status = response.status;
    match status {
        200 => {
            if response.body.trim().is_empty() {
                return Ok(Value::Null);
            }
            let value: Value = match serde_json::from_str(&response.body) {
                Ok(value) => value,
                Err(e) => {
                    error!("Malformed JSON body from {}: {e}", descriptor.path);
                    return Err(AppError::MalformedResponse {
                        message: e.to_string(),
                        diagnostics: diagnostics(Some(status), Some(&response.body)),
                    });
                }
            };
            if let Some(error) = error_field(&value) {
                let message = parse_error_message(error);
                warn!("Request error result from {}: {message}", descriptor.path);
                return Err(AppError::Request {
                    message,
                    diagnostics: diagnostics(Some(status), Some(&response.body)),
                });
            }
            Ok(match value {
                Value::Object(map) => Value::Object(
                    map.into_iter()
                        .filter(|(key, _)| key != "error")
                        .collect(),
                ),
                other => other,
            })
        }
        201..=299 if descriptor.method == Method::HEAD => Ok(Value::Bool(true)),
        201..=299 => {
            let content_type = response.header("content-type").unwrap_or("unknown");
            error!(
                "Unsupported {} response to {} {}",
                content_type, descriptor.method, descriptor.path
            );
            Err(AppError::UnsupportedResponse {
                content_type: content_type.to_string(),
                diagnostics: diagnostics(Some(status), Some(&response.body)),
            })
        }
        _ => {
            error!(
                "Request failed with status {}: {} {}",
                status, descriptor.method, descriptor.path
            );
            Err(AppError::HttpStatus {
                status,
                diagnostics: diagnostics(Some(status), Some(&response.body)),
            })
        }
    }
}

fn masked(headers: &[(String, String)]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            if name.eq_ignore_ascii_case("authorization") && !value.is_empty() {
                (name.clone(), REDACTED.to_string())
            } else {
                (name.clone(), value.clone())
            }
        })
        .collect()
}
