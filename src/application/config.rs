use crate::constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::utils::config::get_env_or_default;
use dotenv::dotenv;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone)]
/// Login credentials for the SSAPI manager account
pub struct Credentials {
    /// Login (sent as `email` to the auth endpoint)
    pub login: String,
    /// Password, never serialized
    #[serde(skip_serializing, default)]
    pub password: String,
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone)]
/// Configuration for the REST API
pub struct RestApiConfig {
    /// Origin plus path prefix every request path is appended to
    pub base_url: String,
    /// Whole-request timeout in seconds, 0 means unbounded
    pub timeout: u64,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone)]
/// Main configuration for the SSAPI client
pub struct Config {
    /// Authentication credentials
    pub credentials: Credentials,
    /// REST API configuration
    pub rest_api: RestApiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Builds a configuration from the environment, loading `.env` first
    ///
    /// Reads `SSAPI_LOGIN`, `SSAPI_PASSWORD`, `SSAPI_BASE_URL` and
    /// `SSAPI_TIMEOUT`.
    pub fn new() -> Self {
        match dotenv() {
            Ok(_) => debug!("Successfully loaded .env file"),
            Err(e) => debug!("Failed to load .env file: {e}"),
        }

        let login = get_env_or_default("SSAPI_LOGIN", String::new());
        let password = get_env_or_default("SSAPI_PASSWORD", String::new());

        if login.is_empty() {
            error!("SSAPI_LOGIN not found in environment variables or .env file");
        }
        if password.is_empty() {
            error!("SSAPI_PASSWORD not found in environment variables or .env file");
        }

        Config {
            credentials: Credentials { login, password },
            rest_api: RestApiConfig {
                base_url: get_env_or_default("SSAPI_BASE_URL", DEFAULT_BASE_URL.to_string()),
                timeout: get_env_or_default("SSAPI_TIMEOUT", DEFAULT_TIMEOUT_SECS),
            },
        }
    }

    /// Builds a configuration from explicit credentials and the default API base
    pub fn with_credentials(login: impl Into<String>, password: impl Into<String>) -> Self {
        Config {
            credentials: Credentials {
                login: login.into(),
                password: password.into(),
            },
            rest_api: RestApiConfig::default(),
        }
    }

    /// Replaces the API base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.rest_api.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_credentials_uses_default_base() {
        let config = Config::with_credentials("manager@example.com", "secret");
        assert_eq!(config.credentials.login, "manager@example.com");
        assert_eq!(config.credentials.password, "secret");
        assert_eq!(config.rest_api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.rest_api.timeout, 0);
    }

    #[test]
    fn test_password_is_not_serialized() {
        let config = Config::with_credentials("manager@example.com", "secret")
            .with_base_url("http://localhost:3000/api/v.2");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("http://localhost:3000/api/v.2"));

        let restored: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.credentials.login, "manager@example.com");
        assert!(restored.credentials.password.is_empty());
    }
}
