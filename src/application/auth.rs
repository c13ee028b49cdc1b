/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Authentication module for the SSAPI
//!
//! This module owns the cached session token and its expiry:
//! - Login with the configured credentials
//! - Expiry check before every request
//! - Automatic re-authentication once the expiry has passed

use crate::application::config::Config;
use crate::constants::AUTH_PATH;
use crate::error::AppError;
use crate::model::auth::AuthResponse;
use crate::model::http::make_http_request;
use crate::model::requests::{AuthRequest, RequestDescriptor};
use crate::model::transport::HttpTransport;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Cached session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Token sent in the `Authorization` header, `None` before the first login
    pub token: Option<String>,
    /// Instant after which the token is stale, `None` when it never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Checks if a login has been performed
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Checks if the expiry is set and strictly before `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }

    /// Checks if the expiry is set and already passed
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Checks if a login is required before the next request
    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        !self.is_authenticated() || self.is_expired()
    }
}

/// Authentication manager for the SSAPI
///
/// The session lives behind a lock: a refresh re-checks the expiry under the
/// write lock, so callers racing on a stale token trigger a single login.
pub struct Auth {
    config: Arc<Config>,
    transport: Arc<dyn HttpTransport>,
    session: RwLock<Session>,
}

impl Auth {
    /// Creates a new Auth instance with no session
    pub fn new(config: Arc<Config>, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_session(config, transport, Session::default())
    }

    /// Creates a new Auth instance starting from an existing session
    pub fn with_session(
        config: Arc<Config>,
        transport: Arc<dyn HttpTransport>,
        session: Session,
    ) -> Self {
        Self {
            config,
            transport,
            session: RwLock::new(session),
        }
    }

    /// Gets the cached session without refreshing it
    pub async fn get_session(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Returns a usable session, logging in first if the cached one expired
    ///
    /// # Returns
    /// * `Ok(Session)` - Session whose token is not known to be expired
    /// * `Err(AppError)` - If the required login fails
    pub async fn ensure_fresh(&self) -> Result<Session, AppError> {
        {
            let session = self.session.read().await;
            if !session.needs_refresh() {
                return Ok(session.clone());
            }
        }

        let mut session = self.session.write().await;
        if session.needs_refresh() {
            match session.expires_at {
                Some(expires_at) if session.is_authenticated() => {
                    warn!("Session token expired at {expires_at}, re-authenticating");
                }
                _ => info!("No active session, logging in"),
            }
            let current_token = session.token.clone();
            let fresh = self.login(current_token.as_deref()).await?;
            *session = fresh;
        } else {
            debug!("Session refreshed by a concurrent caller");
        }
        Ok(session.clone())
    }

    /// Logs in with the configured credentials, replacing any cached token
    ///
    /// # Returns
    /// * `Ok(Session)` - The new session
    /// * `Err(AppError::Authentication)` - If the API rejected the credentials
    pub async fn authenticate(&self) -> Result<Session, AppError> {
        let mut session = self.session.write().await;
        let current_token = session.token.clone();
        let fresh = self.login(current_token.as_deref()).await?;
        *session = fresh;
        Ok(session.clone())
    }

    async fn login(&self, current_token: Option<&str>) -> Result<Session, AppError> {
        let credentials = &self.config.credentials;
        let body = serde_json::to_value(AuthRequest {
            email: &credentials.login,
            password: &credentials.password,
        })?;
        let descriptor = RequestDescriptor::new(AUTH_PATH, "POST", Some(body))?;

        debug!("Sending login request for {}", credentials.login);
        let value = match make_http_request(
            self.transport.as_ref(),
            &self.config.rest_api.base_url,
            current_token.unwrap_or_default(),
            &descriptor,
        )
        .await
        {
            Ok(value) => value,
            Err(AppError::Request { message, .. }) => {
                error!("Login rejected for {}: {message}", credentials.login);
                return Err(AppError::Authentication { message });
            }
            Err(e) => return Err(e),
        };

        let response: AuthResponse = serde_json::from_value(value)?;
        let expires_at = response.expires_at();
        let token = response.token.ok_or_else(|| AppError::Authentication {
            message: "login response carried no token".to_string(),
        })?;

        info!("✓ Login successful for {}", credentials.login);
        Ok(Session {
            token: Some(token),
            expires_at,
        })
    }
}
