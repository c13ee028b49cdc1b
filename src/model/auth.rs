/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Successful body of the login endpoint (the `error` flag already stripped)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Token to send in the `Authorization` header
    pub token: Option<String>,
    /// Expiry timestamp, absent or null when the token never expires
    #[serde(default)]
    pub expired: Value,
}

impl AuthResponse {
    /// Parsed expiry of the returned token
    ///
    /// An expiry that cannot be read is reported as already passed, so the
    /// token is renewed before every request rather than kept forever.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match &self.expired {
            Value::Null => None,
            Value::String(raw) if raw.is_empty() => None,
            Value::String(raw) => parse_expiry(raw).or_else(|| {
                warn!("Unparseable token expiry '{raw}', treating token as expired");
                Some(DateTime::<Utc>::MIN_UTC)
            }),
            other => {
                warn!("Unexpected token expiry {other}, treating token as expired");
                Some(DateTime::<Utc>::MIN_UTC)
            }
        }
    }
}

/// Parses the `expired` timestamp returned by the login endpoint
///
/// RFC 3339 is tried first; zone-less date-times and bare dates are read as UTC.
#[must_use]
pub fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
