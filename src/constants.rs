/// Default API origin and path prefix every request path is appended to
pub const DEFAULT_BASE_URL: &str = "http://alpha.omnismain.com:3000/api/v.2";
/// Path of the login endpoint, relative to the API base
pub const AUTH_PATH: &str = "/manager/auth";
/// Default whole-request timeout in seconds (0 = unbounded)
pub const DEFAULT_TIMEOUT_SECS: u64 = 0;
/// User agent string used to identify this client to the API
pub const USER_AGENT: &str = concat!("ssapi-client/", env!("CARGO_PKG_VERSION"));
/// Content type sent with every request
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Placeholder written in place of the token in error diagnostics
pub const REDACTED: &str = "<redacted>";
