/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/
/// Login response model and expiry parsing
pub mod auth;
/// Client facade and request dispatch
pub mod http;
/// Request models and query-string encoding
pub mod requests;
/// Error-payload interpretation
pub mod responses;
/// HTTP transport seam
pub mod transport;
