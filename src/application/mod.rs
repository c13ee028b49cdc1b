/// Authentication and session caching
pub mod auth;
/// Application configuration module
pub mod config;
