/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/
use std::env;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::error;

/// Reads and parses an environment variable, falling back to `default`
///
/// A variable that is set but fails to parse is logged and replaced by the
/// default, so a typo in `.env` never aborts client construction.
pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|e| {
            error!("Failed to parse {env_var}={val}: {e:?}, using default");
            default
        }),
        Err(_) => default,
    }
}
