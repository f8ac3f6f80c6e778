//! A client for listing and controlling Govee devices through the
//! Govee Platform API.

use std::str::FromStr;

pub mod device;
pub mod error;
pub mod platform_api;

pub use device::Device;
pub use error::{GoveeError, Result};
pub use platform_api::GoveeApiClient;

/// Reads and parses an optional environment variable.
/// Returns `Ok(None)` when it is not set.
pub fn opt_env_var<T: FromStr>(name: &str) -> Result<Option<T>>
where
    <T as FromStr>::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(p) => Ok(Some(p.trim().parse().map_err(|err| {
            GoveeError::Config(format!("parsing ${name}: {err:#}"))
        })?)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(GoveeError::Config(format!("${name} is invalid: {err:#}"))),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_env_var() {
        assert_eq!(
            opt_env_var::<String>("GOVEE_DEVICES_TEST_SURELY_UNSET").unwrap(),
            None
        );
    }
}
