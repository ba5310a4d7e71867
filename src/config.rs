//! Environment configuration. Call `dotenvy::dotenv()` first to pick up a `.env` file.

use std::time::Duration;

use crate::{Result, StorefrontError};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PORT: u16 = 8090;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Origin the `/api/...` paths are resolved against.
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> { Self::from_lookup(|key| std::env::var(key).ok()) }

    /// Unset variables take their defaults; set but unparseable ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let api_base_url = lookup("API_BASE_URL").filter(|v| !v.trim().is_empty()).unwrap_or(defaults.api_base_url);
        let timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(StorefrontError::Config(format!("REQUEST_TIMEOUT_SECS must be a positive integer, got '{}'", raw))),
            },
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| StorefrontError::Config(format!("PORT must be a port number, got '{}'", raw)))?,
            None => defaults.port,
        };
        Ok(Self { api_base_url, request_timeout: Duration::from_secs(timeout_secs), port })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Config::from_lookup(lookup(&[])).unwrap(), Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[("API_BASE_URL", "http://gateway:9000"), ("REQUEST_TIMEOUT_SECS", "3"), ("PORT", "8181")])).unwrap();
        assert_eq!(config.api_base_url, "http://gateway:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.port, 8181);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(Config::from_lookup(lookup(&[("REQUEST_TIMEOUT_SECS", "soon")])), Err(StorefrontError::Config(_))));
        assert!(matches!(Config::from_lookup(lookup(&[("REQUEST_TIMEOUT_SECS", "0")])), Err(StorefrontError::Config(_))));
        assert!(matches!(Config::from_lookup(lookup(&[("PORT", "70000")])), Err(StorefrontError::Config(_))));
    }
}
