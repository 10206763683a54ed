//! Runtime configuration for the client stack.
//!
//! Defaults point at the public PokeAPI. Hosts override individual values
//! through `POKEDEX_*` environment variables or by building `Config`
//! directly.

use std::time::Duration;

use thiserror::Error;

use crate::cache::DEFAULT_MAX_AGE;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_LIST_LIMIT: u32 = 151;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_BASE_URL: &str = "POKEDEX_BASE_URL";
pub const ENV_LIST_LIMIT: &str = "POKEDEX_LIST_LIMIT";
pub const ENV_CACHE_MAX_AGE: &str = "POKEDEX_CACHE_MAX_AGE_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    /// `limit` query parameter sent with the listing request.
    pub list_limit: u32,
    pub cache_max_age: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_limit: DEFAULT_LIST_LIMIT,
            cache_max_age: DEFAULT_MAX_AGE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_BASE_URL) {
            let url = url.trim().to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    var: ENV_BASE_URL,
                    value: url,
                    reason: "expected an http(s) URL".to_string(),
                });
            }
            config.base_url = url;
        }
        if let Some(raw) = get(ENV_LIST_LIMIT) {
            config.list_limit = parse_number(ENV_LIST_LIMIT, &raw)?;
            if config.list_limit == 0 {
                return Err(ConfigError::InvalidValue {
                    var: ENV_LIST_LIMIT,
                    value: raw,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(raw) = get(ENV_CACHE_MAX_AGE) {
            config.cache_max_age = Duration::from_secs(parse_number(ENV_CACHE_MAX_AGE, &raw)?);
        }
        Ok(config)
    }
}

fn parse_number<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, "https://pokeapi.co/api/v2");
        assert_eq!(config.cache_max_age, Duration::from_secs(600));
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            (ENV_BASE_URL, "http://127.0.0.1:3000"),
            (ENV_LIST_LIMIT, "20"),
            (ENV_CACHE_MAX_AGE, " 5 "),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.list_limit, 20);
        assert_eq!(config.cache_max_age, Duration::from_secs(5));
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = Config::from_lookup(lookup(&[(ENV_LIST_LIMIT, "  ")])).unwrap();
        assert_eq!(config.list_limit, DEFAULT_LIST_LIMIT);
    }

    #[test]
    fn rejects_bad_values() {
        let err = Config::from_lookup(lookup(&[(ENV_LIST_LIMIT, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: ENV_LIST_LIMIT, .. }));

        let err = Config::from_lookup(lookup(&[(ENV_LIST_LIMIT, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: ENV_LIST_LIMIT, .. }));

        let err = Config::from_lookup(lookup(&[(ENV_BASE_URL, "ftp://x")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: ENV_BASE_URL, .. }));
    }
}
