use crate::api::ApiSettings;
use chrono::NaiveDate;
use reqwest::Url;
use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api: ApiSettings,
    pub cache_path: PathBuf,
    pub cache_enabled: bool,
    pub season_start: Option<NaiveDate>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ApiSettings::default();

        let base_url: String = load(&lookup, "API_BASE_URL", defaults.base_url)?;
        Url::parse(&base_url).map_err(|err| ConfigError::Invalid {
            key: "API_BASE_URL",
            value: base_url.clone(),
            reason: err.to_string(),
        })?;

        let timeout_ms: u64 = load(&lookup, "API_TIMEOUT_MS", defaults.timeout.as_millis() as u64)?;
        let retry_delay_ms: u64 = load(
            &lookup,
            "API_RETRY_DELAY_MS",
            defaults.retry_delay.as_millis() as u64,
        )?;

        let season_start = match lookup("STEP_SEASON_START") {
            Some(value) => Some(parse("STEP_SEASON_START", &value)?),
            None => None,
        };

        Ok(Self {
            port: load(&lookup, "PORT", 8080)?,
            api: ApiSettings {
                base_url,
                timeout: Duration::from_millis(timeout_ms),
                retries: load(&lookup, "API_RETRIES", defaults.retries)?,
                retry_delay: Duration::from_millis(retry_delay_ms),
            },
            cache_path: lookup("APP_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/cache.json")),
            cache_enabled: load(&lookup, "APP_CACHE_ENABLED", true)?,
            season_start,
        })
    }
}

fn load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => parse(key, &value),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert_eq!(config.api.retries, 2);
        assert_eq!(config.api.retry_delay, Duration::from_secs(1));
        assert_eq!(config.cache_path, PathBuf::from("data/cache.json"));
        assert!(config.cache_enabled);
        assert!(config.season_start.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("API_BASE_URL", "http://upstream:4000/api"),
            ("API_TIMEOUT_MS", "250"),
            ("API_RETRIES", "0"),
            ("APP_CACHE_ENABLED", "false"),
            ("STEP_SEASON_START", "2025-01-01"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.api.base_url, "http://upstream:4000/api");
        assert_eq!(config.api.timeout, Duration::from_millis(250));
        assert_eq!(config.api.retries, 0);
        assert!(!config.cache_enabled);
        assert_eq!(config.season_start, NaiveDate::from_ymd_opt(2025, 1, 1));
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
        assert!(config_from(&[("API_BASE_URL", "not a url")]).is_err());
        assert!(config_from(&[("STEP_SEASON_START", "January")]).is_err());
    }
}
