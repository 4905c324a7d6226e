use std::env;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
/// Roughly one trading year of daily bars.
pub const DEFAULT_MAX_BARS: u32 = 252;
pub const DEFAULT_STALE_DAYS: i64 = 30;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Settings for one scanner process, read once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub concurrency: usize,
    pub max_bars: u32,
    pub stale_after_days: i64,
    pub allow_backfill: bool,
}

impl ScanConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let default_concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        let config = Self {
            database_url,
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            concurrency: parse_var(&lookup, "SCAN_CONCURRENCY", default_concurrency)?,
            max_bars: parse_var(&lookup, "SCAN_MAX_BARS", DEFAULT_MAX_BARS)?,
            stale_after_days: parse_var(&lookup, "SCAN_STALE_DAYS", DEFAULT_STALE_DAYS)?,
            allow_backfill: parse_flag(&lookup, "SCAN_ALLOW_BACKFILL")?,
        };

        if config.max_connections == 0 {
            return Err(invalid("DB_MAX_CONNECTIONS", "0"));
        }
        if config.concurrency == 0 {
            return Err(invalid("SCAN_CONCURRENCY", "0"));
        }
        if config.max_bars == 0 {
            return Err(invalid("SCAN_MAX_BARS", "0"));
        }
        if config.stale_after_days < 0 {
            return Err(invalid("SCAN_STALE_DAYS", &config.stale_after_days.to_string()));
        }
        Ok(config)
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| invalid(key, &raw)),
        None => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, key: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|raw| raw.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(raw) => match raw.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(invalid(key, &raw)),
        },
    }
}
