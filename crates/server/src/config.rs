//! Process configuration, read from the environment (and `.env`, if present).

use std::{net::SocketAddr, str::FromStr};

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://feed.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    /// Cap on activity entries per feed read; `None` reads them all.
    pub activity_feed_limit: Option<i64>,
    pub sentry_dsn: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_addr: SocketAddr = parse_value(
            "BIND_ADDR",
            var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;
        let db_max_connections = parse("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS"))?
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let activity_feed_limit = parse::<i64>("ACTIVITY_FEED_LIMIT", var("ACTIVITY_FEED_LIMIT"))?;
        if activity_feed_limit.is_some_and(|limit| limit <= 0) {
            return Err(ConfigError::Invalid {
                key: "ACTIVITY_FEED_LIMIT",
                value: var("ACTIVITY_FEED_LIMIT").unwrap_or_default(),
            });
        }

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            bind_addr,
            db_max_connections,
            activity_feed_limit,
            sentry_dsn: var("SENTRY_DSN"),
        })
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::Invalid { key, value })
}

fn parse<T: FromStr>(key: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError> {
    value.map(|value| parse_value(key, value)).transpose()
}
