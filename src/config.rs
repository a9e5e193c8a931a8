use std::{
    env,
    net::{IpAddr, SocketAddr},
    str::FromStr,
    time::Duration,
};

use thiserror::Error;

pub const DEFAULT_DB_NAME: &str = "gdg";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} no está configurada")]
    Missing(&'static str),
    #[error("Valor inválido para {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongo_uri: String,
    pub db_name: String,
    pub connect_timeout: Duration,
    pub host: IpAddr,
    pub port: u16,
    pub admin_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongo_uri = required(&lookup, "MONGODB_URI")?;
        let db_name = optional(&lookup, "MONGO_DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.into());
        let connect_timeout = Duration::from_secs(parsed(
            &lookup,
            "MONGO_CONNECT_TIMEOUT_SECS",
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?);
        let port = parsed(&lookup, "PORT", DEFAULT_PORT)?;
        let host = parsed(&lookup, "IP_SERVER", IpAddr::from([0, 0, 0, 0]))?;
        let admin_token = optional(&lookup, "ADMIN_API_TOKEN");

        Ok(Self {
            mongo_uri,
            db_name,
            connect_timeout,
            host,
            port,
            admin_token,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Settings for consumers of the API that reach it through two origins.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub primary_base: String,
    pub fallback_base: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            primary_base: required(&lookup, "PRIMARY_API_URL")?,
            fallback_base: required(&lookup, "FALLBACK_API_URL")?,
            timeout: Duration::from_secs(parsed(
                &lookup,
                "FETCH_TIMEOUT_SECS",
                DEFAULT_FETCH_TIMEOUT_SECS,
            )?),
        })
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match optional(lookup, key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
