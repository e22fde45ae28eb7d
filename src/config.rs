use std::env;

use thiserror::Error;

use crate::domain::sale::SalePolicy;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub pool_max_size: u32,
    pub sale_policy: SalePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8080)?;
        let pool_max_size = parse_or(&lookup, "DB_POOL_MAX_SIZE", 10)?;
        if pool_max_size == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_POOL_MAX_SIZE",
                value: "0".to_string(),
            });
        }
        let require_items = parse_or(&lookup, "SALES_REQUIRE_ITEMS", true)?;

        Ok(Self {
            database_url,
            host,
            port,
            pool_max_size,
            sale_policy: SalePolicy { require_items },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
