//! Process configuration read from the environment (and `.env` via dotenvy).

use icu_locale_core::Locale;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    NotANumber { name: &'static str, value: String },

    #[error("CATALOG_LOCALE {0:?} is not a valid locale")]
    InvalidLocale(String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Postgres product store; without it the seed file is served from memory.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub seed_path: Option<PathBuf>,
    /// Overrides the built-in attribute schemas.
    pub schema_path: Option<PathBuf>,
    /// Collation locale for name sorting.
    pub locale: Locale,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let number = |name: &'static str, default: u32| -> Result<u32, ConfigError> {
            match get(name) {
                None => Ok(default),
                Some(value) => value.parse().map_err(|_| ConfigError::NotANumber { name, value }),
            }
        };
        let port = match get("PORT") {
            None => 8083,
            Some(value) => value.parse().map_err(|_| ConfigError::NotANumber { name: "PORT", value })?,
        };
        let locale_tag = get("CATALOG_LOCALE").unwrap_or_else(|| "vi".to_string());
        let locale = locale_tag.parse::<Locale>().map_err(|_| ConfigError::InvalidLocale(locale_tag.clone()))?;

        Ok(Self {
            port,
            database_url: get("DATABASE_URL"),
            max_connections: number("DATABASE_MAX_CONNECTIONS", 10)?,
            seed_path: get("CATALOG_SEED_PATH").map(PathBuf::from),
            schema_path: get("CATALOG_SCHEMA_PATH").map(PathBuf::from),
            locale,
        })
    }
}
