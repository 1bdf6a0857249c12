use std::env;

use crate::error::ConfigError;

/// Application configuration, read once at startup and passed into the
/// handlers through the router state. Handlers never touch the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Shared secret checked against the `key` query parameter.
    pub api_key: String,
    /// Page size used when `per_page` is absent.
    pub default_per_page: i64,
    /// Upper bound accepted for `per_page`.
    pub max_per_page: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("API_KEY").map_err(|_| ConfigError::MissingEnv("API_KEY"))?;

        let default_per_page = match env::var("DEFAULT_PER_PAGE") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|v| *v >= 1)
                .ok_or(ConfigError::InvalidEnv("DEFAULT_PER_PAGE"))?,
            Err(_) => 15,
        };

        Ok(AppConfig {
            api_key,
            default_per_page,
            max_per_page: 100,
        })
    }
}
