//! Configuration loader for the `forecast-desk` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). Nothing else in the crate reads the environment;
//! the resulting [`Config`] is handed to the weather client and the router.
//!
use std::{env, fmt};

use anyhow::{anyhow, Result};

/// Default provider endpoint (OpenWeatherMap v2.5 API).
pub const DEFAULT_API_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Default SQLite database, created on first use.
pub const DEFAULT_DB_URL: &str = "sqlite://weather_data.db?mode=rwc";

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_num {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application. `Debug` masks the API key.
#[derive(Clone)]
pub struct Config {
    // ---
    /// SQLite connection string for the forecast record store.
    pub db_url: String,

    /// Weather provider base URL, without trailing slash.
    pub api_url: String,

    /// Weather provider credential (`appid`).
    pub api_key: String,

    /// Timeout applied to every provider request.
    pub http_timeout_secs: u64,

    /// Port the HTTP surface binds to.
    pub listen_port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `WEATHER_API_KEY` – provider credential
///
/// Optional:
/// - `WEATHER_API_URL` – provider base URL (default: OpenWeatherMap 2.5)
/// - `DATABASE_URL` – SQLite connection string (default: `weather_data.db`)
/// - `HTTP_TIMEOUT_SECS` – provider request timeout (default: 30)
/// - `LISTEN_PORT` – HTTP port (default: 8080)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let api_key = require_env!("WEATHER_API_KEY");
    let api_url = env::var("WEATHER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DB_URL.to_string());
    let http_timeout_secs = parse_env_num!("HTTP_TIMEOUT_SECS", u64, 30);
    let listen_port = parse_env_num!("LISTEN_PORT", u16, 8080);

    if api_key.trim().is_empty() {
        return Err(anyhow!("WEATHER_API_KEY must not be empty"));
    }

    Ok(Config {
        db_url,
        api_url: api_url.trim_end_matches('/').to_string(),
        api_key,
        http_timeout_secs,
        listen_port,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// The API key is masked down to its last four characters.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  DATABASE_URL      : {}", self.db_url);
        tracing::info!("  WEATHER_API_URL   : {}", self.api_url);
        tracing::info!("  WEATHER_API_KEY   : {}", mask_secret(&self.api_key));
        tracing::info!("  HTTP_TIMEOUT_SECS : {}", self.http_timeout_secs);
        tracing::info!("  LISTEN_PORT       : {}", self.listen_port);
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ---
        f.debug_struct("Config")
            .field("db_url", &self.db_url)
            .field("api_url", &self.api_url)
            .field("api_key", &mask_secret(&self.api_key))
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("listen_port", &self.listen_port)
            .finish()
    }
}

pub(crate) fn mask_secret(secret: &str) -> String {
    // ---
    let count = secret.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{tail}")
}
