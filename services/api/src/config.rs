//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Upstream credentials stay optional: endpoints that need a missing key
    /// answer with a configuration error instead of the server refusing to boot.
    pub openai_api_key: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub tts_model: String,
    pub tts_timeout_secs: u64,
    pub summary_model: String,
    pub generation_model: String,
    pub admin_email: String,
    pub admin_password: String,
    pub allowed_origin: String,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str = var_or("BIND_ADDRESS", "0.0.0.0:3000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin = var_or("ALLOWED_ORIGIN", "http://localhost:3000");
        let max_upload_bytes = parse_var("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?;

        // --- Load API Keys (as optional) ---
        let openai_api_key = optional_var("OPENAI_API_KEY");
        let elevenlabs_api_key = optional_var("ELEVENLABS_API_KEY");

        // --- Load Adapter-specific Settings ---
        let elevenlabs_base_url = var_or("ELEVENLABS_BASE_URL", "https://api.elevenlabs.io")
            .trim_end_matches('/')
            .to_string();
        let tts_model = var_or("TTS_MODEL", "eleven_multilingual_v2");
        let tts_timeout_secs = parse_var("TTS_TIMEOUT_SECS", 60)?;
        let summary_model = var_or("SUMMARY_MODEL", "gpt-3.5-turbo");
        let generation_model = var_or("GENERATION_MODEL", "gpt-4");

        // --- Load Mock Account Settings ---
        let admin_email = var_or("ADMIN_EMAIL", "admin@studybuddy.com");
        let admin_password = var_or("ADMIN_PASSWORD", "admin123");

        Ok(Self {
            bind_address,
            log_level,
            openai_api_key,
            elevenlabs_api_key,
            elevenlabs_base_url,
            tts_model,
            tts_timeout_secs,
            summary_model,
            generation_model,
            admin_email,
            admin_password,
            allowed_origin,
            max_upload_bytes,
        })
    }
}

impl Default for Config {
    /// The built-in defaults with no upstream credentials.
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_level: Level::INFO,
            openai_api_key: None,
            elevenlabs_api_key: None,
            elevenlabs_base_url: "https://api.elevenlabs.io".to_string(),
            tts_model: "eleven_multilingual_v2".to_string(),
            tts_timeout_secs: 60,
            summary_model: "gpt-3.5-turbo".to_string(),
            generation_model: "gpt-4".to_string(),
            admin_email: "admin@studybuddy.com".to_string(),
            admin_password: "admin123".to_string(),
            allowed_origin: "http://localhost:3000".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Treats an empty value the same as an unset one.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
