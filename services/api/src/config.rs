//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use chrono_tz::Tz;
use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// SMTP relay settings for the order emails.
#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender mailbox, e.g. `Restaurant Sonne <bestellung@sonne.ch>`.
    pub from: String,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub timezone: Tz,
    pub app_base_url: String,
    pub cors_origin: String,
    pub smtp: SmtpConfig,
    pub restaurant_name: String,
    pub restaurant_email: String,
    pub restaurant_phone: String,
    /// Bearer token required by the dashboard routes.
    pub dashboard_token: String,
    pub show_coming_soon: bool,
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Parses the usual truthy spellings; anything else is `false`.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
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

        // --- Load Server and Database Settings ---
        let bind_address_str = optional("BIND_ADDRESS", "0.0.0.0:3000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = required("DATABASE_URL")?;

        let log_level_str = optional("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let timezone_str = optional("RESTAURANT_TIMEZONE", "Europe/Zurich");
        let timezone = timezone_str.parse::<Tz>().map_err(|_| {
            ConfigError::InvalidValue(
                "RESTAURANT_TIMEZONE".to_string(),
                format!("'{}' is not a known IANA time zone", timezone_str),
            )
        })?;

        let app_base_url = optional("APP_BASE_URL", "http://localhost:3000");
        let cors_origin = optional("CORS_ORIGIN", &app_base_url);

        // --- Load SMTP Settings ---
        let smtp_port_str = optional("SMTP_PORT", "587");
        let smtp = SmtpConfig {
            host: required("SMTP_HOST")?,
            port: smtp_port_str.parse::<u16>().map_err(|e| {
                ConfigError::InvalidValue("SMTP_PORT".to_string(), e.to_string())
            })?,
            username: required("SMTP_USERNAME")?,
            password: required("SMTP_PASSWORD")?,
            from: required("MAIL_FROM")?,
        };

        // --- Load Restaurant Details ---
        let restaurant_email = required("RESTAURANT_EMAIL")?;
        let restaurant_name = optional("RESTAURANT_NAME", "Restaurant");
        let restaurant_phone = optional("RESTAURANT_PHONE", "");

        let dashboard_token = required("DASHBOARD_TOKEN")?;
        if dashboard_token.trim().len() < 16 {
            return Err(ConfigError::InvalidValue(
                "DASHBOARD_TOKEN".to_string(),
                "must be at least 16 characters".to_string(),
            ));
        }

        let show_coming_soon = parse_flag(&optional("SHOW_COMING_SOON", "false"));

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            timezone,
            app_base_url,
            cors_origin,
            smtp,
            restaurant_name,
            restaurant_email,
            restaurant_phone,
            dashboard_token,
            show_coming_soon,
        })
    }
}
