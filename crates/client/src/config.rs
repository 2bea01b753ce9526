//! # Client Configuration Module
//!
//! Loads the settings for talking to the booking backend and for the local
//! slot grid. Values come from environment variables (a `.env` file is
//! loaded by the binary before this runs).
//!
//! ## Environment Variables
//!
//! - `ROOMBOOK_API_URL`: base URL of the booking API (default: "http://localhost:3000/api")
//! - `LOG_LEVEL`: logging level (default: "info")
//! - `ROOMBOOK_REQUEST_TIMEOUT_SECONDS`: per-request timeout (default: 30)
//! - `ROOMBOOK_NOTIFICATION_SECONDS`: how long notifications stay visible (default: 3)
//! - `ROOMBOOK_OPEN_TIME` / `ROOMBOOK_CLOSE_TIME`: operating window (default: 08:30 / 17:30)
//! - `ROOMBOOK_SLOT_MINUTES`: slot granularity in minutes (default: 15)

use eyre::{Result, WrapErr};
use roombook_core::{
    slots::{OperatingWindow, DEFAULT_GRANULARITY_MINUTES},
    time::parse_clock_time,
};
use std::env;
use tracing::Level;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_NOTIFICATION_SECONDS: u64 = 3;

/// Configuration for the booking client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the booking API, without a trailing slash
    pub api_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Seconds a notification stays visible before it is dismissed
    pub notification_seconds: u64,

    /// Bookable hours and slot grid
    pub window: OperatingWindow,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_level: Level::INFO,
            request_timeout: 30,
            notification_seconds: DEFAULT_NOTIFICATION_SECONDS,
            window: OperatingWindow::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a ClientConfig from environment variables.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `ROOMBOOK_NOTIFICATION_SECONDS` or `ROOMBOOK_SLOT_MINUTES` is not a number
    /// - `ROOMBOOK_OPEN_TIME` or `ROOMBOOK_CLOSE_TIME` is not an `HH:MM` time
    /// - the resulting operating window is empty
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("ROOMBOOK_API_URL")
            .unwrap_or(defaults.api_url)
            .trim_end_matches('/')
            .to_string();

        let log_level = match lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let request_timeout = lookup("ROOMBOOK_REQUEST_TIMEOUT_SECONDS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.request_timeout);

        let notification_seconds = match lookup("ROOMBOOK_NOTIFICATION_SECONDS") {
            Some(value) => value
                .parse()
                .wrap_err("Invalid ROOMBOOK_NOTIFICATION_SECONDS value")?,
            None => defaults.notification_seconds,
        };

        let open = match lookup("ROOMBOOK_OPEN_TIME") {
            Some(value) => parse_clock_time(&value).wrap_err("Invalid ROOMBOOK_OPEN_TIME value")?,
            None => defaults.window.open(),
        };
        let close = match lookup("ROOMBOOK_CLOSE_TIME") {
            Some(value) => parse_clock_time(&value).wrap_err("Invalid ROOMBOOK_CLOSE_TIME value")?,
            None => defaults.window.close(),
        };
        let granularity = match lookup("ROOMBOOK_SLOT_MINUTES") {
            Some(value) => value.parse().wrap_err("Invalid ROOMBOOK_SLOT_MINUTES value")?,
            None => DEFAULT_GRANULARITY_MINUTES,
        };

        let window = OperatingWindow::new(open, close, granularity)
            .wrap_err("Invalid operating window")?;

        Ok(Self {
            api_url,
            log_level,
            request_timeout,
            notification_seconds,
            window,
        })
    }
}
