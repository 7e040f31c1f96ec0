//! Runtime configuration loaded from environment variables (`.env` supported).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::domain::common::model::{
    AggregationOptions, DEFAULT_MAX_INTERVAL_HOURS, DEFAULT_MAX_POINTS, DEFAULT_PAGE_SIZE,
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_addr: String,
    /// Base URL of the fleet backend that serves interval lists.
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub fetch_retries: usize,
    pub fetch_timeout_secs: u64,
    pub max_points: usize,
    pub page_size: usize,
    pub max_interval_hours: i64,
    pub utc_offset_minutes: i32,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_addr: "0.0.0.0:5000".to_string(),
            api_base_url: "http://localhost:8000/api".to_string(),
            api_token: None,
            fetch_retries: 2,
            fetch_timeout_secs: 10,
            max_points: DEFAULT_MAX_POINTS,
            page_size: DEFAULT_PAGE_SIZE,
            max_interval_hours: DEFAULT_MAX_INTERVAL_HOURS,
            utc_offset_minutes: 0,
            data_dir: PathBuf::from("data"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    /// Reads `FLEETLENS_*` variables. Missing values use defaults; unparsable
    /// values are logged and also fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            server_addr: text("FLEETLENS_SERVER_ADDR").unwrap_or(d.server_addr),
            api_base_url: text("FLEETLENS_API_BASE_URL").unwrap_or(d.api_base_url),
            api_token: text("FLEETLENS_API_TOKEN"),
            fetch_retries: parse_or(text("FLEETLENS_FETCH_RETRIES"), "FLEETLENS_FETCH_RETRIES", d.fetch_retries),
            fetch_timeout_secs: parse_or(
                text("FLEETLENS_FETCH_TIMEOUT_SECS"),
                "FLEETLENS_FETCH_TIMEOUT_SECS",
                d.fetch_timeout_secs,
            ),
            max_points: parse_or(text("FLEETLENS_MAX_POINTS"), "FLEETLENS_MAX_POINTS", d.max_points).max(1),
            page_size: parse_or(text("FLEETLENS_PAGE_SIZE"), "FLEETLENS_PAGE_SIZE", d.page_size).max(1),
            max_interval_hours: parse_or(
                text("FLEETLENS_MAX_INTERVAL_HOURS"),
                "FLEETLENS_MAX_INTERVAL_HOURS",
                d.max_interval_hours,
            )
            .max(1),
            utc_offset_minutes: parse_or(
                text("FLEETLENS_UTC_OFFSET_MINUTES"),
                "FLEETLENS_UTC_OFFSET_MINUTES",
                d.utc_offset_minutes,
            )
            .clamp(-14 * 60, 14 * 60),
            data_dir: text("FLEETLENS_DATA_DIR").map(PathBuf::from).unwrap_or(d.data_dir),
            log_dir: text("FLEETLENS_LOG_DIR").map(PathBuf::from).unwrap_or(d.log_dir),
        }
    }

    /// Engine defaults derived from this configuration.
    pub fn aggregation_defaults(&self) -> AggregationOptions {
        AggregationOptions {
            max_points: self.max_points,
            page_size: self.page_size,
            utc_offset_minutes: self.utc_offset_minutes,
            max_interval_hours: self.max_interval_hours,
            ..Default::default()
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Debug>(value: Option<String>, key: &str, default: T) -> T {
    match value {
        None => default,
        Some(raw) => raw.parse::<T>().unwrap_or_else(|_| {
            warn!("Invalid value {:?} for {}, using default {:?}", raw, key, default);
            default
        }),
    }
}
