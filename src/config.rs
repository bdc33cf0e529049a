//! Runtime configuration from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

/// Web server settings. Override with env: HOST, PORT, DATA_FILE, RELOAD_INTERVAL_SECS.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// JSON file backing the store.
    pub data_file: PathBuf,
    /// How often the store is polled for changes made by other writers.
    pub reload_interval: Duration,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_file() -> PathBuf {
    PathBuf::from("pickleball-journal.json")
}

fn default_reload_interval_secs() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_file: default_data_file(),
            reload_interval: Duration::from_secs(default_reload_interval_secs()),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (env in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(default_host);
        let port = parse_or(&lookup, "PORT", default_port);
        let data_file = lookup("DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_file);
        let reload_secs = parse_or(&lookup, "RELOAD_INTERVAL_SECS", default_reload_interval_secs);
        Self {
            host,
            port,
            data_file,
            reload_interval: Duration::from_secs(reload_secs.max(1)),
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: fn() -> T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default()
        }),
        None => default(),
    }
}
