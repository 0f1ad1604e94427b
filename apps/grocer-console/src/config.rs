//! Console configuration module.
//!
//! | Variable                  | Default                  |
//! |---------------------------|--------------------------|
//! | `GROCER_SERVER_URL`       | `http://127.0.0.1:5000`  |
//! | `GROCER_POLL_INTERVAL_MS` | `1000`                   |
//! | `GROCER_HTTP_TIMEOUT_MS`  | `2000`                   |
//! | `GROCER_RECEIPT_DIR`      | `./receipts`             |
//! | `GROCER_LOW_STOCK`        | `5`                      |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use grocer_core::LOW_STOCK_THRESHOLD;

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Base URL of the HTTP service
    pub server_url: String,

    /// How often the poller asks for the latest product
    pub poll_interval: Duration,

    /// Per-request timeout
    pub http_timeout: Duration,

    /// Where receipt PNGs are written
    pub receipt_dir: PathBuf,

    /// Inventory rows below this stock are flagged
    pub low_stock_threshold: i64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            server_url: "http://127.0.0.1:5000".to_string(),
            poll_interval: Duration::from_millis(1000),
            http_timeout: Duration::from_millis(2000),
            receipt_dir: PathBuf::from("./receipts"),
            low_stock_threshold: LOW_STOCK_THRESHOLD,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ConsoleConfig::default();

        let server_url = match lookup("GROCER_SERVER_URL") {
            Some(url) => {
                let url = url.trim().trim_end_matches('/').to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidValue("GROCER_SERVER_URL".to_string()));
                }
                url
            }
            None => defaults.server_url,
        };

        let poll_ms: u64 = parse_or(&lookup, "GROCER_POLL_INTERVAL_MS", 1000)?;
        let timeout_ms: u64 = parse_or(&lookup, "GROCER_HTTP_TIMEOUT_MS", 2000)?;
        if poll_ms == 0 {
            return Err(ConfigError::InvalidValue("GROCER_POLL_INTERVAL_MS".to_string()));
        }
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("GROCER_HTTP_TIMEOUT_MS".to_string()));
        }

        let receipt_dir = match lookup("GROCER_RECEIPT_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
            _ => defaults.receipt_dir,
        };

        let low_stock_threshold =
            parse_or(&lookup, "GROCER_LOW_STOCK", defaults.low_stock_threshold)?;
        if low_stock_threshold < 0 {
            return Err(ConfigError::InvalidValue("GROCER_LOW_STOCK".to_string()));
        }

        Ok(ConsoleConfig {
            server_url,
            poll_interval: Duration::from_millis(poll_ms),
            http_timeout: Duration::from_millis(timeout_ms),
            receipt_dir,
            low_stock_threshold,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
