//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                    | Default                          |
//! |-----------------------------|----------------------------------|
//! | `GROCER_BIND_ADDR`          | `0.0.0.0`                        |
//! | `GROCER_HTTP_PORT`          | `5000`                           |
//! | `GROCER_DB_PATH`            | platform data dir + `grocer.db`  |
//! | `GROCER_DB_MAX_CONNECTIONS` | `5`                              |
//! | `GROCER_QR_MODULE_PX`       | `10`                             |

use directories::ProjectDirs;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// HTTP service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Interface to listen on
    pub bind_addr: IpAddr,

    /// HTTP port
    pub http_port: u16,

    /// SQLite database file
    pub db_path: PathBuf,

    /// Upper bound on pooled SQLite connections
    pub db_max_connections: u32,

    /// Pixel size of one QR module in the receipt image
    pub qr_module_px: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            http_port: 5000,
            db_path: PathBuf::from("grocer.db"),
            db_max_connections: 5,
            qr_module_px: 10,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let db_path = match lookup("GROCER_DB_PATH") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_db_path().unwrap_or(defaults.db_path),
        };

        let config = ServerConfig {
            bind_addr: parse_or(&lookup, "GROCER_BIND_ADDR", defaults.bind_addr)?,
            http_port: parse_or(&lookup, "GROCER_HTTP_PORT", defaults.http_port)?,
            db_path,
            db_max_connections: parse_or(
                &lookup,
                "GROCER_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
            qr_module_px: parse_or(&lookup, "GROCER_QR_MODULE_PX", defaults.qr_module_px)?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "GROCER_DB_MAX_CONNECTIONS".to_string(),
            ));
        }
        if !(1..=64).contains(&config.qr_module_px) {
            return Err(ConfigError::InvalidValue("GROCER_QR_MODULE_PX".to_string()));
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
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

/// `<platform data dir>/grocer.db`
///
/// - **macOS**: `~/Library/Application Support/com.grocer.pos/grocer.db`
/// - **Linux**: `~/.local/share/grocer-pos/grocer.db`
fn default_db_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("com", "grocer", "pos")?;
    Some(dirs.data_dir().join("grocer.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
