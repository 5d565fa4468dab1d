use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".billing-desk";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "billing.sqlite";
/// Used when no home directory can be resolved (containers, service users).
const FALLBACK_DB_PATH: &str = "data/billing.sqlite";

/// Runtime settings.
///
/// | Variable          | Default                          |
/// |-------------------|----------------------------------|
/// | `BILLING_DB_PATH` | `~/.billing-desk/billing.sqlite` |
/// | `HTTP_HOST`       | `0.0.0.0`                        |
/// | `HTTP_PORT`       | `10000`                          |
/// | `LOG_LEVEL`       | `info`                           |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub http_host: String,
    pub http_port: u16,
    pub log_level: String,
}

impl Config {
    /// Load settings from the environment. A `.env` file in the working
    /// directory is read first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let http_port = match std::env::var("HTTP_PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("HTTP_PORT is not a valid port: {port}"))?,
            Err(_) => 10000,
        };

        Ok(Self {
            database_path: std::env::var("BILLING_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_db_path()),
            http_host: std::env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            http_port,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.http_host, self.http_port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.http_host, self.http_port))
    }
}

/// Resolve the SQLite path inside the user's home directory.
fn default_db_path() -> PathBuf {
    match BaseDirs::new() {
        Some(base_dirs) => base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME),
        None => PathBuf::from(FALLBACK_DB_PATH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_ends_with_db_file() {
        assert!(default_db_path().ends_with(DB_FILE_NAME));
    }

    #[test]
    fn bind_addr_combines_host_and_port() {
        let config = Config {
            database_path: PathBuf::from("billing.sqlite"),
            http_host: "127.0.0.1".into(),
            http_port: 8080,
            log_level: "info".into(),
        };
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8080");

        let bad = Config {
            http_host: "not a host".into(),
            ..config
        };
        assert!(bad.bind_addr().is_err());
    }
}
