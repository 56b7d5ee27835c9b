// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            session_ttl_secs: 60 * 60 * 24 * 7, // 7 days
        }
    }
}

impl Settings {
    /// Load settings from the default config file location plus environment
    pub fn load() -> Result<Self> {
        Self::load_from("config/default")
    }

    /// Load settings from an explicit config file (extension optional),
    /// falling back to defaults for anything unset. `GATEHOUSE_*`
    /// environment variables override file values.
    pub fn load_from(path: &str) -> Result<Self> {
        let defaults = Settings::default();
        let settings = Config::builder()
            .set_default("bind_addr", defaults.bind_addr.to_string())?
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
            .set_default("log_level", defaults.log_level)?
            .set_default("session_ttl_secs", defaults.session_ttl_secs.to_string())?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("GATEHOUSE"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
