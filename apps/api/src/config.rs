use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// `<STORAGE_DIR>/resumeBuilderData.json`
    File,
    /// Nothing survives a restart.
    Memory,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => bail!("STORAGE_BACKEND must be 'file' or 'memory', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub storage_backend: StorageBackend,
    pub storage_dir: PathBuf,
    pub autosave_debounce: Duration,
    pub export_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
            storage_backend: var("STORAGE_BACKEND", "file").parse()?,
            storage_dir: PathBuf::from(var("STORAGE_DIR", "./data")),
            autosave_debounce: Duration::from_millis(
                var("AUTOSAVE_DEBOUNCE_MS", "1000")
                    .parse::<u64>()
                    .context("AUTOSAVE_DEBOUNCE_MS must be a whole number of milliseconds")?,
            ),
            export_timeout: Duration::from_secs(
                var("EXPORT_TIMEOUT_SECS", "30")
                    .parse::<u64>()
                    .context("EXPORT_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }
}
