// src/config.rs
use anyhow::Context;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Optional JSON file replacing the built-in reference palette.
    pub palette_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_upload_bytes = match lookup("FRESHSCAN_MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("FRESHSCAN_MAX_UPLOAD_BYTES is not a number: {raw}"))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            bind_addr: lookup("FRESHSCAN_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            upload_dir: lookup("FRESHSCAN_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            max_upload_bytes,
            palette_path: lookup("FRESHSCAN_PALETTE")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            palette_path: None,
        }
    }
}
