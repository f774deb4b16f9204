use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Redelivery ceilings and delay (`[redelivery]` section in config.toml).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeliveryConfig {
    /// Maximum redeliveries while failures are connectivity-caused.
    pub connect_error_max_retries: u32,
    /// Maximum redeliveries for any other failure.
    pub other_error_max_retries: u32,
    /// Delay between attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for RedeliveryConfig {
    fn default() -> Self {
        Self {
            connect_error_max_retries: 10,
            other_error_max_retries: 2,
            retry_delay_ms: 30_000,
        }
    }
}

impl RedeliveryConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Global configuration loaded from `~/.config/redeliver/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeliverConfig {
    /// Context name reported in diagnostics for exchanges created by this process.
    #[serde(default = "default_context_name")]
    pub context_name: String,
    #[serde(default)]
    pub redelivery: RedeliveryConfig,
}

fn default_context_name() -> String {
    "redeliver".to_string()
}

impl Default for RedeliverConfig {
    fn default() -> Self {
        Self {
            context_name: default_context_name(),
            redelivery: RedeliveryConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("redeliver")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RedeliverConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RedeliverConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<RedeliverConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: RedeliverConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}
