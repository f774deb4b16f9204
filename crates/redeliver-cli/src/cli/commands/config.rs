//! `redeliver config` – print the effective configuration.

use anyhow::Result;
use redeliver_core::config::RedeliverConfig;

pub fn run_config(cfg: &RedeliverConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
