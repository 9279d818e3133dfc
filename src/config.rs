//! Environment-based configuration.
//!
//! Settings come from the process environment, optionally seeded from a
//! per-chain dotenv file (`.env.polygon`, `.env.base`). Only `RPC_URL` is
//! required; everything else has a sensible default.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// WebSocket RPC endpoint.
    pub rpc_url: String,
    pub chain_id: u64,
    /// Directory of per-venue pool snapshot JSON files.
    pub snapshot_dir: PathBuf,
    /// Per-quote deadline in milliseconds.
    pub quote_timeout_ms: u64,
}

/// Load configuration from the current environment.
pub fn load_config() -> Result<BotConfig> {
    let rpc_url = env::var("RPC_URL").context("RPC_URL must be set (WebSocket endpoint)")?;
    let chain_id = env_or("CHAIN_ID", "137")?
        .parse::<u64>()
        .context("CHAIN_ID must be an integer")?;
    let snapshot_dir = PathBuf::from(env_or("SNAPSHOT_DIR", "./snapshots")?);
    let quote_timeout_ms = env_or("QUOTE_TIMEOUT_MS", "5000")?
        .parse::<u64>()
        .context("QUOTE_TIMEOUT_MS must be an integer")?;

    Ok(BotConfig {
        rpc_url,
        chain_id,
        snapshot_dir,
        quote_timeout_ms,
    })
}

/// Seed the environment from a chain-specific dotenv file, then load. The
/// file is optional; real environment variables win over file entries.
pub fn load_config_for_chain(chain: &str) -> Result<BotConfig> {
    let env_file = format!(".env.{chain}");
    if dotenv::from_filename(&env_file).is_ok() {
        info!("Loaded environment from {env_file}");
    }
    load_config()
}

fn env_or(key: &str, default: &str) -> Result<String> {
    match env::var(key) {
        Ok(v) => Ok(v),
        Err(env::VarError::NotPresent) => Ok(default.to_string()),
        Err(e) => Err(e).with_context(|| format!("{key} is not valid unicode")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_default() {
        assert_eq!(env_or("FLASHARB_DOES_NOT_EXIST", "42").unwrap(), "42");
    }
}
