//! Venue snapshot files.
//!
//! The ingestion collaborator writes one JSON file per venue:
//! `{ "venue": ..., "router": ..., "quoter": ..., "pools": [...] }` with
//! camelCase pool fields and string-encoded big integers. This module loads
//! those files and converts the wire records into validated domain types.

use crate::types::{Pool, PoolReserves, ProtocolKind, Token, VenueRouting};
use alloy::primitives::{Address, U256};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// One venue snapshot file as it appears on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueSnapshot {
    pub venue: String,
    pub router: String,
    #[serde(default)]
    pub quoter: Option<String>,
    pub pools: Vec<PoolRecord>,
}

/// Wire shape of a single pool. Reserves and liquidity are strings because
/// they exceed JSON's safe integer range.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecord {
    pub id: String,
    pub protocol_kind: ProtocolKind,
    pub token0: TokenRecord,
    pub token1: TokenRecord,
    #[serde(default)]
    pub reserve0: Option<String>,
    #[serde(default)]
    pub reserve1: Option<String>,
    #[serde(default)]
    pub fee_tier: Option<u32>,
    #[serde(default)]
    pub liquidity: Option<String>,
    #[serde(default)]
    pub sqrt_price_x96: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
}

impl VenueSnapshot {
    /// Routing addresses for this venue, validated.
    pub fn routing(&self) -> Result<VenueRouting> {
        let router = Address::from_str(&self.router)
            .with_context(|| format!("venue {}: bad router address {}", self.venue, self.router))?;
        let quoter = match &self.quoter {
            Some(q) => Some(Address::from_str(q).with_context(|| {
                format!("venue {}: bad quoter address {}", self.venue, q)
            })?),
            None => None,
        };
        Ok(VenueRouting {
            venue: self.venue.clone(),
            router,
            quoter,
        })
    }
}

impl TokenRecord {
    fn into_token(self) -> Result<Token> {
        let address = Address::from_str(&self.address)
            .with_context(|| format!("token {}: bad address {}", self.symbol, self.address))?;
        Ok(Token {
            address,
            symbol: self.symbol,
            decimals: self.decimals,
        })
    }
}

impl PoolRecord {
    /// Convert the wire record into a validated `Pool`.
    pub fn into_pool(self) -> Result<Pool> {
        let id = Address::from_str(&self.id)
            .with_context(|| format!("pool: bad address {}", self.id))?;
        let token0 = self.token0.into_token()?;
        let token1 = self.token1.into_token()?;

        let state = match self.protocol_kind {
            ProtocolKind::ConstantProduct => {
                let reserve0 = parse_u256(self.reserve0.as_deref(), "reserve0", id)?;
                let reserve1 = parse_u256(self.reserve1.as_deref(), "reserve1", id)?;
                PoolReserves::V2 { reserve0, reserve1 }
            }
            ProtocolKind::ConcentratedLiquidity => {
                let fee_tier = self
                    .fee_tier
                    .with_context(|| format!("pool {id}: missing feeTier"))?;
                let liquidity = self
                    .liquidity
                    .as_deref()
                    .with_context(|| format!("pool {id}: missing liquidity"))?
                    .parse::<u128>()
                    .with_context(|| format!("pool {id}: bad liquidity"))?;
                let sqrt_price_x96 =
                    parse_u256(self.sqrt_price_x96.as_deref(), "sqrtPriceX96", id)?;
                PoolReserves::V3 {
                    liquidity,
                    sqrt_price_x96,
                    fee_tier,
                }
            }
        };

        Ok(Pool {
            id,
            kind: self.protocol_kind,
            token0,
            token1,
            state,
        })
    }
}

fn parse_u256(value: Option<&str>, field: &str, pool: Address) -> Result<U256> {
    let raw = value.with_context(|| format!("pool {pool}: missing {field}"))?;
    U256::from_str(raw).with_context(|| format!("pool {pool}: bad {field} {raw:?}"))
}

/// Load a single venue snapshot file.
pub fn load(path: &Path) -> Result<VenueSnapshot> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
    let snapshot: VenueSnapshot = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))?;
    debug!(
        "Loaded venue snapshot '{}' with {} pools",
        snapshot.venue,
        snapshot.pools.len()
    );
    Ok(snapshot)
}

/// Load every `*.json` snapshot in a directory. Non-JSON files are skipped;
/// an unreadable file fails the whole load (snapshots are startup-critical).
pub fn load_dir(dir: &Path) -> Result<Vec<VenueSnapshot>> {
    let mut snapshots = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read snapshot directory: {}", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        snapshots.push(load(&path)?);
    }

    if snapshots.is_empty() {
        warn!("No venue snapshots found in {}", dir.display());
    }
    Ok(snapshots)
}
