//! Flash-loan trade sizing.
//!
//! Fixed-notional sizing against a static allow-list of flash-loanable
//! tokens. Quantities are human-unit strings scaled by the token's decimals
//! at selection time; each entry is roughly $1000 of exposure. USD values
//! are diagnostics only and never enter any amount arithmetic.

use crate::error::SizingError;
use crate::types::{PoolCandidate, Token};
use alloy::primitives::utils::parse_units;
use alloy::primitives::{address, Address, U256};
use anyhow::Result;
use once_cell::sync::Lazy;
use tracing::debug;

/// One allow-listed borrowable asset.
#[derive(Debug, Clone)]
pub struct BorrowableAsset {
    pub address: Address,
    /// Human-unit borrow quantity, e.g. "1000" USDC or "0.30" WETH.
    pub quantity: &'static str,
    /// Rough USD value of the quantity, for log lines only.
    pub usd_hint: f64,
}

/// Default Polygon allow-list: the majors available for flash loans, each
/// sized near $1000.
static POLYGON_BORROWABLE: Lazy<Vec<BorrowableAsset>> = Lazy::new(|| {
    vec![
        BorrowableAsset {
            address: address!("0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174"), // USDC
            quantity: "1000",
            usd_hint: 1000.0,
        },
        BorrowableAsset {
            address: address!("0xc2132D05D31c914a87C6611C10748AEb04B58e8F"), // USDT
            quantity: "1000",
            usd_hint: 1000.0,
        },
        BorrowableAsset {
            address: address!("0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063"), // DAI
            quantity: "1000",
            usd_hint: 1000.0,
        },
        BorrowableAsset {
            address: address!("0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619"), // WETH
            quantity: "0.30",
            usd_hint: 1000.0,
        },
        BorrowableAsset {
            address: address!("0x1BFD67037B42Cf73acF2047067bd4F2C47D9BfD6"), // WBTC
            quantity: "0.01",
            usd_hint: 1000.0,
        },
        BorrowableAsset {
            address: address!("0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"), // WMATIC
            quantity: "2000",
            usd_hint: 1000.0,
        },
    ]
});

/// Default Base allow-list.
static BASE_BORROWABLE: Lazy<Vec<BorrowableAsset>> = Lazy::new(|| {
    vec![
        BorrowableAsset {
            address: address!("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"), // USDC
            quantity: "1000",
            usd_hint: 1000.0,
        },
        BorrowableAsset {
            address: address!("0x50c5725949A6F0c72E6C4a641F24049A917DB0Cb"), // DAI
            quantity: "1000",
            usd_hint: 1000.0,
        },
        BorrowableAsset {
            address: address!("0x4200000000000000000000000000000000000006"), // WETH
            quantity: "0.30",
            usd_hint: 1000.0,
        },
    ]
});

/// The sized borrow for one pipeline step.
#[derive(Debug, Clone)]
pub struct NotionalPlan {
    pub token: Token,
    /// Borrow amount in the token's smallest integer unit.
    pub amount: U256,
    /// Human-unit quantity the amount was scaled from.
    pub quantity: String,
    pub usd_hint: f64,
}

/// Picks the loaned token and notional for a candidate set.
pub struct TradeSizer {
    allow_list: Vec<BorrowableAsset>,
}

impl TradeSizer {
    pub fn new(allow_list: Vec<BorrowableAsset>) -> Self {
        Self { allow_list }
    }

    /// Sizer over the default Polygon allow-list.
    pub fn polygon() -> Self {
        Self::new(POLYGON_BORROWABLE.clone())
    }

    /// Sizer over the default Base allow-list.
    pub fn base() -> Self {
        Self::new(BASE_BORROWABLE.clone())
    }

    /// Sizer for a chain's default allow-list. Chains without a table are an
    /// error at startup rather than a bot that rejects every opportunity.
    pub fn for_chain(chain: &str) -> Result<Self> {
        match chain {
            "polygon" => Ok(Self::polygon()),
            "base" => Ok(Self::base()),
            other => anyhow::bail!("no borrowable-asset table for chain: {other}"),
        }
    }

    /// Choose the borrow token and notional: inspect the first candidate's
    /// token0 then token1; the first allow-listed token wins. The candidates
    /// all trade the same unordered pair, so the first is representative.
    pub fn choose_notional(
        &self,
        candidates: &[PoolCandidate],
    ) -> Result<NotionalPlan, SizingError> {
        let pool = &candidates
            .first()
            .ok_or_else(|| SizingError::NotBorrowable("?".to_string(), "?".to_string()))?
            .pool;

        for token in [&pool.token0, &pool.token1] {
            if let Some(asset) = self.allow_list.iter().find(|a| a.address == token.address) {
                let amount = parse_units(asset.quantity, token.decimals)
                    .map_err(|e| SizingError::InvalidQuantity {
                        symbol: token.symbol.clone(),
                        quantity: asset.quantity.to_string(),
                        reason: e.to_string(),
                    })?
                    .get_absolute();
                debug!(
                    "Sized borrow: {} {} (~${:.0})",
                    asset.quantity, token.symbol, asset.usd_hint
                );
                return Ok(NotionalPlan {
                    token: token.clone(),
                    amount,
                    quantity: asset.quantity.to_string(),
                    usd_hint: asset.usd_hint,
                });
            }
        }

        Err(SizingError::NotBorrowable(
            pool.token0.symbol.clone(),
            pool.token1.symbol.clone(),
        ))
    }
}
