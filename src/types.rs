//! Core data structures for the arbitrage pipeline.
//!
//! Pool/Token/VenueRouting are read-only snapshots produced by the external
//! ingestion collaborator; the pipeline never mutates them. Leg and
//! Opportunity are created per triggering swap event and discarded after the
//! pipeline step completes.
//!
//! All monetary amounts are token smallest-unit integers (`U256`). Floating
//! point appears only in diagnostics (e.g., USD hints in logs).

use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ERC-20 token as described by a venue snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.address)
    }
}

/// AMM protocol families we can quote against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolKind {
    /// Uniswap-V2-style constant product pool (x * y = k, 0.30% fee).
    #[serde(rename = "v2")]
    ConstantProduct,
    /// Uniswap-V3-style concentrated liquidity pool (tick-based, fee tiers).
    #[serde(rename = "v3")]
    ConcentratedLiquidity,
}

impl ProtocolKind {
    pub fn is_v3(&self) -> bool {
        matches!(self, ProtocolKind::ConcentratedLiquidity)
    }
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProtocolKind::ConstantProduct => write!(f, "v2"),
            ProtocolKind::ConcentratedLiquidity => write!(f, "v3"),
        }
    }
}

/// Protocol-specific pool state carried in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolReserves {
    V2 {
        reserve0: U256,
        reserve1: U256,
    },
    V3 {
        liquidity: u128,
        sqrt_price_x96: U256,
        fee_tier: u32,
    },
}

/// A single liquidity pool on one venue.
///
/// `token0`/`token1` ordering is venue-specific and may be swapped relative
/// to other venues for the "same" pair; pair matching tests both orderings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: Address,
    pub kind: ProtocolKind,
    pub token0: Token,
    pub token1: Token,
    pub state: PoolReserves,
}

impl Pool {
    /// Unordered token-address pair for equivalence matching.
    pub fn token_pair(&self) -> (Address, Address) {
        (self.token0.address, self.token1.address)
    }

    /// True if this pool trades the same unordered pair, in either order.
    pub fn matches_pair(&self, a: Address, b: Address) -> bool {
        let (t0, t1) = self.token_pair();
        (t0 == a && t1 == b) || (t0 == b && t1 == a)
    }

    /// V3 fee tier, if this is a concentrated-liquidity pool.
    pub fn fee_tier(&self) -> Option<u32> {
        match self.state {
            PoolReserves::V3 { fee_tier, .. } => Some(fee_tier),
            PoolReserves::V2 { .. } => None,
        }
    }
}

/// Per-venue routing addresses. `quoter` is present only for
/// concentrated-liquidity venues (V2 forks quote through their router).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueRouting {
    pub venue: String,
    pub router: Address,
    #[serde(default)]
    pub quoter: Option<Address>,
}

/// Swap direction relative to the pool's own token ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    /// token0 in, token1 out (the "forward" quote).
    ZeroForOne,
    /// token1 in, token0 out (the "reverse" quote).
    OneForZero,
}

impl SwapDirection {
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse {
            SwapDirection::OneForZero
        } else {
            SwapDirection::ZeroForOne
        }
    }

    pub fn is_reverse(&self) -> bool {
        matches!(self, SwapDirection::OneForZero)
    }
}

/// Post-trade diagnostics returned by concentrated-liquidity quoters.
///
/// Carried for logging and auditing only, never consulted by the
/// profitability math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V3Diagnostics {
    pub sqrt_price_after: U256,
    pub ticks_crossed: u32,
    pub gas_estimate: U256,
}

/// An equivalent-pool candidate produced by the pair index: the pool plus
/// the routing addresses of the venue it lives on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCandidate {
    pub routing: VenueRouting,
    pub pool: Pool,
}

/// One directional swap within a round-trip arbitrage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    pub routing: VenueRouting,
    pub pool: Pool,
    pub direction: SwapDirection,
    pub amount_in: U256,
    pub amount_out: U256,
    /// Present only for concentrated-liquidity quotes.
    pub diagnostics: Option<V3Diagnostics>,
}

impl Leg {
    pub fn venue(&self) -> &str {
        &self.routing.venue
    }

    /// Input/output tokens implied by the leg's direction.
    pub fn token_in(&self) -> &Token {
        match self.direction {
            SwapDirection::ZeroForOne => &self.pool.token0,
            SwapDirection::OneForZero => &self.pool.token1,
        }
    }

    pub fn token_out(&self) -> &Token {
        match self.direction {
            SwapDirection::ZeroForOne => &self.pool.token1,
            SwapDirection::OneForZero => &self.pool.token0,
        }
    }
}

/// A profitable round trip: exit leg first (it is the final leg of the
/// round trip being reported), then the entry leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub exit_leg: Leg,
    pub entry_leg: Leg,
    /// Borrowed amount in the loaned token's smallest integer unit.
    pub notional: U256,
    pub borrowed_token: Token,
    /// `notional * (1 + loan fee + profit buffer)`, integer floor.
    pub breakeven_target: U256,
    pub profitable: bool,
    pub detected_at: DateTime<Utc>,
}

/// A swap fired on a tracked pool. Emitted by the on-chain event source and
/// consumed by the compute stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    pub pool: Address,
    pub block_number: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn token(addr: Address, symbol: &str) -> Token {
        Token {
            address: addr,
            symbol: symbol.to_string(),
            decimals: 18,
        }
    }

    #[test]
    fn test_matches_pair_both_orderings() {
        let a = address!("0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619");
        let b = address!("0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174");

        let pool = Pool {
            id: Address::ZERO,
            kind: ProtocolKind::ConstantProduct,
            token0: token(a, "WETH"),
            token1: token(b, "USDC"),
            state: PoolReserves::V2 {
                reserve0: U256::from(1u64),
                reserve1: U256::from(1u64),
            },
        };

        assert!(pool.matches_pair(a, b));
        assert!(pool.matches_pair(b, a));
        assert!(!pool.matches_pair(a, Address::ZERO));
    }

    #[test]
    fn test_protocol_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&ProtocolKind::ConstantProduct).unwrap(),
            "\"v2\""
        );
        assert_eq!(
            serde_json::to_string(&ProtocolKind::ConcentratedLiquidity).unwrap(),
            "\"v3\""
        );
        let kind: ProtocolKind = serde_json::from_str("\"v3\"").unwrap();
        assert!(kind.is_v3());
    }

    #[test]
    fn test_leg_direction_tokens() {
        let a = address!("0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619");
        let b = address!("0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174");
        let pool = Pool {
            id: Address::ZERO,
            kind: ProtocolKind::ConstantProduct,
            token0: token(a, "WETH"),
            token1: token(b, "USDC"),
            state: PoolReserves::V2 {
                reserve0: U256::from(1u64),
                reserve1: U256::from(1u64),
            },
        };
        let leg = Leg {
            routing: VenueRouting {
                venue: "uniswap".to_string(),
                router: Address::ZERO,
                quoter: None,
            },
            pool,
            direction: SwapDirection::OneForZero,
            amount_in: U256::from(10u64),
            amount_out: U256::from(9u64),
            diagnostics: None,
        };
        assert_eq!(leg.token_in().symbol, "USDC");
        assert_eq!(leg.token_out().symbol, "WETH");
    }
}
