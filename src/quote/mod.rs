//! Quote engine: protocol dispatch, directionality, and timeouts.
//!
//! The engine turns a (pool, amount, direction) request into the right
//! provider call: constant-product pools go through the router path with
//! snapshot reserves oriented for the direction, concentrated-liquidity
//! pools through the quoter at the pool's fee tier. Every provider call is
//! bounded by a deadline so one hung RPC never wedges a pipeline stage.

pub mod math;
pub mod provider;

use crate::error::QuoteError;
use crate::types::{Leg, Pool, PoolCandidate, PoolReserves, SwapDirection, V3Diagnostics};
use alloy::primitives::U256;
use provider::{QuoteProvider, V2Quote, V3Quote};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub use provider::{ConcentratedQuote, LocalReserveProvider, OnChainQuoteProvider};

/// Default per-quote deadline.
pub const DEFAULT_QUOTE_TIMEOUT: Duration = Duration::from_secs(5);

/// One quoted swap: output amount plus V3 diagnostics when present.
#[derive(Debug, Clone)]
pub struct LegQuote {
    pub amount_out: U256,
    pub diagnostics: Option<V3Diagnostics>,
}

pub struct QuoteEngine<Q> {
    provider: Arc<Q>,
    timeout: Duration,
}

impl<Q: QuoteProvider> QuoteEngine<Q> {
    pub fn new(provider: Arc<Q>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_QUOTE_TIMEOUT,
        }
    }

    pub fn with_timeout(provider: Arc<Q>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Quote `amount_in` through one pool. `reverse == false` swaps token0
    /// into token1; `reverse == true` the opposite.
    pub async fn quote(
        &self,
        pool: &Pool,
        routing: &crate::types::VenueRouting,
        amount_in: U256,
        reverse: bool,
    ) -> Result<LegQuote, QuoteError> {
        let direction = SwapDirection::from_reverse(reverse);
        let (token_in, token_out) = match direction {
            SwapDirection::ZeroForOne => (&pool.token0, &pool.token1),
            SwapDirection::OneForZero => (&pool.token1, &pool.token0),
        };

        match &pool.state {
            PoolReserves::V2 { reserve0, reserve1 } => {
                if reserve0.is_zero() || reserve1.is_zero() {
                    return Err(QuoteError::ZeroLiquidity);
                }
                let (reserve_in, reserve_out) = match direction {
                    SwapDirection::ZeroForOne => (*reserve0, *reserve1),
                    SwapDirection::OneForZero => (*reserve1, *reserve0),
                };
                let quote = V2Quote {
                    token_in: token_in.address,
                    token_out: token_out.address,
                    reserve_in,
                    reserve_out,
                    amount_in,
                };
                let amount_out = self
                    .bounded(self.provider.constant_product_out(routing, &quote))
                    .await??;
                Ok(LegQuote {
                    amount_out,
                    diagnostics: None,
                })
            }
            PoolReserves::V3 {
                liquidity,
                sqrt_price_x96,
                fee_tier,
            } => {
                if *liquidity == 0 || sqrt_price_x96.is_zero() {
                    return Err(QuoteError::ZeroLiquidity);
                }
                let quote = V3Quote {
                    token_in: token_in.address,
                    token_out: token_out.address,
                    fee_tier: *fee_tier,
                    amount_in,
                };
                let result = self
                    .bounded(self.provider.concentrated_out(routing, &quote))
                    .await??;
                Ok(LegQuote {
                    amount_out: result.amount_out,
                    diagnostics: Some(result.diagnostics),
                })
            }
        }
    }

    /// Forward-quote the notional on every candidate, in order. Failures are
    /// logged and skipped; surviving legs keep candidate order so selection
    /// ties resolve deterministically.
    pub async fn quote_candidates(
        &self,
        candidates: &[PoolCandidate],
        amount_in: U256,
    ) -> Vec<Leg> {
        let mut legs = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match self
                .quote(&candidate.pool, &candidate.routing, amount_in, false)
                .await
            {
                Ok(quote) => legs.push(Leg {
                    routing: candidate.routing.clone(),
                    pool: candidate.pool.clone(),
                    direction: SwapDirection::ZeroForOne,
                    amount_in,
                    amount_out: quote.amount_out,
                    diagnostics: quote.diagnostics,
                }),
                Err(e) => {
                    warn!(
                        "Quote failed on {} pool {} ({}): {}",
                        candidate.routing.venue, candidate.pool.id, candidate.pool.kind, e
                    );
                }
            }
        }
        legs
    }

    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, QuoteError>>,
    ) -> Result<Result<T, QuoteError>, QuoteError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| QuoteError::Timeout(self.timeout))
    }
}
