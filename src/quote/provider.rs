//! Quote providers.
//!
//! `QuoteProvider` is the collaborator boundary for price discovery. The
//! production implementation quotes on-chain through the venue's router
//! (V2 forks) or QuoterV2 (V3 forks); the local implementation evaluates
//! constant-product pools from snapshot reserves and backs the test suite.

use crate::contracts::{IQuoterV2, IUniswapV2Router02};
use crate::error::QuoteError;
use crate::quote::math;
use crate::types::{V3Diagnostics, VenueRouting};
use alloy::primitives::aliases::U24;
use alloy::primitives::{Address, U160, U256};
use alloy::providers::Provider;
use async_trait::async_trait;

/// A constant-product quote request. `reserve_in`/`reserve_out` are already
/// oriented for the requested direction; on-chain providers ignore them and
/// quote by token path, the local provider evaluates them directly.
#[derive(Debug, Clone)]
pub struct V2Quote {
    pub token_in: Address,
    pub token_out: Address,
    pub reserve_in: U256,
    pub reserve_out: U256,
    pub amount_in: U256,
}

/// A concentrated-liquidity single-hop exact-input quote request.
#[derive(Debug, Clone)]
pub struct V3Quote {
    pub token_in: Address,
    pub token_out: Address,
    pub fee_tier: u32,
    pub amount_in: U256,
}

/// V3 quote result: output amount plus diagnostics. Diagnostics are carried
/// for logging only.
#[derive(Debug, Clone)]
pub struct ConcentratedQuote {
    pub amount_out: U256,
    pub diagnostics: V3Diagnostics,
}

/// Price discovery collaborator. One failing quote never aborts a batch.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn constant_product_out(
        &self,
        routing: &VenueRouting,
        quote: &V2Quote,
    ) -> Result<U256, QuoteError>;

    async fn concentrated_out(
        &self,
        routing: &VenueRouting,
        quote: &V3Quote,
    ) -> Result<ConcentratedQuote, QuoteError>;
}

/// Quotes against live contracts over an alloy provider.
pub struct OnChainQuoteProvider<P> {
    provider: P,
}

impl<P: Provider + Clone + 'static> OnChainQuoteProvider<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: Provider + Clone + 'static> QuoteProvider for OnChainQuoteProvider<P> {
    async fn constant_product_out(
        &self,
        routing: &VenueRouting,
        quote: &V2Quote,
    ) -> Result<U256, QuoteError> {
        let router = IUniswapV2Router02::new(routing.router, self.provider.clone());
        let amounts = router
            .getAmountsOut(quote.amount_in, vec![quote.token_in, quote.token_out])
            .call()
            .await
            .map_err(|e| QuoteError::Revert(e.to_string()))?;

        // getAmountsOut returns one amount per path hop; the last is ours.
        if amounts.len() < 2 {
            return Err(QuoteError::Malformed(format!(
                "getAmountsOut returned {} amounts for a 2-token path",
                amounts.len()
            )));
        }
        Ok(amounts[amounts.len() - 1])
    }

    async fn concentrated_out(
        &self,
        routing: &VenueRouting,
        quote: &V3Quote,
    ) -> Result<ConcentratedQuote, QuoteError> {
        let quoter_addr = routing.quoter.ok_or_else(|| {
            QuoteError::Malformed(format!("venue {} has no quoter address", routing.venue))
        })?;
        let quoter = IQuoterV2::new(quoter_addr, self.provider.clone());

        let params = IQuoterV2::QuoteExactInputSingleParams {
            tokenIn: quote.token_in,
            tokenOut: quote.token_out,
            amountIn: quote.amount_in,
            fee: U24::from(quote.fee_tier),
            sqrtPriceLimitX96: U160::ZERO,
        };

        let result = quoter
            .quoteExactInputSingle(params)
            .call()
            .await
            .map_err(|e| QuoteError::Revert(e.to_string()))?;

        Ok(ConcentratedQuote {
            amount_out: result.amountOut,
            diagnostics: V3Diagnostics {
                sqrt_price_after: U256::from(result.sqrtPriceX96After),
                ticks_crossed: result.initializedTicksCrossed,
                gas_estimate: result.gasEstimate,
            },
        })
    }
}

/// Evaluates constant-product quotes from snapshot reserves, no RPC. Used by
/// the test suite; has no V3 evaluator.
pub struct LocalReserveProvider;

#[async_trait]
impl QuoteProvider for LocalReserveProvider {
    async fn constant_product_out(
        &self,
        _routing: &VenueRouting,
        quote: &V2Quote,
    ) -> Result<U256, QuoteError> {
        math::constant_product_out(quote.amount_in, quote.reserve_in, quote.reserve_out)
    }

    async fn concentrated_out(
        &self,
        routing: &VenueRouting,
        _quote: &V3Quote,
    ) -> Result<ConcentratedQuote, QuoteError> {
        Err(QuoteError::Revert(format!(
            "no local concentrated-liquidity evaluator (venue {})",
            routing.venue
        )))
    }
}
