//! Opportunity evaluation.
//!
//! Given the forward-quoted legs for a candidate set, pick the entry (best
//! output) and exit (worst output) venues, re-quote the exit venue in
//! reverse with the entry's output, and compare against the flash-loan
//! breakeven target. All comparisons are strict and integer; ties keep the
//! first-seen leg so results are deterministic for a fixed candidate order.

use crate::error::NoTradeReason;
use crate::quote::provider::QuoteProvider;
use crate::quote::{math, QuoteEngine};
use crate::types::{Leg, Opportunity, SwapDirection, Token};
use alloy::primitives::U256;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of one evaluation pass.
#[derive(Debug)]
pub enum Evaluation {
    Profitable(Opportunity),
    NoTrade(NoTradeReason),
}

pub struct OpportunityEvaluator<Q> {
    engine: Arc<QuoteEngine<Q>>,
}

impl<Q: QuoteProvider> OpportunityEvaluator<Q> {
    pub fn new(engine: Arc<QuoteEngine<Q>>) -> Self {
        Self { engine }
    }

    /// Evaluate one round trip. `legs` are the surviving forward quotes in
    /// candidate order; `notional` is the borrow in `borrowed_token`'s
    /// smallest unit.
    pub async fn evaluate(
        &self,
        legs: &[Leg],
        notional: U256,
        borrowed_token: &Token,
    ) -> Evaluation {
        if legs.len() < 2 {
            return Evaluation::NoTrade(NoTradeReason::InsufficientCandidates);
        }

        // Strict comparisons keep the first-seen leg on ties.
        let mut entry = &legs[0];
        let mut exit = &legs[0];
        for leg in &legs[1..] {
            if leg.amount_out > entry.amount_out {
                entry = leg;
            }
            if leg.amount_out < exit.amount_out {
                exit = leg;
            }
        }

        debug!(
            "Entry {} out={}, exit {} out={}",
            entry.venue(),
            entry.amount_out,
            exit.venue(),
            exit.amount_out
        );

        // Close the loop: sell the entry's output back through the exit
        // venue in the reverse direction.
        let exit_quote = match self
            .engine
            .quote(&exit.pool, &exit.routing, entry.amount_out, true)
            .await
        {
            Ok(q) => q,
            Err(e) => {
                info!("Exit re-quote failed on {}: {}", exit.venue(), e);
                return Evaluation::NoTrade(NoTradeReason::QuoteFailure);
            }
        };

        let breakeven_target = match math::breakeven_target(notional) {
            Some(t) => t,
            None => return Evaluation::NoTrade(NoTradeReason::QuoteFailure),
        };
        let profitable = exit_quote.amount_out > breakeven_target;

        info!(
            "Round trip {} -> {}: borrow {} {}, return {}, target {} => {}",
            entry.venue(),
            exit.venue(),
            notional,
            borrowed_token.symbol,
            exit_quote.amount_out,
            breakeven_target,
            if profitable { "PROFITABLE" } else { "no trade" }
        );

        if !profitable {
            return Evaluation::NoTrade(NoTradeReason::NotProfitable);
        }

        let exit_leg = Leg {
            routing: exit.routing.clone(),
            pool: exit.pool.clone(),
            direction: SwapDirection::OneForZero,
            amount_in: entry.amount_out,
            amount_out: exit_quote.amount_out,
            diagnostics: exit_quote.diagnostics,
        };

        Evaluation::Profitable(Opportunity {
            exit_leg,
            entry_leg: entry.clone(),
            notional,
            borrowed_token: borrowed_token.clone(),
            breakeven_target,
            profitable,
            detected_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuoteError;
    use crate::quote::provider::{ConcentratedQuote, V2Quote, V3Quote};
    use crate::types::{Pool, PoolReserves, ProtocolKind, VenueRouting};
    use alloy::primitives::Address;
    use async_trait::async_trait;
    use std::collections::HashMap;

    // Scripted quotes keyed by venue name. Reverse quotes use the
    // "<venue>:reverse" key.
    struct ScriptedProvider {
        quotes: HashMap<String, u64>,
    }

    impl ScriptedProvider {
        fn key(routing: &VenueRouting, quote: &V2Quote) -> String {
            // Reverse quotes put token1 on the input side.
            if quote.token_in == Address::repeat_byte(0xbb) {
                format!("{}:reverse", routing.venue)
            } else {
                routing.venue.clone()
            }
        }
    }

    #[async_trait]
    impl QuoteProvider for ScriptedProvider {
        async fn constant_product_out(
            &self,
            routing: &VenueRouting,
            quote: &V2Quote,
        ) -> Result<U256, QuoteError> {
            self.quotes
                .get(&Self::key(routing, quote))
                .map(|v| U256::from(*v))
                .ok_or_else(|| QuoteError::Revert("unscripted".to_string()))
        }

        async fn concentrated_out(
            &self,
            _routing: &VenueRouting,
            _quote: &V3Quote,
        ) -> Result<ConcentratedQuote, QuoteError> {
            unreachable!()
        }
    }

    fn token(byte: u8, symbol: &str) -> Token {
        Token {
            address: Address::repeat_byte(byte),
            symbol: symbol.to_string(),
            // Smallest-unit amounts in these tests are the human numbers.
            decimals: 0,
        }
    }

    fn leg(venue: &str, amount_in: u64, amount_out: u64) -> Leg {
        Leg {
            routing: VenueRouting {
                venue: venue.to_string(),
                router: Address::ZERO,
                quoter: None,
            },
            pool: Pool {
                id: Address::repeat_byte(0x01),
                kind: ProtocolKind::ConstantProduct,
                token0: token(0xaa, "USDC"),
                token1: token(0xbb, "WETH"),
                state: PoolReserves::V2 {
                    reserve0: U256::from(1_000_000u64),
                    reserve1: U256::from(1_000_000u64),
                },
            },
            direction: SwapDirection::ZeroForOne,
            amount_in: U256::from(amount_in),
            amount_out: U256::from(amount_out),
            diagnostics: None,
        }
    }

    fn evaluator(quotes: &[(&str, u64)]) -> OpportunityEvaluator<ScriptedProvider> {
        let provider = ScriptedProvider {
            quotes: quotes
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        };
        OpportunityEvaluator::new(Arc::new(QuoteEngine::new(Arc::new(provider))))
    }

    #[tokio::test]
    async fn test_round_trip_scenario() {
        // Three venues quote the 1000 borrow at 1000, 1020, 990. Entry is
        // venue B (1020), exit is venue C (990). Selling 1020 back through C
        // returns 1018; target is floor(1000 * 1.0055) = 1005. Profitable.
        let eval = evaluator(&[("c:reverse", 1018)]);
        let legs = vec![leg("a", 1000, 1000), leg("b", 1000, 1020), leg("c", 1000, 990)];
        let borrowed = token(0xaa, "USDC");

        match eval.evaluate(&legs, U256::from(1000u64), &borrowed).await {
            Evaluation::Profitable(opp) => {
                assert_eq!(opp.exit_leg.venue(), "c");
                assert_eq!(opp.entry_leg.venue(), "b");
                assert_eq!(opp.exit_leg.amount_in, U256::from(1020u64));
                assert_eq!(opp.exit_leg.amount_out, U256::from(1018u64));
                assert_eq!(opp.exit_leg.direction, SwapDirection::OneForZero);
                assert_eq!(opp.breakeven_target, U256::from(1005u64));
                assert!(opp.profitable);
            }
            other => panic!("expected profitable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_equality_is_not_profitable() {
        // Return exactly at the target: strictly-greater check must reject.
        let eval = evaluator(&[("c:reverse", 1005)]);
        let legs = vec![leg("b", 1000, 1020), leg("c", 1000, 990)];
        let borrowed = token(0xaa, "USDC");

        match eval.evaluate(&legs, U256::from(1000u64), &borrowed).await {
            Evaluation::NoTrade(reason) => {
                assert_eq!(reason, NoTradeReason::NotProfitable);
            }
            other => panic!("expected no trade, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ties_keep_first_seen() {
        let eval = evaluator(&[("a:reverse", 900)]);
        // All legs equal: both entry and exit resolve to the first.
        let legs = vec![leg("a", 1000, 1000), leg("b", 1000, 1000), leg("c", 1000, 1000)];
        let borrowed = token(0xaa, "USDC");

        match eval.evaluate(&legs, U256::from(1000u64), &borrowed).await {
            Evaluation::NoTrade(reason) => {
                // Reverse quote went to venue "a" (the scripted key), so the
                // tie resolved first-seen; the result is simply unprofitable.
                assert_eq!(reason, NoTradeReason::NotProfitable);
            }
            other => panic!("expected no trade, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fewer_than_two_legs() {
        let eval = evaluator(&[]);
        let legs = vec![leg("a", 1000, 1000)];
        let borrowed = token(0xaa, "USDC");

        match eval.evaluate(&legs, U256::from(1000u64), &borrowed).await {
            Evaluation::NoTrade(reason) => {
                assert_eq!(reason, NoTradeReason::InsufficientCandidates);
            }
            other => panic!("expected no trade, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exit_requote_failure() {
        // No scripted reverse quote: the exit re-quote reverts.
        let eval = evaluator(&[]);
        let legs = vec![leg("b", 1000, 1020), leg("c", 1000, 990)];
        let borrowed = token(0xaa, "USDC");

        match eval.evaluate(&legs, U256::from(1000u64), &borrowed).await {
            Evaluation::NoTrade(reason) => {
                assert_eq!(reason, NoTradeReason::QuoteFailure);
            }
            other => panic!("expected no trade, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_determinism() {
        let legs = vec![leg("a", 1000, 1000), leg("b", 1000, 1020), leg("c", 1000, 990)];
        let borrowed = token(0xaa, "USDC");

        for _ in 0..3 {
            let eval = evaluator(&[("c:reverse", 1018)]);
            match eval.evaluate(&legs, U256::from(1000u64), &borrowed).await {
                Evaluation::Profitable(opp) => {
                    assert_eq!(opp.entry_leg.venue(), "b");
                    assert_eq!(opp.exit_leg.venue(), "c");
                }
                other => panic!("expected profitable, got {other:?}"),
            }
        }
    }
}
