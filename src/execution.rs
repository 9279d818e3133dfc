//! Trade execution boundary.
//!
//! The pipeline hands profitable opportunities to an `ExecutionEngine`
//! collaborator as a serializable `TradePlan`: legs ordered exit-first, each
//! with a slippage floor on its output. Transaction encoding and submission
//! live behind the trait; this crate ships a dry-run engine that logs the
//! plan it would have sent.

use crate::quote::math;
use crate::types::{Leg, Opportunity, ProtocolKind, Token};
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// One leg as handed to the executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedLeg {
    pub venue: String,
    pub router: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoter: Option<Address>,
    pub pool: Address,
    pub protocol_kind: ProtocolKind,
    pub token_in: Address,
    pub token_out: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_tier: Option<u32>,
    pub amount_in: U256,
    pub amount_out: U256,
    /// 0.3% below the quoted output; the executed swap reverts under this.
    pub amount_out_minimum: U256,
}

impl PlannedLeg {
    fn from_leg(leg: &Leg) -> Self {
        Self {
            venue: leg.routing.venue.clone(),
            router: leg.routing.router,
            quoter: leg.routing.quoter,
            pool: leg.pool.id,
            protocol_kind: leg.pool.kind,
            token_in: leg.token_in().address,
            token_out: leg.token_out().address,
            fee_tier: leg.pool.fee_tier(),
            amount_in: leg.amount_in,
            amount_out: leg.amount_out,
            amount_out_minimum: math::slippage_minimum(leg.amount_out),
        }
    }
}

/// The full round trip handed to the executor, exit leg first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePlan {
    pub legs: Vec<PlannedLeg>,
    pub borrowed_token: Token,
    pub notional: U256,
    pub breakeven_target: U256,
}

impl TradePlan {
    pub fn from_opportunity(opp: &Opportunity) -> Self {
        Self {
            legs: vec![
                PlannedLeg::from_leg(&opp.exit_leg),
                PlannedLeg::from_leg(&opp.entry_leg),
            ],
            borrowed_token: opp.borrowed_token.clone(),
            notional: opp.notional,
            breakeven_target: opp.breakeven_target,
        }
    }
}

/// What happened to a submitted plan.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub submitted: bool,
    pub detail: String,
    pub execution_time_ms: u64,
}

/// Transaction submission collaborator.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn execute(&self, plan: &TradePlan) -> anyhow::Result<ExecutionReport>;
}

/// Logs the plan instead of submitting it.
pub struct DryRunExecution;

#[async_trait]
impl ExecutionEngine for DryRunExecution {
    async fn execute(&self, plan: &TradePlan) -> anyhow::Result<ExecutionReport> {
        let start = Instant::now();
        let serialized = serde_json::to_string_pretty(plan)?;
        info!(
            "🔍 DRY RUN - would execute flash loan of {} {}:\n{}",
            plan.notional, plan.borrowed_token.symbol, serialized
        );
        Ok(ExecutionReport {
            submitted: false,
            detail: "dry run".to_string(),
            execution_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}
