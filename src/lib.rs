//! Flash-loan cross-venue DEX arbitrage bot.
//!
//! Watches swap events on tracked pools, finds every equivalent pool for the
//! pair across venues, quotes a flash-loan-sized notional on each, and when
//! the round trip clears the loan fee plus a profit buffer hands the trade
//! plan to the execution engine. One in-flight task per pipeline stage;
//! overlapping triggers are dropped.

pub mod config;
pub mod contracts;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod execution;
pub mod pairs;
pub mod pipeline;
pub mod quote;
pub mod sizing;
pub mod types;

pub use config::BotConfig;
pub use error::{IndexError, NoTradeReason, QuoteError, SizingError};
pub use evaluator::{Evaluation, OpportunityEvaluator};
pub use execution::{DryRunExecution, ExecutionEngine, TradePlan};
pub use pairs::PairIndex;
pub use pipeline::{spawn_pipeline, SingleFlightGate};
pub use quote::{OnChainQuoteProvider, QuoteEngine};
pub use sizing::TradeSizer;
pub use types::{Leg, Opportunity, Pool, ProtocolKind, Token, TriggerEvent};
