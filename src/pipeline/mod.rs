//! Pipeline stages and channel wiring.
//!
//! Two stages joined by bounded channels: compute turns swap triggers into
//! opportunities, execute hands opportunities to the execution engine. Each
//! stage owns one persistent single-flight gate; admitted work runs on its
//! own task so the stage loop keeps draining (and rejecting) arrivals while
//! busy instead of queuing them behind the in-flight task.

pub mod gate;

pub use gate::{GatePermit, SingleFlightGate};

use crate::error::NoTradeReason;
use crate::evaluator::{Evaluation, OpportunityEvaluator};
use crate::execution::{ExecutionEngine, TradePlan};
use crate::pairs::PairIndex;
use crate::quote::provider::QuoteProvider;
use crate::quote::QuoteEngine;
use crate::sizing::TradeSizer;
use crate::types::{Opportunity, PoolCandidate, TriggerEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const TRIGGER_CHANNEL_CAPACITY: usize = 64;
const OPPORTUNITY_CHANNEL_CAPACITY: usize = 8;

/// Trigger → opportunity stage.
struct ComputeStage<Q> {
    index: Arc<PairIndex>,
    sizer: Arc<TradeSizer>,
    engine: Arc<QuoteEngine<Q>>,
    evaluator: Arc<OpportunityEvaluator<Q>>,
    gate: SingleFlightGate,
    out: mpsc::Sender<Opportunity>,
}

impl<Q> Clone for ComputeStage<Q> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            sizer: Arc::clone(&self.sizer),
            engine: Arc::clone(&self.engine),
            evaluator: Arc::clone(&self.evaluator),
            gate: self.gate.clone(),
            out: self.out.clone(),
        }
    }
}

impl<Q: QuoteProvider + 'static> ComputeStage<Q> {
    async fn run(self, mut rx: mpsc::Receiver<TriggerEvent>) {
        while let Some(event) = rx.recv().await {
            // Discard untracked and single-venue triggers before admission
            // so an irrelevant event never holds the gate.
            let candidates = match self.index.find_equivalent_pools(event.pool) {
                Ok(c) => c,
                Err(e) => {
                    debug!("Ignoring trigger: {e}");
                    continue;
                }
            };
            if candidates.len() < 2 {
                info!(
                    "No trade for pool {}: {}",
                    event.pool,
                    NoTradeReason::InsufficientCandidates
                );
                continue;
            }

            match self.gate.try_admit() {
                Some(permit) => {
                    let stage = self.clone();
                    tokio::spawn(async move {
                        let _permit = permit;
                        stage.process(event, candidates).await;
                    });
                }
                None => {
                    debug!(
                        "Compute busy, dropping trigger for pool {} (block {:?})",
                        event.pool, event.block_number
                    );
                }
            }
        }
        info!("Trigger channel closed, compute stage stopping");
    }

    async fn process(&self, event: TriggerEvent, candidates: Vec<PoolCandidate>) {
        let plan = match self.sizer.choose_notional(&candidates) {
            Ok(p) => p,
            Err(e) => {
                info!(
                    "No trade for pool {}: {} ({e})",
                    event.pool,
                    NoTradeReason::NotBorrowable
                );
                return;
            }
        };
        info!(
            "⚡ Trigger on pool {}: {} candidates, borrowing {} {} (~${:.0})",
            event.pool,
            candidates.len(),
            plan.quantity,
            plan.token.symbol,
            plan.usd_hint
        );

        let legs = self.engine.quote_candidates(&candidates, plan.amount).await;
        match self.evaluator.evaluate(&legs, plan.amount, &plan.token).await {
            Evaluation::Profitable(opportunity) => {
                if self.out.send(opportunity).await.is_err() {
                    warn!("Opportunity channel closed, dropping result");
                }
            }
            Evaluation::NoTrade(reason) => {
                info!("No trade for pool {}: {}", event.pool, reason);
            }
        }
    }
}

/// Opportunity → execution stage.
struct ExecuteStage<E> {
    engine: Arc<E>,
    gate: SingleFlightGate,
}

impl<E: ExecutionEngine + 'static> ExecuteStage<E> {
    async fn run(self, mut rx: mpsc::Receiver<Opportunity>) {
        while let Some(opportunity) = rx.recv().await {
            match self.gate.try_admit() {
                Some(permit) => {
                    let engine = Arc::clone(&self.engine);
                    tokio::spawn(async move {
                        let _permit = permit;
                        let plan = TradePlan::from_opportunity(&opportunity);
                        match engine.execute(&plan).await {
                            Ok(report) => {
                                info!(
                                    "Execution finished in {}ms (submitted: {}): {}",
                                    report.execution_time_ms, report.submitted, report.detail
                                );
                            }
                            Err(e) => {
                                error!("Execution failed: {e:#}");
                            }
                        }
                    });
                }
                None => {
                    warn!(
                        "Execute busy, dropping opportunity ({} -> {})",
                        opportunity.entry_leg.venue(),
                        opportunity.exit_leg.venue()
                    );
                }
            }
        }
        info!("Opportunity channel closed, execute stage stopping");
    }
}

/// Wire both stages and return the trigger sender plus the stage tasks.
pub fn spawn_pipeline<Q, E>(
    index: Arc<PairIndex>,
    sizer: Arc<TradeSizer>,
    engine: Arc<QuoteEngine<Q>>,
    executor: Arc<E>,
) -> (mpsc::Sender<TriggerEvent>, JoinHandle<()>, JoinHandle<()>)
where
    Q: QuoteProvider + 'static,
    E: ExecutionEngine + 'static,
{
    let (trigger_tx, trigger_rx) = mpsc::channel(TRIGGER_CHANNEL_CAPACITY);
    let (opportunity_tx, opportunity_rx) = mpsc::channel(OPPORTUNITY_CHANNEL_CAPACITY);

    let compute = ComputeStage {
        index,
        sizer,
        evaluator: Arc::new(OpportunityEvaluator::new(Arc::clone(&engine))),
        engine,
        gate: SingleFlightGate::new("compute"),
        out: opportunity_tx,
    };
    let execute = ExecuteStage {
        engine: executor,
        gate: SingleFlightGate::new("execute"),
    };

    let compute_handle = tokio::spawn(compute.run(trigger_rx));
    let execute_handle = tokio::spawn(execute.run(opportunity_rx));
    (trigger_tx, compute_handle, execute_handle)
}
