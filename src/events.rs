//! Swap event source.
//!
//! Streams `TriggerEvent`s for every tracked pool over a tokio channel. The
//! production source subscribes to V2/V3 `Swap` log topics over the alloy WS
//! provider; tests drive the pipeline by sending into the same channel
//! directly. The subscription runs on its own task and is cancelled by
//! dropping or aborting the handle.

use crate::contracts::{IUniswapV2PairEvents, IUniswapV3PoolEvents};
use crate::types::TriggerEvent;
use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy::rpc::types::Filter;
use alloy::sol_types::SolEvent;
use anyhow::{Context, Result};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Handle to a running log subscription.
pub struct EventSubscription {
    handle: JoinHandle<()>,
}

impl EventSubscription {
    /// Stop forwarding events. Idempotent.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Subscribe to `Swap` logs on every tracked pool and forward them as
/// `TriggerEvent`s. Returns once the subscription is established; forwarding
/// continues on a background task until cancelled.
pub async fn subscribe_swaps<P>(
    provider: P,
    pools: Vec<Address>,
    tx: mpsc::Sender<TriggerEvent>,
) -> Result<EventSubscription>
where
    P: Provider + Clone + 'static,
{
    let filter = Filter::new().address(pools.clone()).event_signature(vec![
        IUniswapV2PairEvents::Swap::SIGNATURE_HASH,
        IUniswapV3PoolEvents::Swap::SIGNATURE_HASH,
    ]);

    let subscription = provider
        .subscribe_logs(&filter)
        .await
        .context("Failed to subscribe to swap logs")?;
    info!("Subscribed to swap events on {} pools", pools.len());

    let handle = tokio::spawn(async move {
        let mut stream = subscription.into_stream();
        while let Some(log) = stream.next().await {
            let event = TriggerEvent {
                pool: log.address(),
                block_number: log.block_number,
            };
            debug!(
                "Swap on pool {} (block {:?})",
                event.pool, event.block_number
            );
            if tx.send(event).await.is_err() {
                warn!("Trigger channel closed, stopping event forwarding");
                break;
            }
        }
    });

    Ok(EventSubscription { handle })
}
