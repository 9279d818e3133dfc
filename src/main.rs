//! Binary entry point: load config and snapshots, connect the WS provider,
//! wire the pipeline, and forward swap events until Ctrl-C.

use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use anyhow::{Context, Result};
use clap::Parser;
use flasharb_bot::config;
use flasharb_bot::events;
use flasharb_bot::execution::DryRunExecution;
use flasharb_bot::pairs::{self, PairIndex};
use flasharb_bot::pipeline::spawn_pipeline;
use flasharb_bot::quote::{OnChainQuoteProvider, QuoteEngine};
use flasharb_bot::sizing::TradeSizer;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "flasharb-bot")]
#[command(about = "Flash-loan cross-venue DEX arbitrage bot")]
struct Args {
    /// Target chain (selects the .env.<chain> file).
    #[arg(long, env = "CHAIN", default_value = "polygon")]
    chain: String,

    /// Override the snapshot directory from the environment.
    #[arg(long)]
    snapshot_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    if !matches!(args.chain.as_str(), "polygon" | "base") {
        anyhow::bail!("Unsupported chain: {} (expected polygon or base)", args.chain);
    }

    let mut config = config::load_config_for_chain(&args.chain)?;
    if let Some(dir) = args.snapshot_dir {
        config.snapshot_dir = dir.into();
    }
    info!(
        "🚀 Starting arbitrage bot on {} (chain id {})",
        args.chain, config.chain_id
    );

    let snapshots = pairs::load_dir(&config.snapshot_dir)?;
    let index = Arc::new(PairIndex::from_snapshots(&snapshots)?);
    info!(
        "Indexed {} pools across {} venues",
        index.pool_count(),
        index.venue_count()
    );

    let provider = ProviderBuilder::new()
        .connect_ws(WsConnect::new(&config.rpc_url))
        .await
        .context("Failed to connect WebSocket provider")?
        .erased();

    let quote_provider = Arc::new(OnChainQuoteProvider::new(provider.clone()));
    let engine = Arc::new(QuoteEngine::with_timeout(
        quote_provider,
        Duration::from_millis(config.quote_timeout_ms),
    ));
    let sizer = Arc::new(TradeSizer::for_chain(&args.chain)?);
    let executor = Arc::new(DryRunExecution);

    let (trigger_tx, _compute, _execute) = spawn_pipeline(index.clone(), sizer, engine, executor);

    let subscription =
        events::subscribe_swaps(provider, index.tracked_pools(), trigger_tx).await?;

    info!("Pipeline running, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutting down");
    subscription.cancel();
    Ok(())
}
