use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::*;

use ordlight_btcio::rpc::traits::ReaderRpc;
use ordlight_btcio::rpc::BitcoinClient;
use ordlight_btcio::verify::OrdinalsVerifier;
use ordlight_checkpoints::CheckpointProvider;
use ordlight_commitment::Sha256Smt;
use ordlight_committee::{CommitteeClient, CommitteeProofSource};
use ordlight_common::env::env_or;
use ordlight_common::logging;
use ordlight_config::Config;
use ordlight_state::{ReconcileOptions, ReconcilerState};

use crate::args::Args;

mod args;

const POLL_DUR_ENVVAR: &str = "ORDLIGHT_POLL_DUR_MS";

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    if let Err(e) = main_inner(args) {
        eprintln!("FATAL ERROR: {e}");
        return Err(e);
    }
    Ok(())
}

fn main_inner(args: Args) -> anyhow::Result<()> {
    logging::init();
    let config = load_config(&args)?;

    // Start runtime for async IO tasks.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("ordlight-rt")
        .build()
        .expect("init: build rt");

    runtime.block_on(run(config))
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let raw = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading config {}", args.config.display()))?;
    let mut config: Config = toml::from_str(&raw).context("parsing config")?;
    args.override_config(&mut config);
    Ok(config)
}

async fn run(config: Config) -> anyhow::Result<()> {
    let bitcoin_client = Arc::new(BitcoinClient::new(
        config.bitcoind.rpc_url.clone(),
        &config.bitcoind.rpc_user,
        &config.bitcoind.rpc_password,
    )?);

    let mut providers: Vec<Arc<dyn CheckpointProvider>> = Vec::new();
    for provider in &config.providers {
        providers.push(Arc::new(CommitteeClient::new(&provider.name, &provider.url)?));
    }

    let options = ReconcileOptions {
        min_checkpoints: config.reconcile.minimal_checkpoints,
        fetch_timeout: Duration::from_millis(config.reconcile.fetch_timeout_ms),
        verify_timeout: Duration::from_millis(config.reconcile.verify_timeout_ms),
        deny_list_path: config.reconcile.deny_list_path.clone(),
    };
    let state = Arc::new(ReconcilerState::new(
        options,
        providers,
        Arc::new(CommitteeProofSource),
        Arc::new(OrdinalsVerifier::new(bitcoin_client.clone())),
        Arc::new(Sha256Smt),
        config.bootstrap.checkpoint(),
    ));

    let bootstrap_height = state.current_height().await;
    info!(%bootstrap_height, providers = config.providers.len(), "light client initialized");

    let poll_dur = Duration::from_millis(env_or(POLL_DUR_ENVVAR, config.client.poll_dur_ms));
    chase_blocks(bitcoin_client, state, poll_dur).await
}

/// Follows the Bitcoin tip and runs one reconciliation round per block. A
/// failed round stays at its height and retries after the poll interval.
async fn chase_blocks(
    client: Arc<BitcoinClient>,
    state: Arc<ReconcilerState>,
    poll_dur: Duration,
) -> anyhow::Result<()> {
    info!("starting block chase");
    loop {
        let tip = match client.get_block_count().await {
            Ok(tip) => tip,
            Err(e) => {
                warn!(err = %e, "failed to poll bitcoind for the tip");
                tokio::time::sleep(poll_dur).await;
                continue;
            }
        };

        let mut next = state.current_height().await + 1;
        while next <= tip {
            let hash = match client.get_block_hash(next).await {
                Ok(hash) => hash,
                Err(e) => {
                    warn!(%next, err = %e, "failed to fetch block hash");
                    break;
                }
            };
            if let Err(e) = state.advance(next, &hash).await {
                warn!(%next, err = %e, "reconciliation round failed, will retry");
                break;
            }
            next += 1;
        }

        tokio::time::sleep(poll_dur).await;
    }
}
