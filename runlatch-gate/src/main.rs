//! Runlatch Gate
//!
//! Serializes runs of a CI workflow: blocks the current run until every
//! earlier run of the same workflow (and queue) has finished.
//!
//! Architecture:
//! - Configuration: flags with fallbacks to the platform's environment
//! - Run source: the Actions API client from `runlatch-client`
//! - Scheduler: the polling state machine deciding when to proceed
//! - Services: step outputs reporting the outcome
//!
//! The gate exits successfully once nothing is left to wait for or the
//! continue-after threshold is reached, and fails when the abort-after
//! threshold is reached first.

mod config;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Args, Config};
use crate::scheduler::{WaitError, Waiter};
use crate::service::{ActionOutputs, OutputSink};
use runlatch_client::ActionsClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runlatch_gate=info,runlatch_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let args = Args::parse();
    let config = Config::from_args(&args).context("Invalid configuration")?;
    info!(
        "Loaded configuration: repository={}/{}, run_id={}, workflow={}, branch={}",
        config.owner,
        config.repo,
        config.run_id,
        config.workflow,
        config.branch.as_deref().unwrap_or("<any>")
    );

    if let (Some(continue_after), Some(abort_after)) =
        (config.continue_after_secs, config.abort_after_secs)
    {
        warn!(
            "Both continue-after ({}s) and abort-after ({}s) are set; \
             continue-after is checked first",
            continue_after, abort_after
        );
    }

    // Initialize API client
    let client = Arc::new(ActionsClient::new(args.api_url.clone(), args.token.clone()));
    info!("Actions client initialized for {}", client.base_url());

    let workflow_id = match client
        .resolve_workflow(&config.owner, &config.repo, &config.workflow)
        .await
    {
        Ok(id) => id,
        Err(e) => {
            if e.is_not_found() {
                error!(
                    "Workflow '{}' does not exist in {}/{}",
                    config.workflow, config.owner, config.repo
                );
            }
            return Err(e)
                .with_context(|| format!("Failed to resolve workflow '{}'", config.workflow));
        }
    };

    let outputs: Arc<dyn OutputSink> = Arc::new(ActionOutputs::new(args.output_file.clone()));

    info!(
        "Poll interval: {}s, exponential backoff: {}",
        config.poll_interval_secs, config.exponential_backoff
    );

    let waiter = Waiter::new(config, workflow_id, client, outputs);

    match waiter.wait().await {
        Ok(elapsed) => {
            info!("Proceeding after waiting {}s", elapsed);
            Ok(())
        }
        Err(WaitError::Aborted { elapsed }) => {
            error!("Gave up after waiting {}s", elapsed);
            Err(WaitError::Aborted { elapsed }.into())
        }
        Err(e) if e.is_throttled() => {
            error!("Rate limited by the API while polling, giving up: {}", e);
            Err(e).context("Failed while waiting for earlier runs")
        }
        Err(e) => {
            error!("Waiting failed: {}", e);
            Err(e).context("Failed while waiting for earlier runs")
        }
    }
}
