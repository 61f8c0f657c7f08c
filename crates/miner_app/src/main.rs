//! `fr-miner`: publishes new Federal Register documents as static stories.

mod cli;
mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::LevelFilter;
use miner_core::HtmlStoryRenderer;
use miner_engine::{
    DryRunPublisher, FederalRegisterFetcher, GitPublisher, Orchestrator, Publisher, RunSummary,
};
use miner_logging::{miner_error, miner_info};

use cli::{Cli, Commands};
use config::MinerConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = config::config_path(cli.config.as_deref());
    let config = config::load_config(config_path.as_deref())?;

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    miner_logging::initialize(config.log_destination.into(), level, &config.log_file);
    match &config_path {
        Some(path) => miner_info!("Loaded config from {:?}", path),
        None => miner_info!("No config file; using defaults"),
    }

    // Fetches and page delays are awaited one at a time; one thread is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match runtime.block_on(run(cli.command, &config)) {
        Ok(summary) => {
            miner_info!(
                "Done: {} new stories in {} published batches",
                summary.new_stories,
                summary.batches_published
            );
            Ok(())
        }
        Err(err) => {
            miner_error!("Run aborted: {:#}", err);
            Err(err)
        }
    }
}

async fn run(command: Commands, config: &MinerConfig) -> Result<RunSummary> {
    let fetcher = FederalRegisterFetcher::new(config.fetch_settings())
        .context("failed to build upstream client")?;
    let publisher: Box<dyn Publisher> = if config.publish {
        Box::new(GitPublisher::new(config.repo_dir.clone()))
    } else {
        Box::new(DryRunPublisher)
    };
    let orchestrator = Orchestrator::new(
        &config.miner_settings(),
        Arc::new(fetcher),
        Arc::new(HtmlStoryRenderer),
        publisher,
    );

    let today = Local::now().date_naive();
    let summary = match command {
        Commands::Today { batch_limit } => orchestrator.run_single_date(today, batch_limit).await,
        Commands::History { days, checkpoint } => {
            orchestrator.run_history(today, days, checkpoint).await
        }
    }
    .context("mining run failed")?;
    Ok(summary)
}
