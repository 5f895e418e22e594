//! CLI for the mdq music download manager.

mod dispatcher;
mod input;


use anyhow::Result;
use clap::Parser;
use mdq_core::config;
use std::path::PathBuf;

/// Queued multi-worker YouTube music downloader.
#[derive(Debug, Parser)]
#[command(name = "mdq")]
#[command(about = "mdq: queued multi-worker music downloader", long_about = None)]
pub struct Cli {
    /// Number of concurrent download workers (overrides the config file).
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Output directory for downloaded audio (overrides the config file).
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    if let Some(workers) = cli.workers {
        cfg.workers = workers.max(1);
    }
    if let Some(dir) = cli.dir {
        cfg.music_dir = Some(dir);
    }

    dispatcher::run_session(&cfg).await
}
