//! Interactive session: prompt loop plus worker pool and status renderer
//! lifecycle.
//!
//! State machine: Idle (await input) -> Enqueued -> Idle; on quit: Draining
//! (queue join) -> Stopping (signal renderer, poison pills, join workers)
//! -> summary. Ctrl-C anywhere takes the best-effort exit without joining.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::AsyncBufReadExt;

use mdq_core::config::MdqConfig;
use mdq_core::control::ShutdownSignal;
use mdq_core::fetch::YtDlpFetcher;
use mdq_core::ledger::Ledger;
use mdq_core::pool::WorkerPool;
use mdq_core::render::{run_status_loop, ConsoleSink};
use mdq_core::storage;

use super::input::{classify, InputAction};

const BANNER: &str = "\
  YouTube Music Downloader
  multi-worker queue session
";

pub async fn run_session(cfg: &MdqConfig) -> Result<()> {
    println!("{BANNER}");
    let music_dir = storage::ensure_music_dir(cfg)?;
    let shown = music_dir
        .canonicalize()
        .unwrap_or_else(|_| music_dir.clone());
    println!("Music will be saved to: {}", shown.display());
    println!("Using {} concurrent download workers\n", cfg.workers);

    let fetcher = Arc::new(YtDlpFetcher::new(cfg, music_dir)?);
    let ledger = Arc::new(Ledger::new());
    let shutdown = ShutdownSignal::new();

    let renderer = tokio::spawn(run_status_loop(
        Arc::clone(&ledger),
        ConsoleSink::new(),
        shutdown.subscribe(),
        Duration::from_millis(cfg.refresh_interval_ms),
    ));
    let pool = WorkerPool::spawn(cfg.workers, Arc::clone(&ledger), fetcher);

    println!("Commands:");
    println!("  - paste a YouTube URL to add it to the queue");
    println!("  - 'q' to quit (waits for the queue to drain)");
    println!("  - 's' to refresh the status view\n");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                return interrupt(&shutdown);
            }
        };
        // Closed stdin takes the same drain-and-stop path as 'q'.
        let Some(line) = line else { break };
        match classify(&line) {
            InputAction::Quit => break,
            InputAction::Status => continue,
            InputAction::Reject(reason) => println!("{reason}"),
            InputAction::Enqueue(url) => {
                tracing::info!(url = %url, "enqueued");
                let depth = ledger.push(url);
                println!("Added to queue (queue size: {depth})\n");
            }
        }
    }

    println!("\nWaiting for downloads to complete...");
    tokio::select! {
        _ = ledger.join() => {}
        _ = tokio::signal::ctrl_c() => {
            return interrupt(&shutdown);
        }
    }
    shutdown.signal();
    pool.stop(&ledger).await;
    let _ = renderer.await;

    let (completed, failed) = ledger.totals();
    println!("\nGoodbye!");
    println!("Completed: {completed}");
    println!("Failed: {failed}");
    Ok(())
}

/// Best-effort exit: stop the renderer and abandon in-flight downloads.
/// The pool and renderer tasks die with the runtime.
fn interrupt(shutdown: &ShutdownSignal) -> Result<()> {
    shutdown.signal();
    tracing::info!("interrupted; abandoning in-flight downloads");
    println!("\nGoodbye!");
    Ok(())
}

fn prompt() -> Result<()> {
    print!("Enter URL (or command): ");
    std::io::stdout().flush()?;
    Ok(())
}
