//! Worker loop: dequeue, probe, download, record the outcome.
//!
//! Every failure is contained here: it becomes a ledger record and the
//! worker moves on to the next item.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::fetch::{FetchClient, ProgressEvent};
use crate::ledger::{Job, Ledger, PENDING_TITLE};

/// Fallback labels and recorded error messages are clipped to this length.
const LABEL_MAX: usize = 50;

pub(super) async fn run_worker(
    worker_id: usize,
    ledger: Arc<Ledger>,
    fetcher: Arc<dyn FetchClient>,
) {
    tracing::debug!(worker_id, "worker started");
    loop {
        match ledger.dequeue().await {
            Job::Stop => break,
            Job::Work(url) => {
                process_one(&ledger, fetcher.as_ref(), &url).await;
                ledger.task_done();
            }
        }
    }
    tracing::debug!(worker_id, "worker stopped");
}

async fn process_one(ledger: &Arc<Ledger>, fetcher: &dyn FetchClient, url: &str) {
    ledger.enter(url);

    // A failed probe only degrades the display label; the download still runs.
    let title = match fetcher.probe(url).await {
        Ok(title) => {
            ledger.update_title(url, &title);
            Some(title)
        }
        Err(err) => {
            tracing::debug!(url, error = %err, "metadata probe failed");
            None
        }
    };
    let label = title.clone().unwrap_or_else(|| clip(url, LABEL_MAX));

    // The worker owns the progress channel for the duration of one fetch;
    // the relay drops late events on the floor via the ledger's own rules.
    let (tx, rx) = mpsc::unbounded_channel();
    let relay = tokio::spawn(relay_progress(
        rx,
        Arc::clone(ledger),
        url.to_string(),
    ));
    let outcome = fetcher
        .fetch(url, title.as_deref().unwrap_or(PENDING_TITLE), tx)
        .await;
    let _ = relay.await;

    match outcome {
        Ok(()) => {
            ledger.leave(url);
            ledger.record_completed(&label);
            tracing::info!(url, title = %label, "download completed");
        }
        Err(err) => {
            ledger.leave(url);
            let summary = format!("{} - {}", label, clip(&err.message(), LABEL_MAX));
            ledger.record_failed(&summary);
            tracing::warn!(url, error = %err, "download failed");
        }
    }
}

/// Forward progress events into the ledger until the sender side closes.
async fn relay_progress(
    mut rx: mpsc::UnboundedReceiver<ProgressEvent>,
    ledger: Arc<Ledger>,
    url: String,
) {
    while let Some(event) = rx.recv().await {
        match event {
            ProgressEvent::Downloading(pct) => ledger.update_progress(&url, &pct),
            ProgressEvent::Finished => ledger.update_progress(&url, "100%"),
        }
    }
}

fn clip(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
