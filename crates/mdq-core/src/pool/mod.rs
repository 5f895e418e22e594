//! Fixed-size worker pool over the shared ledger.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::fetch::FetchClient;
use crate::ledger::Ledger;

mod worker;


/// Owns the worker tasks. Dropping the pool aborts them, which is the
/// best-effort interrupt path: in-flight downloads are abandoned, not
/// cancelled cleanly.
pub struct WorkerPool {
    tasks: JoinSet<()>,
    size: usize,
}

impl WorkerPool {
    /// Spawn `size` workers (at least one) sharing one ledger and fetch
    /// client.
    pub fn spawn(size: usize, ledger: Arc<Ledger>, fetcher: Arc<dyn FetchClient>) -> Self {
        let size = size.max(1);
        let mut tasks = JoinSet::new();
        for worker_id in 0..size {
            tasks.spawn(worker::run_worker(
                worker_id,
                Arc::clone(&ledger),
                Arc::clone(&fetcher),
            ));
        }
        tracing::debug!(workers = size, "worker pool started");
        Self { tasks, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Stop the pool: one poison pill per worker, then join them all.
    ///
    /// Callers must drain first ([`Ledger::join`]); a pill enqueued ahead of
    /// real work would let a worker exit while that work is still queued,
    /// stranding it forever.
    pub async fn stop(mut self, ledger: &Ledger) {
        for _ in 0..self.size {
            ledger.push_stop();
        }
        while let Some(res) = self.tasks.join_next().await {
            if let Err(err) = res {
                tracing::warn!(error = %err, "worker task join failed");
            }
        }
        tracing::debug!("worker pool stopped");
    }
}
