//! Shared work queue and download ledger behind one lock domain.
//!
//! Everything the status view observes (active downloads, queue depth,
//! outcome tails) lives under a single mutex, so a snapshot can never see a
//! torn state. Blocking dequeue is one semaphore permit per queued job;
//! drain waiters park on a `Notify` that fires when the outstanding count
//! reaches zero. The lock is never held across an await point.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use tokio::sync::{Notify, Semaphore};

mod snapshot;
pub use snapshot::{ActiveRow, LedgerSnapshot, RECENT_TAIL};


/// Placeholder title shown until the metadata probe resolves the real one.
pub const PENDING_TITLE: &str = "Fetching info...";

/// One unit of work for a pool worker: a URL to download, or the poison
/// pill telling the worker to exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Work(String),
    Stop,
}

#[derive(Debug, Clone)]
struct ActiveEntry {
    title: String,
    progress: String,
    /// Enter order, so the status table lists older downloads first.
    seq: u64,
}

#[derive(Default)]
struct Inner {
    queue: VecDeque<Job>,
    active: HashMap<String, ActiveEntry>,
    completed: Vec<String>,
    failed: Vec<String>,
    /// Work items pushed but not yet `task_done`'d (queued or in flight).
    outstanding: usize,
    next_seq: u64,
}

impl Inner {
    fn work_depth(&self) -> usize {
        self.queue
            .iter()
            .filter(|job| matches!(job, Job::Work(_)))
            .count()
    }
}

/// Shared queue + download state. Cheap to construct, shared via `Arc`.
pub struct Ledger {
    inner: Mutex<Inner>,
    /// One permit per queued `Job`; makes dequeue MPMC-safe without polling.
    slots: Semaphore,
    drained: Notify,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            slots: Semaphore::new(0),
            drained: Notify::new(),
        }
    }

    /// Enqueue a URL. Returns the number of jobs now waiting in the queue
    /// (in-flight downloads not included). Never blocks.
    pub fn push(&self, url: impl Into<String>) -> usize {
        let depth = {
            let mut inner = self.inner.lock().unwrap();
            inner.queue.push_back(Job::Work(url.into()));
            inner.outstanding += 1;
            inner.work_depth()
        };
        self.slots.add_permits(1);
        depth
    }

    /// Enqueue one poison pill. Callers must drain first (see
    /// [`Ledger::join`]); a pill ahead of real work would strand that work
    /// behind an exiting worker.
    pub fn push_stop(&self) {
        self.inner.lock().unwrap().queue.push_back(Job::Stop);
        self.slots.add_permits(1);
    }

    /// Dequeue the next job, waiting while the queue is empty. Safe to call
    /// from any number of workers concurrently.
    pub async fn dequeue(&self) -> Job {
        let permit = match self.slots.acquire().await {
            Ok(permit) => permit,
            // The semaphore is never closed; treat closure as shutdown.
            Err(_) => return Job::Stop,
        };
        permit.forget();
        self.inner
            .lock()
            .unwrap()
            .queue
            .pop_front()
            .expect("queue permit issued without a queued job")
    }

    /// Mark one dequeued work item as fully processed, success or failure.
    /// When the last outstanding item finishes, drain waiters wake up.
    pub fn task_done(&self) {
        let idle = {
            let mut inner = self.inner.lock().unwrap();
            inner.outstanding = inner.outstanding.saturating_sub(1);
            inner.outstanding == 0
        };
        if idle {
            self.drained.notify_waiters();
        }
    }

    /// Wait until every pushed URL has been processed. Returns immediately
    /// when nothing is queued or in flight.
    pub async fn join(&self) {
        loop {
            let drained = self.drained.notified();
            if self.inner.lock().unwrap().outstanding == 0 {
                return;
            }
            drained.await;
        }
    }

    /// Register `url` as actively downloading, with placeholder title and
    /// progress. Re-entering an active URL overwrites it in place
    /// (last-writer-wins; duplicate submissions share one display entry).
    pub fn enter(&self, url: &str) {
        let mut inner = self.inner.lock().unwrap();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.active.insert(
            url.to_string(),
            ActiveEntry {
                title: PENDING_TITLE.to_string(),
                progress: "0%".to_string(),
                seq,
            },
        );
    }

    /// Update the resolved title of an active download. A missing entry is
    /// not an error: the download may have finished concurrently.
    pub fn update_title(&self, url: &str, title: &str) {
        if let Some(entry) = self.inner.lock().unwrap().active.get_mut(url) {
            entry.title = title.to_string();
        }
    }

    /// Update the progress display of an active download. Silently dropped
    /// when the entry is already gone.
    pub fn update_progress(&self, url: &str, progress: &str) {
        if let Some(entry) = self.inner.lock().unwrap().active.get_mut(url) {
            entry.progress = progress.to_string();
        }
    }

    /// Remove `url` from the active set. Returns whether it was present;
    /// removing an absent key is a no-op, never an error.
    pub fn leave(&self, url: &str) -> bool {
        self.inner.lock().unwrap().active.remove(url).is_some()
    }

    /// Append a successful outcome.
    pub fn record_completed(&self, title: &str) {
        self.inner.lock().unwrap().completed.push(title.to_string());
    }

    /// Append a failed outcome (label plus truncated error message).
    pub fn record_failed(&self, summary: &str) {
        self.inner.lock().unwrap().failed.push(summary.to_string());
    }

    /// Lifetime outcome counts: `(completed, failed)`.
    pub fn totals(&self) -> (usize, usize) {
        let inner = self.inner.lock().unwrap();
        (inner.completed.len(), inner.failed.len())
    }

    /// Consistent point-in-time view for the status renderer, computed in a
    /// single critical section.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let inner = self.inner.lock().unwrap();

        let mut active: Vec<&ActiveEntry> = inner.active.values().collect();
        active.sort_by_key(|entry| entry.seq);
        let active = active
            .into_iter()
            .map(|entry| ActiveRow {
                title: entry.title.clone(),
                progress: entry.progress.clone(),
            })
            .collect();

        LedgerSnapshot {
            active,
            queue_depth: inner.work_depth(),
            recent_completed: tail(&inner.completed),
            recent_failed: tail(&inner.failed),
            completed_total: inner.completed.len(),
            failed_total: inner.failed.len(),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

fn tail(items: &[String]) -> Vec<String> {
    items[items.len().saturating_sub(RECENT_TAIL)..].to_vec()
}
