//! Point-in-time view of the ledger for the status renderer.

/// How many recent completed/failed outcomes a snapshot carries.
pub const RECENT_TAIL: usize = 3;

/// One active download as the status table shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRow {
    pub title: String,
    pub progress: String,
}

/// Consistent view of the whole ledger, taken under one lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// Active downloads in the order they entered.
    pub active: Vec<ActiveRow>,
    /// Jobs waiting in the queue (poison pills not counted).
    pub queue_depth: usize,
    /// Last few completed titles, oldest first.
    pub recent_completed: Vec<String>,
    /// Last few failure summaries, oldest first.
    pub recent_failed: Vec<String>,
    /// Lifetime completed count (the tails above are display-only).
    pub completed_total: usize,
    /// Lifetime failed count.
    pub failed_total: usize,
}

impl LedgerSnapshot {
    /// True when there is nothing worth rendering.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
            && self.queue_depth == 0
            && self.recent_completed.is_empty()
            && self.recent_failed.is_empty()
    }
}
