//! Status renderer: periodic ledger snapshots pushed to a display sink.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::ledger::Ledger;

mod table;
pub use table::{format_table, ConsoleSink, StatusSink};

/// Render the ledger on a fixed cadence until `shutdown` flips to true.
/// The timed wait is interruptible: the loop exits mid-period as soon as
/// the signal arrives.
pub async fn run_status_loop(
    ledger: Arc<Ledger>,
    mut sink: impl StatusSink,
    mut shutdown: watch::Receiver<bool>,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = ticker.tick() => sink.render(&ledger.snapshot()),
            changed = shutdown.changed() => {
                // A dropped sender counts as shutdown too.
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    tracing::debug!("status renderer stopped");
}
