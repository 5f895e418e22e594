//! End-to-end drain and shutdown behavior across the public API: ledger,
//! worker pool, and status renderer wired together the way the CLI wires
//! them.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::ScriptedFetcher;
use mdq_core::control::ShutdownSignal;
use mdq_core::ledger::{Ledger, LedgerSnapshot};
use mdq_core::pool::WorkerPool;
use mdq_core::render::{run_status_loop, StatusSink};

struct CollectingSink(Arc<Mutex<Vec<LedgerSnapshot>>>);

impl StatusSink for CollectingSink {
    fn render(&mut self, snapshot: &LedgerSnapshot) {
        self.0.lock().unwrap().push(snapshot.clone());
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn full_session_drains_and_reports_outcomes() {
    let fetcher = ScriptedFetcher::new(Duration::from_millis(10))
        .succeed("https://youtube.com/watch?v=a", "Track A")
        .succeed("https://youtu.be/b", "Track B")
        .fail("https://youtube.com/watch?v=c", "Track C", "network timeout")
        .into_client();

    let ledger = Arc::new(Ledger::new());
    let shutdown = ShutdownSignal::new();
    let frames = Arc::new(Mutex::new(Vec::new()));

    let renderer = tokio::spawn(run_status_loop(
        Arc::clone(&ledger),
        CollectingSink(Arc::clone(&frames)),
        shutdown.subscribe(),
        Duration::from_millis(10),
    ));
    let pool = WorkerPool::spawn(3, Arc::clone(&ledger), fetcher);

    for url in [
        "https://youtube.com/watch?v=a",
        "https://youtu.be/b",
        "https://youtube.com/watch?v=c",
    ] {
        ledger.push(url);
    }

    // Quit sequence: drain, signal the renderer, stop the workers.
    ledger.join().await;
    shutdown.signal();
    pool.stop(&ledger).await;
    renderer.await.unwrap();

    assert_eq!(ledger.totals(), (2, 1));
    let snap = ledger.snapshot();
    assert!(snap.active.is_empty());
    assert_eq!(snap.queue_depth, 0);
    assert!(snap.recent_failed[0].ends_with("network timeout"));

    // Every frame the renderer observed was internally consistent.
    for frame in frames.lock().unwrap().iter() {
        assert!(frame.completed_total >= frame.recent_completed.len());
        assert!(frame.failed_total >= frame.recent_failed.len());
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn drain_accounts_for_every_submitted_url() {
    const SUBMITTED: usize = 12;

    let mut fetcher = ScriptedFetcher::new(Duration::from_millis(2));
    for i in 0..SUBMITTED {
        fetcher = if i % 4 == 0 {
            fetcher.fail(&format!("u{i}"), "title", "boom")
        } else {
            fetcher.succeed(&format!("u{i}"), "title")
        };
    }

    let ledger = Arc::new(Ledger::new());
    let pool = WorkerPool::spawn(3, Arc::clone(&ledger), fetcher.into_client());
    for i in 0..SUBMITTED {
        ledger.push(format!("u{i}"));
    }

    ledger.join().await;
    pool.stop(&ledger).await;

    let snap = ledger.snapshot();
    // After a full drain every submitted URL is accounted for exactly once.
    assert_eq!(snap.active.len(), 0);
    assert_eq!(snap.queue_depth, 0);
    assert_eq!(snap.completed_total + snap.failed_total, SUBMITTED);
}

#[tokio::test(flavor = "multi_thread")]
async fn interrupt_mid_download_does_not_hang() {
    let fetcher = ScriptedFetcher::new(Duration::from_secs(60))
        .succeed("u1", "very slow")
        .into_client();

    let ledger = Arc::new(Ledger::new());
    let shutdown = ShutdownSignal::new();
    let renderer = tokio::spawn(run_status_loop(
        Arc::clone(&ledger),
        CollectingSink(Arc::new(Mutex::new(Vec::new()))),
        shutdown.subscribe(),
        Duration::from_millis(10),
    ));
    let pool = WorkerPool::spawn(1, Arc::clone(&ledger), fetcher);

    ledger.push("u1");
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Interrupt path: signal the renderer and drop the pool without joining.
    shutdown.signal();
    drop(pool);

    tokio::time::timeout(Duration::from_secs(1), renderer)
        .await
        .expect("renderer must exit promptly after the interrupt")
        .unwrap();
}
