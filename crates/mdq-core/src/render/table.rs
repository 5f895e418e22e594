//! Plain-terminal status table. The interactive prompt owns the tty, so the
//! sink prints full frames instead of driving cursor-addressed redraws.

use crate::ledger::LedgerSnapshot;

/// Title column width; longer titles are clipped with an ellipsis.
const TITLE_WIDTH: usize = 50;

/// Where rendered status frames go. Implemented by [`ConsoleSink`] in
/// production and by collecting doubles in tests.
pub trait StatusSink: Send + 'static {
    fn render(&mut self, snapshot: &LedgerSnapshot);
}

/// Format a snapshot as an aligned table. Returns `None` when there is
/// nothing to show yet.
pub fn format_table(snapshot: &LedgerSnapshot) -> Option<String> {
    if snapshot.is_empty() {
        return None;
    }
    let mut out = String::new();
    row(&mut out, "STATUS", "TITLE", "PROGRESS");
    for active in &snapshot.active {
        row(&mut out, "downloading", &clip(&active.title), &active.progress);
    }
    if snapshot.queue_depth > 0 {
        let waiting = format!("{} item(s) waiting", snapshot.queue_depth);
        row(&mut out, "queued", &waiting, "-");
    }
    for title in &snapshot.recent_completed {
        row(&mut out, "completed", &clip(title), "100%");
    }
    for summary in &snapshot.recent_failed {
        row(&mut out, "failed", &clip(summary), "error");
    }
    Some(out)
}

fn row(out: &mut String, status: &str, title: &str, progress: &str) {
    out.push_str(&format!(
        "{:<14} {:<width$} {}\n",
        status,
        title,
        progress,
        width = TITLE_WIDTH
    ));
}

fn clip(s: &str) -> String {
    let max = TITLE_WIDTH - 3;
    if s.chars().count() > max {
        let head: String = s.chars().take(max).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

/// Sink that prints to stdout, reprinting only when the frame changed so an
/// idle queue does not scroll the prompt away.
#[derive(Default)]
pub struct ConsoleSink {
    last: Option<String>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusSink for ConsoleSink {
    fn render(&mut self, snapshot: &LedgerSnapshot) {
        let Some(frame) = format_table(snapshot) else {
            return;
        };
        if self.last.as_deref() == Some(frame.as_str()) {
            return;
        }
        println!("\n{frame}");
        self.last = Some(frame);
    }
}
