//! Operator input classification for the prompt loop.

/// Substrings that mark a supported source URL.
const DOMAIN_MARKERS: [&str; 2] = ["youtube.com", "youtu.be"];

/// What the dispatcher should do with one line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Graceful quit: drain the queue, then stop everything.
    Quit,
    /// Status refresh request. The renderer already runs continuously, so
    /// this is acknowledged as a no-op.
    Status,
    /// A URL accepted for the queue.
    Enqueue(String),
    /// Rejected input, with the message to show the operator.
    Reject(&'static str),
}

pub fn classify(line: &str) -> InputAction {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("q") {
        return InputAction::Quit;
    }
    if trimmed.eq_ignore_ascii_case("s") {
        return InputAction::Status;
    }
    if trimmed.is_empty() {
        return InputAction::Reject("Please enter a valid URL");
    }
    if !DOMAIN_MARKERS.iter().any(|marker| trimmed.contains(marker)) {
        return InputAction::Reject("Please enter a valid YouTube URL");
    }
    InputAction::Enqueue(trimmed.to_string())
}
