//! Boundary to the external download/transcode engine.
//!
//! Workers only see the [`FetchClient`] trait; the production implementation
//! shells out to yt-dlp ([`YtDlpFetcher`]), tests substitute a scripted
//! double.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

mod ytdlp;
pub use ytdlp::YtDlpFetcher;

/// Progress event emitted while a fetch is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A percentage string straight from the engine, e.g. `"42.3%"`.
    Downloading(String),
    /// The transfer is done; transcoding may still be running.
    Finished,
}

/// Failure from the fetch engine. Workers record these per item; nothing
/// here ever propagates past the worker loop.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("yt-dlp not found on PATH")]
    MissingBinary(#[source] which::Error),
    #[error("metadata probe failed: {0}")]
    Probe(String),
    #[error("download failed: {0}")]
    Download(String),
    #[error("i/o talking to yt-dlp: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Human-readable cause without the classification prefix; this is what
    /// failed-outcome records show the operator.
    pub fn message(&self) -> String {
        match self {
            FetchError::MissingBinary(_) => "yt-dlp not found on PATH".to_string(),
            FetchError::Probe(msg) | FetchError::Download(msg) => msg.clone(),
            FetchError::Io(err) => err.to_string(),
        }
    }
}

/// Engine-agnostic view of the downloader: a metadata probe plus a download
/// call that streams progress over a channel the caller owns for the
/// duration of the call.
#[async_trait]
pub trait FetchClient: Send + Sync {
    /// Resolve the media title for `url`.
    async fn probe(&self, url: &str) -> Result<String, FetchError>;

    /// Download and transcode `url` into the library, sending progress
    /// events on `progress` until the call returns.
    async fn fetch(
        &self,
        url: &str,
        title: &str,
        progress: mpsc::UnboundedSender<ProgressEvent>,
    ) -> Result<(), FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_drops_the_classification_prefix() {
        let err = FetchError::Download("network timeout".to_string());
        assert_eq!(err.to_string(), "download failed: network timeout");
        assert_eq!(err.message(), "network timeout");
    }
}
