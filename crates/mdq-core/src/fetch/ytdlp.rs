//! yt-dlp subprocess client: audio-only best quality, transcoded to the
//! configured format. Quiet except for `--newline` progress lines, which we
//! parse into [`ProgressEvent`]s.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::config::MdqConfig;

use super::{FetchClient, FetchError, ProgressEvent};

pub struct YtDlpFetcher {
    bin: PathBuf,
    music_dir: PathBuf,
    audio_format: String,
    audio_quality: String,
}

impl YtDlpFetcher {
    /// Locate yt-dlp on PATH and bind the output directory.
    pub fn new(cfg: &MdqConfig, music_dir: PathBuf) -> Result<Self, FetchError> {
        let bin = which::which("yt-dlp").map_err(FetchError::MissingBinary)?;
        tracing::debug!(bin = %bin.display(), "found yt-dlp");
        Ok(Self {
            bin,
            music_dir,
            audio_format: cfg.audio_format.clone(),
            audio_quality: cfg.audio_quality.clone(),
        })
    }
}

#[async_trait]
impl FetchClient for YtDlpFetcher {
    async fn probe(&self, url: &str) -> Result<String, FetchError> {
        let output = Command::new(&self.bin)
            .args(["--dump-json", "--no-warnings", "--no-playlist"])
            .arg(url)
            .stdin(Stdio::null())
            .output()
            .await?;
        if !output.status.success() {
            return Err(FetchError::Probe(stderr_summary(&output.stderr)));
        }
        let meta: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|err| FetchError::Probe(format!("unparseable metadata: {err}")))?;
        Ok(meta
            .get("title")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Unknown")
            .to_string())
    }

    async fn fetch(
        &self,
        url: &str,
        title: &str,
        progress: mpsc::UnboundedSender<ProgressEvent>,
    ) -> Result<(), FetchError> {
        tracing::info!(url, title, "starting download");
        let template = self.music_dir.join("%(title)s.%(ext)s");
        let mut child = Command::new(&self.bin)
            .args(["-f", "bestaudio/best", "-x"])
            .args(["--audio-format", &self.audio_format])
            .args(["--audio-quality", &self.audio_quality])
            .args(["--newline", "--progress", "--no-warnings", "--no-playlist"])
            .arg("-o")
            .arg(&template)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain stderr concurrently so a chatty failure cannot stall the
        // child on a full pipe; keep the last line as the failure cause.
        let stderr = child.stderr.take();
        let stderr_tail = tokio::spawn(async move {
            let mut tail = String::new();
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if !line.trim().is_empty() {
                        tail = line;
                    }
                }
            }
            tail
        });

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if let Some(event) = parse_progress_line(&line) {
                    // Receiver gone just means nobody is watching anymore;
                    // the download itself keeps going.
                    let _ = progress.send(event);
                }
            }
        }

        let status = child.wait().await?;
        let tail = stderr_tail.await.unwrap_or_default();
        if status.success() {
            Ok(())
        } else if tail.is_empty() {
            Err(FetchError::Download(format!("yt-dlp exited with {status}")))
        } else {
            Err(FetchError::Download(tail))
        }
    }
}

/// Parse one `--newline` stdout line. `[download]  42.3% of ...` carries a
/// percentage; the `[ExtractAudio]` post-processing marker means the
/// transfer itself finished.
fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let line = line.trim();
    if line.starts_with("[ExtractAudio]") {
        return Some(ProgressEvent::Finished);
    }
    let rest = line.strip_prefix("[download]")?;
    let pct = rest.split_whitespace().find(|tok| tok.ends_with('%'))?;
    Some(ProgressEvent::Downloading(pct.to_string()))
}

/// Last non-empty stderr line, for human-readable failure records.
fn stderr_summary(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("unknown error")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_line_yields_percentage() {
        let line = "[download]  42.3% of 3.45MiB at 1.20MiB/s ETA 00:02";
        assert_eq!(
            parse_progress_line(line),
            Some(ProgressEvent::Downloading("42.3%".to_string()))
        );
    }

    #[test]
    fn full_download_line_yields_hundred_percent() {
        let line = "[download] 100% of 3.45MiB in 00:03";
        assert_eq!(
            parse_progress_line(line),
            Some(ProgressEvent::Downloading("100%".to_string()))
        );
    }

    #[test]
    fn extract_audio_marker_is_finished() {
        let line = "[ExtractAudio] Destination: music/Some Song.mp3";
        assert_eq!(parse_progress_line(line), Some(ProgressEvent::Finished));
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        assert_eq!(parse_progress_line("[youtube] abc: Downloading webpage"), None);
        assert_eq!(parse_progress_line("[download] Destination: x.webm"), None);
        assert_eq!(parse_progress_line(""), None);
    }

    #[test]
    fn stderr_summary_picks_last_meaningful_line() {
        let stderr = b"WARNING: something minor\n\nERROR: [youtube] abc: Video unavailable\n\n";
        assert_eq!(
            stderr_summary(stderr),
            "ERROR: [youtube] abc: Video unavailable"
        );
    }

    #[test]
    fn stderr_summary_handles_empty_output() {
        assert_eq!(stderr_summary(b""), "unknown error");
    }
}
