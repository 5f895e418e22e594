//! Logging init: file under the XDG state dir, stderr fallback.
//!
//! The interactive prompt owns stdout, so log output never goes there.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Writer that is either the log file or stderr (used when the file handle
/// cannot be cloned).
enum LogWriter {
    File(fs::File),
    Stderr,
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogWriter::File(f) => f.write(buf),
            LogWriter::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogWriter::File(f) => f.flush(),
            LogWriter::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct FileMakeWriter(fs::File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(LogWriter::File)
            .unwrap_or(LogWriter::Stderr)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mdq_core=debug,mdq_cli=debug"))
}

fn open_log_file() -> io::Result<(fs::File, PathBuf)> {
    let dir = xdg::BaseDirectories::with_prefix("mdq")
        .map_err(|err| io::Error::new(io::ErrorKind::NotFound, err))?
        .get_state_home();
    fs::create_dir_all(&dir)?;
    let path = dir.join("mdq.log");
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}

/// Initialize structured logging to `~/.local/state/mdq/mdq.log`, falling
/// back to stderr when the state dir is unwritable.
pub fn init() {
    match open_log_file() {
        Ok((file, path)) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(FileMakeWriter(file))
                .with_ansi(false)
                .init();
            tracing::info!("mdq logging initialized at {}", path.display());
        }
        Err(err) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(io::stderr)
                .with_ansi(false)
                .init();
            tracing::warn!(error = %err, "log file unavailable; logging to stderr");
        }
    }
}
