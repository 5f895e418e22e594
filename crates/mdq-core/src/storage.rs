//! Output directory handling for the music library.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::config::MdqConfig;

/// Default library directory, relative to the working directory.
const DEFAULT_DIR: &str = "music";

/// Resolve and create the music output directory. Idempotent across runs.
pub fn ensure_music_dir(cfg: &MdqConfig) -> Result<PathBuf> {
    let dir = cfg
        .music_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR));
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating music directory {}", dir.display()))?;
    Ok(dir)
}
