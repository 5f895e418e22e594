//! Configuration loaded from `~/.config/mdq/config.toml`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_workers() -> usize {
    3
}

fn default_refresh_interval_ms() -> u64 {
    500
}

fn default_audio_format() -> String {
    "mp3".to_string()
}

fn default_audio_quality() -> String {
    "192".to_string()
}

/// Global configuration. Every field has a default so a partial (or absent)
/// config file still yields a working session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MdqConfig {
    /// Number of concurrent download workers.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Status table refresh interval in milliseconds.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    /// Target audio container passed to the transcode step.
    #[serde(default = "default_audio_format")]
    pub audio_format: String,
    /// Target audio quality; "192" means 192 kbps.
    #[serde(default = "default_audio_quality")]
    pub audio_quality: String,
    /// Where downloads land. Defaults to `./music` when unset.
    #[serde(default)]
    pub music_dir: Option<PathBuf>,
}

impl Default for MdqConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            refresh_interval_ms: default_refresh_interval_ms(),
            audio_format: default_audio_format(),
            audio_quality: default_audio_quality(),
            music_dir: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mdq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MdqConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MdqConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MdqConfig = toml::from_str(&data)?;
    Ok(cfg)
}
