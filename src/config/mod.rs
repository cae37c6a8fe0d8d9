mod types;

pub use types::*;

use anyhow::{Context, Result};
use frametrim_av::actions::TrimSettings;
use frametrim_av::tools::{tool_path, FFMPEG, FFPROBE};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./frametrim.toml", "~/.config/frametrim/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    let fps = config.batch.default_fps;
    if !fps.is_finite() || fps <= 0.0 {
        anyhow::bail!("batch.default_fps must be a positive number, got {}", fps);
    }

    if config.batch.output_prefix.is_empty() {
        anyhow::bail!("batch.output_prefix cannot be empty");
    }

    if config.encode.video_codec.trim().is_empty() {
        anyhow::bail!("encode.video_codec cannot be empty");
    }

    if config.encode.audio_codec.trim().is_empty() {
        anyhow::bail!("encode.audio_codec cannot be empty");
    }

    for (name, path) in [
        ("ffmpeg_path", &config.tools.ffmpeg_path),
        ("ffprobe_path", &config.tools.ffprobe_path),
    ] {
        if let Some(p) = path {
            if !p.exists() {
                tracing::warn!("tools.{} does not exist: {:?}", name, p);
            }
        }
    }

    Ok(())
}

impl Config {
    /// Tool paths and encoding settings for the clip extractor.
    pub fn trim_settings(&self) -> TrimSettings {
        TrimSettings {
            ffmpeg: tool_path(FFMPEG, self.tools.ffmpeg_path.as_deref()),
            ffprobe: tool_path(FFPROBE, self.tools.ffprobe_path.as_deref()),
            encode: (&self.encode).into(),
            default_fps: self.batch.default_fps,
        }
    }
}
