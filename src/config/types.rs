use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use frametrim_av::actions::EncodeSettings;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub encode: EncodeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Manifest CSV to read when none is given on the command line
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Directory trimmed clips are written to (created if missing)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Prefix prepended to every output file name
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    /// Frame rate assumed when detection fails (default: 30)
    #[serde(default = "default_fps")]
    pub default_fps: f64,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("trim_list.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("trimmed")
}

fn default_output_prefix() -> String {
    "FRAME_TRIM_".to_string()
}

fn default_fps() -> f64 {
    frametrim_av::DEFAULT_FPS
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            output_dir: default_output_dir(),
            output_prefix: default_output_prefix(),
            default_fps: default_fps(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncodeConfig {
    /// Video encoder (default: "libx264")
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    /// Video CRF (lower = higher quality, default: 18)
    #[serde(default = "default_crf")]
    pub crf: u32,

    /// Audio encoder (default: "aac")
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Audio bitrate (default: "128k")
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_crf() -> u32 {
    18
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_audio_bitrate() -> String {
    "128k".to_string()
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            video_codec: default_video_codec(),
            crf: default_crf(),
            audio_codec: default_audio_codec(),
            audio_bitrate: default_audio_bitrate(),
        }
    }
}

impl From<&EncodeConfig> for EncodeSettings {
    fn from(ec: &EncodeConfig) -> Self {
        Self {
            video_codec: ec.video_codec.clone(),
            crf: ec.crf,
            audio_codec: ec.audio_codec.clone(),
            audio_bitrate: ec.audio_bitrate.clone(),
        }
    }
}
