//! Frame-accurate clip extraction.

use crate::probe::{probe_frame_rate_with, DEFAULT_FPS};
use crate::tools::{FFMPEG, FFPROBE};
use crate::{Error, Result, ToolCommand};
use std::path::PathBuf;

/// Re-encoding parameters for trimmed clips.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeSettings {
    /// ffmpeg video encoder name.
    pub video_codec: String,
    /// Constant rate factor (lower = higher quality).
    pub crf: u32,
    /// ffmpeg audio encoder name.
    pub audio_codec: String,
    /// Audio bitrate in ffmpeg notation, e.g. `128k`.
    pub audio_bitrate: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            crf: 18,
            audio_codec: "aac".to_string(),
            audio_bitrate: "128k".to_string(),
        }
    }
}

/// Tool locations and encoding settings shared by every clip in a batch.
#[derive(Debug, Clone)]
pub struct TrimSettings {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub encode: EncodeSettings,
    /// Rate used when a file's frame rate cannot be detected.
    pub default_fps: f64,
}

impl Default for TrimSettings {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from(FFMPEG),
            ffprobe: PathBuf::from(FFPROBE),
            encode: EncodeSettings::default(),
            default_fps: DEFAULT_FPS,
        }
    }
}

/// One clip to cut from one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRequest {
    pub input: PathBuf,
    pub start_frame: u64,
    pub frame_count: u64,
    /// Known frame rate of `input`; probed when `None`.
    pub fps: Option<f64>,
    pub output: PathBuf,
}

/// The time window covered by a clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimWindow {
    pub start_frame: u64,
    pub frame_count: u64,
    pub fps: f64,
    /// Seek offset in seconds.
    pub start_time: f64,
    /// Clip length in seconds.
    pub duration: f64,
}

impl TrimWindow {
    /// Convert a frame range into seconds at `fps`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] unless `fps` is finite and positive.
    pub fn new(start_frame: u64, frame_count: u64, fps: f64) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(Error::InvalidInput(format!("invalid frame rate: {}", fps)));
        }

        Ok(Self {
            start_frame,
            frame_count,
            fps,
            start_time: start_frame as f64 / fps,
            duration: frame_count as f64 / fps,
        })
    }

    /// Frame index one past the last frame of the clip, saturating at `u64::MAX`.
    pub fn end_frame(&self) -> u64 {
        self.start_frame.saturating_add(self.frame_count)
    }

    /// Time in seconds one frame past the end of the clip.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Seek offset formatted for ffmpeg, microsecond precision.
    pub fn start_arg(&self) -> String {
        format!("{:.6}", self.start_time)
    }

    /// Duration formatted with microsecond precision.
    pub fn duration_arg(&self) -> String {
        format!("{:.6}", self.duration)
    }
}

/// Resolve the frame rate for a request.
///
/// Uses the rate carried by the request, else probes the input, else falls
/// back to `settings.default_fps` with a warning.
pub fn resolve_frame_rate(request: &ClipRequest, settings: &TrimSettings) -> f64 {
    if let Some(fps) = request.fps {
        return fps;
    }

    probe_frame_rate_with(&settings.ffprobe, &request.input).unwrap_or_else(|| {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            "Using default {} fps for {}",
            settings.default_fps,
            request.input.display()
        );
        settings.default_fps
    })
}

/// Build the ffmpeg invocation for a clip.
///
/// The seek is placed after `-i` so ffmpeg decodes up to the exact frame,
/// and the length is bounded by `-frames:v` rather than `-t` so rounding in
/// the time domain cannot add or drop a frame.
pub fn build_trim_command(
    request: &ClipRequest,
    window: &TrimWindow,
    settings: &TrimSettings,
) -> ToolCommand {
    let encode = &settings.encode;
    let mut cmd = ToolCommand::new(&settings.ffmpeg);
    cmd.arg("-y")
        .arg("-i")
        .arg(&request.input)
        .arg("-ss")
        .arg(window.start_arg())
        .arg("-frames:v")
        .arg(window.frame_count.to_string())
        .args(["-c:v", encode.video_codec.as_str()])
        .args(["-crf".to_string(), encode.crf.to_string()])
        .args(["-c:a", encode.audio_codec.as_str()])
        .args(["-b:a", encode.audio_bitrate.as_str()])
        .arg(&request.output);
    cmd
}

/// Cut one clip, overwriting any existing file at the output path.
///
/// # Errors
///
/// - [`Error::ToolNotFound`] if the ffmpeg executable is missing.
/// - [`Error::ToolFailed`] if ffmpeg exits non-zero; the message carries
///   ffmpeg's stderr.
///
/// A partially written output is left in place on failure.
pub fn trim_clip(request: &ClipRequest, settings: &TrimSettings) -> Result<TrimWindow> {
    let fps = resolve_frame_rate(request, settings);
    let window = TrimWindow::new(request.start_frame, request.frame_count, fps)?;

    #[cfg(feature = "tracing")]
    tracing::info!(
        "Trimming {} frames {}-{} ({}s +{}s) -> {}",
        request.input.display(),
        window.start_frame,
        window.end_frame(),
        window.start_arg(),
        window.duration_arg(),
        request.output.display()
    );

    build_trim_command(request, &window, settings).execute()?;

    Ok(window)
}
