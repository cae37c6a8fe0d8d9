//! # frametrim-av
//!
//! Frame-rate probing and frame-accurate clip extraction for video files,
//! built on the ffprobe and ffmpeg command-line tools.
//!
//! ## Features
//!
//! - `trim` (default) - Clip extraction using ffmpeg
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use frametrim_av::actions::{trim_clip, ClipRequest, TrimSettings};
//!
//! let request = ClipRequest {
//!     input: "/captures/cam1/take3.mp4".into(),
//!     start_frame: 60,
//!     frame_count: 90,
//!     fps: None,
//!     output: "/trimmed/FRAME_TRIM_take3.mp4".into(),
//! };
//! let window = trim_clip(&request, &TrimSettings::default())?;
//! println!("Cut {:.6}s from {:.6}s", window.duration, window.start_time);
//! # Ok::<(), frametrim_av::Error>(())
//! ```

mod command;
mod error;
pub mod probe;
pub mod tools;

#[cfg(feature = "trim")]
pub mod actions;

// Re-exports
pub use command::{ToolCommand, ToolOutput};
pub use error::{Error, Result};
pub use probe::{parse_frac, probe_frame_rate, FrameRate, FrameRateSource, DEFAULT_FPS};
pub use tools::{check_tool, check_tools, require_tool, tool_path, ToolInfo};
