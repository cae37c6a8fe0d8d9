//! Frame-rate result types.

use std::fmt;

/// Which ffprobe field a frame rate was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRateSource {
    /// `avg_frame_rate`
    AverageFrameRate,
    /// `r_frame_rate`
    RealFrameRate,
    /// `nb_frames` divided by the stream duration
    FrameCount,
}

impl fmt::Display for FrameRateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FrameRateSource::AverageFrameRate => "avg_frame_rate",
            FrameRateSource::RealFrameRate => "r_frame_rate",
            FrameRateSource::FrameCount => "nb_frames/duration",
        };
        f.write_str(s)
    }
}

/// A detected frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRate {
    /// Frames per second, always finite and positive.
    pub fps: f64,
    /// Field the rate was read from.
    pub source: FrameRateSource,
}
