//! Frame-rate probing.
//!
//! Frame rates come from ffprobe's JSON stream report for the first video
//! stream. Fields are tried in order of reliability:
//!
//! 1. `avg_frame_rate`
//! 2. `r_frame_rate`
//! 3. `nb_frames / duration` (falling back to `duration_ts` for the duration)
//!
//! A value that is `0/0`, has a zero denominator, or is not a finite positive
//! number is treated as unusable and the next field is tried.

mod ffprobe;
mod types;

pub use ffprobe::{probe_frame_rate_with, try_probe_frame_rate_with};
pub use types::{FrameRate, FrameRateSource};

use crate::tools::FFPROBE;
use std::path::Path;

/// Frame rate assumed when a file's rate cannot be detected.
pub const DEFAULT_FPS: f64 = 30.0;

/// Probe a file's frame rate using `ffprobe` from `PATH`.
///
/// Returns `None` when no usable rate could be determined; failures are
/// logged as warnings rather than returned.
pub fn probe_frame_rate(path: &Path) -> Option<f64> {
    probe_frame_rate_with(Path::new(FFPROBE), path)
}

/// Parse a rate string such as `"30000/1001"` or `"29.97"`.
///
/// Returns `None` for empty strings, `"0/0"`, zero denominators and
/// anything that does not parse to a finite number. The sign is not
/// checked here; callers reject non-positive rates.
pub fn parse_frac(frac: &str) -> Option<f64> {
    let frac = frac.trim();
    if frac.is_empty() || frac == "0/0" {
        return None;
    }

    let value = match frac.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => frac.parse().ok()?,
    };

    value.is_finite().then_some(value)
}

/// Returns `Some(value)` only for finite, strictly positive rates.
pub(crate) fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}
