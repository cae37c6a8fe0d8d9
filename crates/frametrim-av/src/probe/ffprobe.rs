//! ffprobe-based frame-rate detection.

use super::types::{FrameRate, FrameRateSource};
use super::{parse_frac, usable};
use crate::{Error, Result, ToolCommand};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeStream {
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    // ffprobe reports these as strings, but numbers are accepted too.
    nb_frames: Option<Value>,
    duration: Option<Value>,
    duration_ts: Option<Value>,
}

/// Probe a file's frame rate, returning any error encountered.
///
/// `Ok(None)` means ffprobe ran but the file has no video stream or no
/// usable rate fields.
pub fn try_probe_frame_rate_with(ffprobe: &Path, path: &Path) -> Result<Option<FrameRate>> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }

    let output = ToolCommand::new(ffprobe)
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-select_streams",
            "v:0",
        ])
        .arg(path)
        .execute()?;

    let probe: FfprobeOutput = serde_json::from_str(&output.stdout)?;

    let Some(stream) = probe.streams.first() else {
        return Ok(None);
    };

    Ok(frame_rate_from_stream(stream))
}

/// Probe a file's frame rate with the given ffprobe executable.
///
/// Errors are logged as warnings and reported as `None`.
pub fn probe_frame_rate_with(ffprobe: &Path, path: &Path) -> Option<f64> {
    match try_probe_frame_rate_with(ffprobe, path) {
        Ok(rate) => rate.map(|r| {
            #[cfg(feature = "tracing")]
            tracing::debug!("{}: {:.3} fps from {}", path.display(), r.fps, r.source);
            r.fps
        }),
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("Could not detect FPS for {}: {}", path.display(), _e);
            None
        }
    }
}

fn frame_rate_from_stream(stream: &FfprobeStream) -> Option<FrameRate> {
    let candidates = [
        (&stream.avg_frame_rate, FrameRateSource::AverageFrameRate),
        (&stream.r_frame_rate, FrameRateSource::RealFrameRate),
    ];

    for (field, source) in candidates {
        if let Some(fps) = usable(field.as_deref().and_then(parse_frac)) {
            return Some(FrameRate { fps, source });
        }
    }

    let nb_frames = stream.nb_frames.as_ref().and_then(number)?;
    let duration = stream
        .duration
        .as_ref()
        .filter(|v| !is_blank(v))
        .or(stream.duration_ts.as_ref())
        .and_then(number)?;

    if duration == 0.0 {
        return None;
    }

    usable(Some(nb_frames / duration)).map(|fps| FrameRate {
        fps,
        source: FrameRateSource::FrameCount,
    })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(json: &str) -> FfprobeStream {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_prefers_avg_frame_rate() {
        let s = stream(r#"{"avg_frame_rate": "60/1", "r_frame_rate": "30/1"}"#);
        let rate = frame_rate_from_stream(&s).unwrap();
        assert_eq!(rate.fps, 60.0);
        assert_eq!(rate.source, FrameRateSource::AverageFrameRate);
    }

    #[test]
    fn test_falls_back_to_r_frame_rate() {
        let s = stream(r#"{"avg_frame_rate": "0/0", "r_frame_rate": "30000/1001"}"#);
        let rate = frame_rate_from_stream(&s).unwrap();
        assert!((rate.fps - 29.97).abs() < 0.001);
        assert_eq!(rate.source, FrameRateSource::RealFrameRate);

        let s = stream(r#"{"r_frame_rate": "25/1"}"#);
        assert_eq!(frame_rate_from_stream(&s).unwrap().fps, 25.0);
    }

    #[test]
    fn test_falls_back_to_frame_count() {
        let s = stream(
            r#"{"avg_frame_rate": "0/0", "r_frame_rate": "garbage",
                "nb_frames": "300", "duration": "10.000000"}"#,
        );
        let rate = frame_rate_from_stream(&s).unwrap();
        assert_eq!(rate.fps, 30.0);
        assert_eq!(rate.source, FrameRateSource::FrameCount);
    }

    #[test]
    fn test_frame_count_uses_duration_ts_when_duration_missing() {
        let s = stream(r#"{"nb_frames": "300", "duration_ts": 10}"#);
        assert_eq!(frame_rate_from_stream(&s).unwrap().fps, 30.0);
    }

    #[test]
    fn test_negative_rate_is_not_usable() {
        let s = stream(r#"{"avg_frame_rate": "-30/1", "r_frame_rate": "24/1"}"#);
        assert_eq!(frame_rate_from_stream(&s).unwrap().fps, 24.0);
    }

    #[test]
    fn test_zero_duration_is_absent() {
        let s = stream(r#"{"avg_frame_rate": "0/0", "nb_frames": "300", "duration": "0"}"#);
        assert!(frame_rate_from_stream(&s).is_none());
    }

    #[test]
    fn test_nothing_usable_is_absent() {
        assert!(frame_rate_from_stream(&FfprobeStream::default()).is_none());
        let s = stream(r#"{"avg_frame_rate": "0/0", "r_frame_rate": "0/0", "nb_frames": "300"}"#);
        assert!(frame_rate_from_stream(&s).is_none());
    }

    #[test]
    fn test_output_without_streams() {
        let out: FfprobeOutput = serde_json::from_str("{}").unwrap();
        assert!(out.streams.is_empty());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = try_probe_frame_rate_with(Path::new("ffprobe"), Path::new("/nonexistent/cam1.mp4"))
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
        assert_eq!(
            probe_frame_rate_with(Path::new("ffprobe"), Path::new("/nonexistent/cam1.mp4")),
            None
        );
    }
}
