//! Batch driver: turns a manifest into clip extractions.
//!
//! Work is strictly sequential. Rows are processed in file order, trim sets
//! in column order, cameras 1 to 3. Row- and clip-level problems are logged
//! and skipped; only a missing or undecodable manifest stops the batch.

mod naming;
mod trimmer;

pub use naming::{output_file_name, DEFAULT_PREFIX};
pub use trimmer::{ClipTrimmer, FfmpegTrimmer, TrimOutcome};

use crate::manifest::{FramePair, Manifest, ManifestRow, RowEntry, MIN_COLUMNS};
use anyhow::{Context, Result};
use frametrim_av::actions::ClipRequest;
use frametrim_av::Error as AvError;
use std::path::{Path, PathBuf};

/// Output settings for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    pub output_prefix: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("trimmed"),
            output_prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Counts gathered over a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Rows with a full camera triplet.
    pub rows: usize,
    /// Rows skipped for having too few columns.
    pub rows_skipped: usize,
    pub trim_sets: usize,
    /// Frame pairs skipped because they did not parse.
    pub invalid_pairs: usize,
    pub clips_succeeded: usize,
    pub clips_failed: usize,
    /// Clips printed by a dry run without being written.
    pub clips_planned: usize,
}

impl BatchSummary {
    pub fn clips_attempted(&self) -> usize {
        self.clips_succeeded + self.clips_failed + self.clips_planned
    }
}

/// Run every clip described by a manifest.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created, the manifest
/// is missing, or a record cannot be decoded. Failures of individual rows
/// or clips are counted in the summary instead.
pub fn run_batch<T: ClipTrimmer>(
    manifest_path: &Path,
    options: &BatchOptions,
    trimmer: &mut T,
) -> Result<BatchSummary> {
    if !options.output_dir.exists() {
        std::fs::create_dir_all(&options.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                options.output_dir.display()
            )
        })?;
        println!(
            "Created output directory: {}\n",
            options.output_dir.display()
        );
    }

    let mut manifest = Manifest::open(manifest_path)?;

    println!("--- Starting Batch Process ---");
    println!("Header: {:?}\n", manifest.header());

    let mut summary = BatchSummary::default();

    for entry in manifest.rows() {
        match entry? {
            RowEntry::Blank { .. } => {}
            RowEntry::TooShort { row_num, columns } => {
                tracing::warn!(
                    "Row {} has {} columns, fewer than {}. Skipping.",
                    row_num,
                    columns,
                    MIN_COLUMNS
                );
                summary.rows_skipped += 1;
            }
            RowEntry::Row(row) => {
                summary.rows += 1;
                process_row(&row, options, trimmer, &mut summary);
            }
        }
    }

    Ok(summary)
}

fn process_row<T: ClipTrimmer>(
    row: &ManifestRow,
    options: &BatchOptions,
    trimmer: &mut T,
    summary: &mut BatchSummary,
) {
    let inputs = row.cameras.each_ref().map(|cam| cam.input_path());

    // Cameras are synchronized but may still be set to different rates.
    let rates = inputs.each_ref().map(|input| trimmer.probe_fps(input));

    for pair in &row.pairs {
        let trim = match pair {
            FramePair::Trim(trim) => trim,
            FramePair::Invalid {
                column,
                start,
                count,
            } => {
                tracing::warn!(
                    "Row {}, columns {}-{}: Invalid frame numbers ({:?}, {:?}). Skipping.",
                    row.row_num,
                    column,
                    column + 1,
                    start,
                    count
                );
                summary.invalid_pairs += 1;
                continue;
            }
        };

        summary.trim_sets += 1;

        let names: Vec<String> = row.cameras.iter().map(|c| c.display_name()).collect();
        println!("\n{}", "=".repeat(70));
        println!(
            "Row {}, Trim Set {}: {}",
            row.row_num,
            trim.index,
            names.join(" & ")
        );
        println!("{}", "=".repeat(70));

        for ((camera, input), fps) in row.cameras.iter().zip(&inputs).zip(rates) {
            let output_name =
                output_file_name(&options.output_prefix, &camera.file_name, trim.index);
            let request = ClipRequest {
                input: input.clone(),
                start_frame: trim.start_frame,
                frame_count: trim.frame_count,
                fps,
                output: options.output_dir.join(output_name),
            };

            match trimmer.trim(&request) {
                Ok(TrimOutcome::Trimmed) => {
                    println!("  ✓ SUCCESS: Trimmed video saved");
                    summary.clips_succeeded += 1;
                }
                Ok(TrimOutcome::Planned) => summary.clips_planned += 1,
                Err(e) => {
                    report_clip_failure(&request, &e);
                    summary.clips_failed += 1;
                }
            }
        }
    }
}

fn report_clip_failure(request: &ClipRequest, err: &AvError) {
    match err {
        AvError::ToolNotFound { tool } => {
            println!(
                "  ✗ ERROR: FFmpeg not found at '{}'. Check tools.ffmpeg_path in your config.",
                tool
            );
        }
        AvError::ToolFailed { message, .. } => {
            println!("  ✗ ERROR: Failed to process {}", request.input.display());
            println!("  FFmpeg output:\n{}", message);
        }
        other => {
            println!("  ✗ ERROR: Failed to process {}", request.input.display());
            println!("  {}", other);
        }
    }
    tracing::debug!("Clip {:?} failed: {}", request.output, err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(Default)]
    struct RecordingTrimmer {
        probed: Vec<PathBuf>,
        requests: Vec<ClipRequest>,
        fail_inputs: Vec<PathBuf>,
        rates: Vec<(PathBuf, f64)>,
        plan_only: bool,
    }

    impl ClipTrimmer for RecordingTrimmer {
        fn probe_fps(&mut self, input: &Path) -> Option<f64> {
            self.probed.push(input.to_path_buf());
            self.rates
                .iter()
                .find(|(p, _)| p == input)
                .map(|(_, fps)| *fps)
        }

        fn trim(&mut self, request: &ClipRequest) -> frametrim_av::Result<TrimOutcome> {
            self.requests.push(request.clone());
            if self.fail_inputs.contains(&request.input) {
                return Err(AvError::tool_failed("ffmpeg", "exited with status 1: boom"));
            }
            if self.plan_only {
                return Ok(TrimOutcome::Planned);
            }
            Ok(TrimOutcome::Trimmed)
        }
    }

    fn write_manifest(dir: &Path, rows: &[&str]) -> PathBuf {
        let path = dir.join("trim_list.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "Cam 1 File Location,Camera 1 Input File,Cam 2 File Location,Camera 2 Input File,Cam 3 File Location,Camera 3 Input File,Start Frame,Frame Count").unwrap();
        for row in rows {
            writeln!(f, "{}", row).unwrap();
        }
        path
    }

    fn options(dir: &Path) -> BatchOptions {
        BatchOptions {
            output_dir: dir.join("out"),
            ..BatchOptions::default()
        }
    }

    #[test]
    fn test_two_rows_produce_nine_clips_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(
            dir.path(),
            &[
                "/a/,a1.mp4,/b/,b1.mp4,/c/,c1.mp4,0,30",
                "/a/,a2.mp4,/b/,b2.mp4,/c/,c2.mp4,10,20,100,50",
            ],
        );
        let opts = options(dir.path());
        let mut trimmer = RecordingTrimmer::default();

        let summary = run_batch(&manifest, &opts, &mut trimmer).unwrap();

        let got: Vec<(String, u64, String)> = trimmer
            .requests
            .iter()
            .map(|r| {
                (
                    r.input.display().to_string(),
                    r.start_frame,
                    r.output.file_name().unwrap().to_string_lossy().to_string(),
                )
            })
            .collect();
        let expect: Vec<(String, u64, String)> = [
            ("/a/a1.mp4", 0, "FRAME_TRIM_a1.mp4"),
            ("/b/b1.mp4", 0, "FRAME_TRIM_b1.mp4"),
            ("/c/c1.mp4", 0, "FRAME_TRIM_c1.mp4"),
            ("/a/a2.mp4", 10, "FRAME_TRIM_a2.mp4"),
            ("/b/b2.mp4", 10, "FRAME_TRIM_b2.mp4"),
            ("/c/c2.mp4", 10, "FRAME_TRIM_c2.mp4"),
            ("/a/a2.mp4", 100, "FRAME_TRIM_a2_clip2.mp4"),
            ("/b/b2.mp4", 100, "FRAME_TRIM_b2_clip2.mp4"),
            ("/c/c2.mp4", 100, "FRAME_TRIM_c2_clip2.mp4"),
        ]
        .iter()
        .map(|&(i, s, o)| (i.to_string(), s, o.to_string()))
        .collect();
        assert_eq!(got, expect);

        assert_eq!(summary.rows, 2);
        assert_eq!(summary.trim_sets, 3);
        assert_eq!(summary.clips_succeeded, 9);
        assert!(opts.output_dir.is_dir());
        assert_eq!(trimmer.requests[0].output.parent(), Some(opts.output_dir.as_path()));
    }

    #[test]
    fn test_short_row_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(dir.path(), &["/a/,a.mp4,/b/,b.mp4,/c/,c.mp4,0"]);
        let mut trimmer = RecordingTrimmer::default();

        let summary = run_batch(&manifest, &options(dir.path()), &mut trimmer).unwrap();

        assert!(trimmer.requests.is_empty());
        assert!(trimmer.probed.is_empty());
        assert_eq!(summary.rows_skipped, 1);
        assert_eq!(summary.rows, 0);
    }

    #[test]
    fn test_failure_on_one_camera_continues() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(
            dir.path(),
            &[
                "/a/,a1.mp4,/b/,b1.mp4,/c/,c1.mp4,0,30",
                "/a/,a2.mp4,/b/,b2.mp4,/c/,c2.mp4,0,30",
            ],
        );
        let mut trimmer = RecordingTrimmer {
            fail_inputs: vec![PathBuf::from("/b/b1.mp4")],
            ..RecordingTrimmer::default()
        };

        let summary = run_batch(&manifest, &options(dir.path()), &mut trimmer).unwrap();

        assert_eq!(trimmer.requests.len(), 6);
        assert_eq!(trimmer.requests[2].input, PathBuf::from("/c/c1.mp4"));
        assert_eq!(summary.clips_failed, 1);
        assert_eq!(summary.clips_succeeded, 5);
    }

    #[test]
    fn test_rates_probed_per_camera() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(dir.path(), &["/a/,a.mp4,/b/,b.mp4,/c/,c.mp4,0,30,60,30"]);
        let mut trimmer = RecordingTrimmer {
            rates: vec![
                (PathBuf::from("/a/a.mp4"), 60.0),
                (PathBuf::from("/c/c.mp4"), 59.94),
            ],
            ..RecordingTrimmer::default()
        };

        run_batch(&manifest, &options(dir.path()), &mut trimmer).unwrap();

        // Probed once per row, not once per trim set.
        assert_eq!(trimmer.probed.len(), 3);
        let rates: Vec<Option<f64>> = trimmer.requests.iter().map(|r| r.fps).collect();
        assert_eq!(
            rates,
            [Some(60.0), None, Some(59.94), Some(60.0), None, Some(59.94)]
        );
    }

    #[test]
    fn test_invalid_pair_skipped_without_consuming_index() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(
            dir.path(),
            &["/a/,a.mp4,/b/,b.mp4,/c/,c.mp4,abc,10,,,40,20"],
        );
        let mut trimmer = RecordingTrimmer::default();

        let summary = run_batch(&manifest, &options(dir.path()), &mut trimmer).unwrap();

        assert_eq!(summary.invalid_pairs, 1);
        assert_eq!(trimmer.requests.len(), 3);
        assert_eq!(trimmer.requests[0].start_frame, 40);
        assert_eq!(
            trimmer.requests[0].output.file_name().unwrap(),
            "FRAME_TRIM_a.mp4"
        );
    }

    #[test]
    fn test_blank_rows_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(
            dir.path(),
            &["", ",,,,,,,", "/a/,a.mp4,/b/,b.mp4,/c/,c.mp4,0,1"],
        );
        let mut trimmer = RecordingTrimmer::default();

        let summary = run_batch(&manifest, &options(dir.path()), &mut trimmer).unwrap();

        assert_eq!(summary.rows, 1);
        assert_eq!(summary.rows_skipped, 0);
        assert_eq!(trimmer.requests.len(), 3);
    }

    #[test]
    fn test_planned_clips_are_not_counted_as_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(dir.path(), &["/a/,a.mp4,/b/,b.mp4,/c/,c.mp4,0,30"]);
        let mut trimmer = RecordingTrimmer {
            plan_only: true,
            ..RecordingTrimmer::default()
        };

        let summary = run_batch(&manifest, &options(dir.path()), &mut trimmer).unwrap();

        assert_eq!(summary.clips_planned, 3);
        assert_eq!(summary.clips_succeeded, 0);
        assert_eq!(summary.clips_attempted(), 3);
    }

    #[test]
    fn test_overflowing_frame_range_does_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(
            dir.path(),
            &[
                "/a/,a1.mp4,/b/,b1.mp4,/c/,c1.mp4,18446744073709551615,10",
                "/a/,a2.mp4,/b/,b2.mp4,/c/,c2.mp4,0,30",
            ],
        );
        let mut trimmer = RecordingTrimmer::default();

        let summary = run_batch(&manifest, &options(dir.path()), &mut trimmer).unwrap();

        assert_eq!(summary.invalid_pairs, 1);
        assert_eq!(summary.rows, 2);
        assert_eq!(trimmer.requests.len(), 3);
        assert_eq!(trimmer.requests[0].input, PathBuf::from("/a/a2.mp4"));
    }

    #[test]
    fn test_undecodable_record_stops_batch() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(dir.path(), &["/a/,a1.mp4,/b/,b1.mp4,/c/,c1.mp4,0,30"]);
        {
            let mut f = std::fs::OpenOptions::new()
                .append(true)
                .open(&manifest)
                .unwrap();
            f.write_all(b"/a/,bad\xff\xfe.mp4,/b/,b2.mp4,/c/,c2.mp4,0,30\n")
                .unwrap();
            writeln!(f, "/a/,a3.mp4,/b/,b3.mp4,/c/,c3.mp4,0,30").unwrap();
        }
        let mut trimmer = RecordingTrimmer::default();

        let err = run_batch(&manifest, &options(dir.path()), &mut trimmer).unwrap_err();

        assert!(
            format!("{:#}", err).contains("CSV parsing error"),
            "unexpected error: {err:#}"
        );
        assert_eq!(trimmer.requests.len(), 3);
        assert!(trimmer
            .requests
            .iter()
            .all(|r| r.input.to_string_lossy().ends_with("1.mp4")));
    }

    #[test]
    fn test_missing_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut trimmer = RecordingTrimmer::default();

        let err = run_batch(
            &dir.path().join("missing.csv"),
            &options(dir.path()),
            &mut trimmer,
        )
        .unwrap_err();

        assert!(err.to_string().contains("not found"));
        assert!(trimmer.requests.is_empty());
    }
}
