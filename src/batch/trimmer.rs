//! The clip-extraction seam used by the batch driver.

use frametrim_av::actions::{
    build_trim_command, resolve_frame_rate, trim_clip, ClipRequest, TrimSettings, TrimWindow,
};
use frametrim_av::probe::probe_frame_rate_with;
use std::path::Path;

/// What happened to a clip that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimOutcome {
    /// ffmpeg ran and wrote the output file.
    Trimmed,
    /// The command was printed but not run.
    Planned,
}

/// Performs frame-rate lookups and clip extraction for the batch driver.
pub trait ClipTrimmer {
    /// Detect the frame rate of an input file, `None` if unknown.
    fn probe_fps(&mut self, input: &Path) -> Option<f64>;

    /// Produce one clip. Errors are reported per clip and never abort the batch.
    fn trim(&mut self, request: &ClipRequest) -> frametrim_av::Result<TrimOutcome>;
}

/// [`ClipTrimmer`] backed by the ffprobe and ffmpeg executables.
pub struct FfmpegTrimmer {
    settings: TrimSettings,
    dry_run: bool,
}

impl FfmpegTrimmer {
    pub fn new(settings: TrimSettings) -> Self {
        Self {
            settings,
            dry_run: false,
        }
    }

    /// Print each ffmpeg command instead of running it.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl ClipTrimmer for FfmpegTrimmer {
    fn probe_fps(&mut self, input: &Path) -> Option<f64> {
        probe_frame_rate_with(&self.settings.ffprobe, input)
    }

    fn trim(&mut self, request: &ClipRequest) -> frametrim_av::Result<TrimOutcome> {
        let fps = resolve_frame_rate(request, &self.settings);
        let window = TrimWindow::new(request.start_frame, request.frame_count, fps)?;

        print_plan(request, &window);

        if self.dry_run {
            let cmd = build_trim_command(request, &window, &self.settings);
            println!("  [DRY RUN] {}", cmd.display());
            return Ok(TrimOutcome::Planned);
        }

        let resolved = ClipRequest {
            fps: Some(fps),
            ..request.clone()
        };
        trim_clip(&resolved, &self.settings)?;
        Ok(TrimOutcome::Trimmed)
    }
}

fn print_plan(request: &ClipRequest, window: &TrimWindow) {
    let name = request
        .input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| request.input.display().to_string());

    println!("\nProcessing: {}", name);
    println!(
        "  Frames {}-{} ({} frames)",
        window.start_frame,
        window.end_frame(),
        window.frame_count
    );
    println!(
        "  Time range: {:.6}s to {:.6}s (FPS: {})",
        window.start_time,
        window.end_time(),
        window.fps
    );
    println!("  Output: {}", request.output.display());
}
