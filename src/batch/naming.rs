//! Output file naming.

/// Default prefix for trimmed clip file names.
pub const DEFAULT_PREFIX: &str = "FRAME_TRIM_";

/// Derive the output file name for one camera's clip.
///
/// The first trim set keeps the source name; later ones get `_clip<N>`
/// inserted before the last extension:
///
/// ```
/// use frametrim::batch::output_file_name;
///
/// assert_eq!(output_file_name("FRAME_TRIM_", "video.mp4", 1), "FRAME_TRIM_video.mp4");
/// assert_eq!(output_file_name("FRAME_TRIM_", "video.mp4", 2), "FRAME_TRIM_video_clip2.mp4");
/// ```
///
/// A name without an extension gets the suffix appended.
pub fn output_file_name(prefix: &str, file_name: &str, trim_index: u32) -> String {
    if trim_index <= 1 {
        return format!("{}{}", prefix, file_name);
    }

    match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}{}_clip{}.{}", prefix, stem, trim_index, ext),
        None => format!("{}{}_clip{}", prefix, file_name, trim_index),
    }
}
