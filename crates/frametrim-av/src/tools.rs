//! External tool detection.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default executable name of the transcoder.
pub const FFMPEG: &str = "ffmpeg";

/// Default executable name of the media inspector.
pub const FFPROBE: &str = "ffprobe";

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// `program` may be a bare name looked up on `PATH` or an explicit path.
/// The ffmpeg family prints its version with `-version`.
///
/// # Example
///
/// ```no_run
/// use frametrim_av::check_tool;
///
/// let info = check_tool("ffprobe", "ffprobe");
/// if info.available {
///     println!("ffprobe version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str, program: impl AsRef<Path>) -> ToolInfo {
    let program = program.as_ref();
    let result = Command::new(program).arg("-version").output();

    match result {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string());

            let path = which::which(program).ok();

            ToolInfo {
                name: name.to_string(),
                available: true,
                version,
                path,
            }
        }
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Check ffmpeg and ffprobe, honoring configured paths.
pub fn check_tools(ffmpeg: Option<&Path>, ffprobe: Option<&Path>) -> Vec<ToolInfo> {
    vec![
        check_tool(FFMPEG, ffmpeg.unwrap_or_else(|| Path::new(FFMPEG))),
        check_tool(FFPROBE, ffprobe.unwrap_or_else(|| Path::new(FFPROBE))),
    ]
}

/// Require that a tool is available, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
///
/// A configured path that does not exist is returned as-is so the eventual
/// spawn reports it as missing under the name the user configured.
pub fn tool_path(name: &str, config_path: Option<&Path>) -> PathBuf {
    match config_path {
        Some(path) => path.to_path_buf(),
        None => require_tool(name).unwrap_or_else(|_| PathBuf::from(name)),
    }
}
