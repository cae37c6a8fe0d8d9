//! Trim manifest parsing.
//!
//! A manifest is a CSV file whose first row is a header. Each data row names
//! one camera triplet followed by any number of `(start_frame, frame_count)`
//! pairs:
//!
//! ```text
//! cam1_folder,cam1_file,cam2_folder,cam2_file,cam3_folder,cam3_file,start,count[,start,count...]
//! ```
//!
//! Rows may have different column counts.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Number of cameras recorded per capture session.
pub const CAMERA_COUNT: usize = 3;

/// Columns holding camera folders and file names.
pub const CAMERA_COLUMNS: usize = CAMERA_COUNT * 2;

/// Smallest usable row: the camera columns plus one frame pair.
pub const MIN_COLUMNS: usize = CAMERA_COLUMNS + 2;

/// One camera's source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Camera {
    pub folder: String,
    pub file_name: String,
}

impl Camera {
    /// Full input path.
    ///
    /// The folder column is expected to carry its own trailing separator;
    /// the two columns are concatenated as written.
    pub fn input_path(&self) -> PathBuf {
        PathBuf::from(format!("{}{}", self.folder, self.file_name))
    }

    /// File name without any directory part, for display.
    pub fn display_name(&self) -> String {
        Path::new(&self.file_name)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.file_name.clone())
    }
}

/// One clip range to cut from every camera of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimSet {
    /// 1-based position among the row's valid trim sets.
    pub index: u32,
    pub start_frame: u64,
    pub frame_count: u64,
}

/// A frame pair in a row, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramePair {
    Trim(TrimSet),
    /// A non-empty pair that did not parse as two non-negative integers.
    Invalid {
        /// 1-based column number of the start frame.
        column: usize,
        start: String,
        count: String,
    },
}

/// A parsed data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    /// Line number in the manifest, the header being line 1.
    pub row_num: u64,
    pub cameras: [Camera; CAMERA_COUNT],
    pub pairs: Vec<FramePair>,
}

impl ManifestRow {
    /// Valid trim sets in order.
    pub fn trim_sets(&self) -> impl Iterator<Item = &TrimSet> {
        self.pairs.iter().filter_map(|p| match p {
            FramePair::Trim(t) => Some(t),
            FramePair::Invalid { .. } => None,
        })
    }
}

/// Result of reading one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEntry {
    /// Every cell empty or whitespace.
    Blank { row_num: u64 },
    /// Fewer than [`MIN_COLUMNS`] columns.
    TooShort { row_num: u64, columns: usize },
    Row(ManifestRow),
}

/// Parse one record's cells into a row entry.
///
/// Empty frame pairs are dropped silently and do not consume a trim-set
/// number; invalid pairs are kept as [`FramePair::Invalid`] and do not
/// consume one either. A pair whose end frame would overflow `u64` is
/// invalid. An incomplete trailing pair is ignored.
pub fn parse_row<S: AsRef<str>>(row_num: u64, cells: &[S]) -> RowEntry {
    if cells.iter().all(|c| c.as_ref().trim().is_empty()) {
        return RowEntry::Blank { row_num };
    }

    if cells.len() < MIN_COLUMNS {
        return RowEntry::TooShort {
            row_num,
            columns: cells.len(),
        };
    }

    let cell = |i: usize| cells[i].as_ref().trim().to_string();
    let cameras = [0, 1, 2].map(|cam| Camera {
        folder: cell(cam * 2),
        file_name: cell(cam * 2 + 1),
    });

    let mut pairs = Vec::new();
    let mut index = 1;
    for i in (CAMERA_COLUMNS..cells.len()).step_by(2) {
        if i + 1 >= cells.len() {
            break;
        }

        let start = cell(i);
        let count = cell(i + 1);
        if start.is_empty() || count.is_empty() {
            continue;
        }

        match (start.parse::<u64>(), count.parse::<u64>()) {
            (Ok(start_frame), Ok(frame_count))
                if start_frame.checked_add(frame_count).is_some() =>
            {
                pairs.push(FramePair::Trim(TrimSet {
                    index,
                    start_frame,
                    frame_count,
                }));
                index += 1;
            }
            _ => pairs.push(FramePair::Invalid {
                column: i + 1,
                start,
                count,
            }),
        }
    }

    RowEntry::Row(ManifestRow {
        row_num,
        cameras,
        pairs,
    })
}

/// A manifest opened for reading.
pub struct Manifest {
    reader: csv::Reader<File>,
    header: Vec<String>,
}

impl Manifest {
    /// Open a manifest and read its header row.
    ///
    /// # Errors
    ///
    /// Fails if the file does not exist or the header cannot be decoded.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Manifest file not found: {}", path.display());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open manifest: {}", path.display()))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let header = reader
            .headers()
            .with_context(|| format!("Failed to read manifest header: {}", path.display()))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        Ok(Self { reader, header })
    }

    /// Header cells, empty for an empty file.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Iterate over data rows.
    ///
    /// Yields an error for a record that cannot be decoded; callers should
    /// stop at the first one.
    pub fn rows(&mut self) -> impl Iterator<Item = Result<RowEntry>> + '_ {
        self.reader.records().map(|record| {
            let record = record.context("CSV parsing error")?;
            let row_num = record.position().map(|p| p.line()).unwrap_or_default();
            Ok(parse_row(row_num, &record.iter().collect::<Vec<_>>()))
        })
    }
}
