// src/structs_and_impls.rs

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Default location of the composite document, relative to the working directory.
pub const DEFAULT_INPUT_PATH: &str = "assets/chess_pieces.obj";
/// Default directory receiving one `.obj` file per piece.
pub const DEFAULT_OUTPUT_DIR: &str = "assets/chess";
/// Extension given to every segment file.
pub const SEGMENT_EXTENSION: &str = "obj";

const OBJECT_TOKEN: &str = "object";
const END_TOKEN: &str = "END";
const COMMENT_TOKEN: char = '#';

/// What a single input line means to the segmenter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Comment,      // contains `#` but not `object`; dropped everywhere
    ObjectMarker, // opens a new named segment
    End,          // flushes and stops the pass
    Geometry,     // anything else, kept verbatim
}

impl LineKind {
    /// Classifies a raw line by substring tests.
    ///
    /// `END` is checked before `object`, so a line carrying both stops the pass.
    pub fn classify(line: &str) -> LineKind {
        if line.contains(COMMENT_TOKEN) && !line.contains(OBJECT_TOKEN) {
            LineKind::Comment                           // `# object <name>` falls through to a marker
        } else if line.contains(END_TOKEN) {
            LineKind::End
        } else if line.contains(OBJECT_TOKEN) {
            LineKind::ObjectMarker
        } else {
            LineKind::Geometry
        }
    }
}

/// Whether the `object` marker line is stored in the segment it opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerPolicy {
    #[default]
    Exclude,
    Include,
}

/// What happens to a segment still open when the input runs out without `END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingPolicy {
    #[default]
    Flush,
    Discard,
}

/// One named piece, ready to be flushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,       // third field of the marker line
    pub marker_line: usize, // 1-based line number of the opening marker
    pub lines: Vec<String>, // collected lines, verbatim
}

impl Segment {
    pub fn new(name: impl Into<String>, marker_line: usize) -> Self {
        Segment {
            name: name.into(),
            marker_line,
            lines: Vec::new(),
        }
    }

    /// File contents: the lines joined by `\n`, no trailing newline added.
    pub fn content(&self) -> String {
        self.lines.join("\n")                          // no trailing newline, as the lines were read
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, SEGMENT_EXTENSION)
    }
}

/// Everything a split run needs. No global state is consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub marker_policy: MarkerPolicy,
    pub trailing_policy: TrailingPolicy,
    pub dry_run: bool, // run the pass and report, touch nothing on disk
}

impl SplitConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        SplitConfig {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            marker_policy: MarkerPolicy::default(),
            trailing_policy: TrailingPolicy::default(),
            dry_run: false,
        }
    }

    pub fn with_marker_policy(mut self, policy: MarkerPolicy) -> Self {
        self.marker_policy = policy;
        self
    }

    pub fn with_trailing_policy(mut self, policy: TrailingPolicy) -> Self {
        self.trailing_policy = policy;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig::new(DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_DIR)
    }
}

/// Record of one flushed segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentSummary {
    pub name: String,
    pub path: PathBuf,      // file written (or that would be written on a dry run)
    pub marker_line: usize,
    pub line_count: usize,
    pub bytes: usize,
}

impl SegmentSummary {
    pub fn describe(segment: &Segment, output_dir: &Path) -> Self {
        SegmentSummary {
            name: segment.name.clone(),
            path: output_dir.join(segment.file_name()),    // <output_dir>/<name>.obj
            marker_line: segment.marker_line,
            line_count: segment.lines.len(),
            bytes: segment.content().len(),                // size of the written file
        }
    }
}

/// Line accounting kept by the segmenter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SegmenterStats {
    pub lines_read: usize,
    pub comments_dropped: usize,
    pub orphan_lines: usize,      // geometry before the first marker
    pub lines_after_end: usize,   // ignored once `END` was seen
    pub discarded_trailing: usize, // lines of an unflushed trailing segment
    pub ended_by_marker: bool,
}

/// Outcome of a whole run, printed by the command line tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub marker_policy: MarkerPolicy,
    pub trailing_policy: TrailingPolicy,
    pub dry_run: bool,
    pub segments: Vec<SegmentSummary>,
    #[serde(flatten)]
    pub stats: SegmenterStats,
}

impl SplitReport {
    pub fn segment_names(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.name.as_str()).collect()
    }

    /// Total bytes across all flushed segments.
    pub fn total_bytes(&self) -> usize {
        self.segments.iter().map(|s| s.bytes).sum()
    }
}
