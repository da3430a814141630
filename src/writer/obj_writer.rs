// src/writer/obj_writer.rs

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{SplitError, SplitResult};
use crate::structs_and_impls::*;

/// Writes flushed segments as `<output_dir>/<name>.obj`.
///
/// Files are plain overwrites. There is no atomic rename or backup.
#[derive(Debug)]
pub struct ObjWriter {
    output_dir: PathBuf,
    dry_run: bool,
    written: Vec<String>, // names flushed so far, to spot duplicates
}

impl ObjWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        ObjWriter {
            output_dir: output_dir.into(),
            dry_run: false,
            written: Vec::new(),
        }
    }

    /// A writer that reports what it would write without touching the disk.
    pub fn dry_run(output_dir: impl Into<PathBuf>) -> Self {
        ObjWriter {
            dry_run: true,
            ..ObjWriter::new(output_dir)
        }
    }

    /// Creates the output directory and any missing parents.
    pub fn prepare(&self) -> SplitResult<()> {
        if self.dry_run {                               // a dry run never creates the directory
            return Ok(());
        }
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| SplitError::output(&self.output_dir, e))
    }

    pub fn write_segment(&mut self, segment: &Segment) -> SplitResult<SegmentSummary> {
        let summary = SegmentSummary::describe(segment, &self.output_dir);    // <output_dir>/<name>.obj

        if self.written.iter().any(|name| name == &segment.name) {
            warn!(name = %segment.name, "duplicate segment name, overwriting earlier file");
        }
        self.written.push(segment.name.clone());

        if self.dry_run {
            info!(path = %summary.path.display(), lines = summary.line_count, "would write segment");
            return Ok(summary);
        }

        fs::write(&summary.path, segment.content())     // plain overwrite, no temp file
            .map_err(|e| SplitError::output(&summary.path, e))?;
        info!(path = %summary.path.display(), lines = summary.line_count, bytes = summary.bytes, "wrote segment");

        Ok(summary)
    }
}
