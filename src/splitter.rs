// src/splitter.rs

//! Drives one split run: read, segment, flush, report.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{SplitError, SplitResult};
use crate::parser::obj::segmenter::ObjSegmenter;
use crate::structs_and_impls::*;
use crate::writer::obj_writer::ObjWriter;

/// Splits a composite chess-piece document into one OBJ file per piece.
#[derive(Debug, Clone)]
pub struct ChessSplitter {
    config: SplitConfig,
}

impl ChessSplitter {
    pub fn new(config: SplitConfig) -> Self {
        ChessSplitter { config }
    }

    /// Runs the pass. Segments are written as soon as they close, so an error
    /// part way through leaves the earlier files in place.
    pub fn run(&self) -> SplitResult<SplitReport> {
        let config = &self.config;
        info!(
            input = %config.input_path.display(),
            output = %config.output_dir.display(),
            dry_run = config.dry_run,
            "splitting document"
        );

        let text = fs::read_to_string(&config.input_path)
            .map_err(|e| SplitError::input(&config.input_path, e))?;    // whole document in memory
        debug!(bytes = text.len(), "input loaded");

        let mut writer = if config.dry_run {
            ObjWriter::dry_run(&config.output_dir)
        } else {
            ObjWriter::new(&config.output_dir)
        };
        writer.prepare()?;                                  // creates the output directory

        let mut segments = Vec::new();
        let stats = ObjSegmenter::new(config.marker_policy, config.trailing_policy)
            .segment_document(&text, |segment| {
                segments.push(writer.write_segment(&segment)?);    // flushed as soon as it closes
                Ok(())
            })?;

        let report = SplitReport {
            input_path: config.input_path.clone(),
            output_dir: config.output_dir.clone(),
            marker_policy: config.marker_policy,
            trailing_policy: config.trailing_policy,
            dry_run: config.dry_run,
            segments,
            stats,
        };
        info!(
            segments = report.segments.len(),
            comments_dropped = report.stats.comments_dropped,
            ended_by_marker = report.stats.ended_by_marker,
            "split complete"
        );
        Ok(report)
    }
}

/// Splits `input` into `output_dir` with the default policies.
pub fn split_file(input: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> SplitResult<SplitReport> {
    let config = SplitConfig::new(input.as_ref(), output_dir.as_ref());
    ChessSplitter::new(config).run()
}
