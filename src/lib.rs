// src/lib.rs

//! Splits a composite Wavefront OBJ document holding several chess pieces
//! into one `<name>.obj` file per piece.
//!
//! Pieces are delimited by marker lines: a line containing `object` opens a
//! piece named after its third space-separated field, a line containing
//! `END` stops the pass. Lines with `#` and no `object` are dropped.
//!
//! ```no_run
//! use objsplit::{ChessSplitter, SplitConfig};
//!
//! let config = SplitConfig::new("assets/chess_pieces.obj", "assets/chess");
//! let report = ChessSplitter::new(config).run()?;
//! println!("wrote {} pieces", report.segments.len());
//! # Ok::<(), objsplit::SplitError>(())
//! ```

pub mod error;
pub mod parser;
pub mod splitter;
pub mod structs_and_impls;
pub mod writer;

pub use error::{SplitError, SplitResult};
pub use parser::obj::segmenter::{parse_marker_name, segment_text, ObjSegmenter, SegmenterState};
pub use splitter::{split_file, ChessSplitter};
pub use structs_and_impls::{
    LineKind, MarkerPolicy, Segment, SegmentSummary, SegmenterStats, SplitConfig, SplitReport,
    TrailingPolicy,
};
pub use writer::obj_writer::ObjWriter;
