// src/parser/obj/segmenter.rs

use std::mem;

use tracing::{debug, warn};

use crate::error::{SplitError, SplitResult};
use crate::structs_and_impls::*;

/// Where the segmenter is in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmenterState {
    Idle,                  // no marker seen yet
    Accumulating(Segment), // collecting lines for a named piece
    Finished,              // `END` seen, remaining input ignored
}

/// Single forward pass over the lines of a composite OBJ document.
///
/// Every call to [`ObjSegmenter::feed`] may hand back the segment that the
/// line closed; the caller is expected to flush it right away so that a later
/// failure leaves earlier pieces on disk.
#[derive(Debug)]
pub struct ObjSegmenter {
    state: SegmenterState,
    marker_policy: MarkerPolicy,
    trailing_policy: TrailingPolicy,
    stats: SegmenterStats,
}

impl ObjSegmenter {
    pub fn new(marker_policy: MarkerPolicy, trailing_policy: TrailingPolicy) -> Self {
        ObjSegmenter {
            state: SegmenterState::Idle,
            marker_policy,
            trailing_policy,
            stats: SegmenterStats::default(),
        }
    }

    pub fn state(&self) -> &SegmenterState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SegmenterState::Finished)
    }

    /// Runs the whole pass over `text`.
    ///
    /// Each closed segment goes to `flush` as soon as it closes, the trailing
    /// one last (when the policy keeps it). Lines after `END` are still read
    /// so they show up in the stats.
    pub fn segment_document<F>(mut self, text: &str, mut flush: F) -> SplitResult<SegmenterStats>
    where
        F: FnMut(Segment) -> SplitResult<()>,
    {
        for (index, line) in text.split('\n').enumerate() {  // split on \n only, `\r` stays in the line
            if let Some(segment) = self.feed(index + 1, line)? {    // line numbers are 1-based
                flush(segment)?;
            }
        }

        let (trailing, stats) = self.finish();
        if let Some(segment) = trailing {
            flush(segment)?;
        }
        Ok(stats)
    }

    /// Processes one line. `line_number` is 1-based and only used for
    /// diagnostics.
    pub fn feed(&mut self, line_number: usize, line: &str) -> SplitResult<Option<Segment>> {
        self.stats.lines_read += 1;

        if self.is_finished() {                         // everything after END is counted and dropped
            self.stats.lines_after_end += 1;
            return Ok(None);
        }

        match LineKind::classify(line) {
            LineKind::Comment => {
                self.stats.comments_dropped += 1;
                Ok(None)
            }
            LineKind::End => Ok(self.on_end(line_number)),
            LineKind::ObjectMarker => self.on_marker(line_number, line),
            LineKind::Geometry => {
                self.on_line(line);
                Ok(None)
            }
        }
    }

    // Opens a new segment, closing the current one. The name is validated
    // before anything is closed, so a malformed marker leaves the open
    // segment unflushed.
    fn on_marker(&mut self, line_number: usize, line: &str) -> SplitResult<Option<Segment>> {
        let name = parse_marker_name(line_number, line)?;     // fail fast on a bad marker
        debug!(line_number, name = %name, "object marker");

        let mut next = Segment::new(name, line_number);
        if self.marker_policy == MarkerPolicy::Include {
            next.lines.push(line.to_string());                // marker becomes the first line
        }

        match mem::replace(&mut self.state, SegmenterState::Accumulating(next)) {
            SegmenterState::Accumulating(segment) => Ok(Some(segment)),
            _ => Ok(None),
        }
    }

    // Closes the open segment (if any) and stops the pass.
    fn on_end(&mut self, line_number: usize) -> Option<Segment> {
        debug!(line_number, "END marker, stopping");
        self.stats.ended_by_marker = true;
        match mem::replace(&mut self.state, SegmenterState::Finished) {
            SegmenterState::Accumulating(segment) => Some(segment),
            _ => None,
        }
    }

    // Appends an ordinary line to the open segment; before the first marker
    // the line is an orphan and dropped.
    fn on_line(&mut self, line: &str) {
        if let SegmenterState::Accumulating(segment) = &mut self.state {
            segment.lines.push(line.to_string());             // kept verbatim
        } else {
            self.stats.orphan_lines += 1;
            debug!(line, "dropping line before first object marker");
        }
    }

    /// End of input. Returns the trailing segment when the policy flushes it.
    pub fn finish(mut self) -> (Option<Segment>, SegmenterStats) {
        let trailing = match mem::replace(&mut self.state, SegmenterState::Finished) {
            SegmenterState::Accumulating(segment) => match self.trailing_policy {
                TrailingPolicy::Flush => Some(segment),
                TrailingPolicy::Discard => {
                    warn!(
                        name = %segment.name,
                        lines = segment.lines.len(),
                        "input ended without END, discarding trailing segment"
                    );
                    self.stats.discarded_trailing = segment.lines.len();
                    None
                }
            },
            _ => None,                                        // idle, or already stopped by END
        };
        (trailing, self.stats)
    }
}

/// Extracts the segment name from an `object` marker line.
///
/// The trimmed line is split on single spaces and the third field is taken,
/// so `# object White_King` yields `White_King`.
pub fn parse_marker_name(line_number: usize, line: &str) -> SplitResult<String> {
    let name = line
        .trim()                                               // also drops a trailing `\r`
        .split(' ')
        .nth(2)
        .filter(|field| !field.is_empty())                    // doubled spaces leave an empty field
        .ok_or_else(|| SplitError::MalformedMarker {
            line_number,
            line: line.to_string(),
        })?;

    // the name becomes a file name inside the output directory
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(SplitError::InvalidSegmentName {
            line_number,
            name: name.to_string(),
        });
    }

    Ok(name.to_string())
}

/// Segments a whole document in memory.
pub fn segment_text(
    text: &str,
    marker_policy: MarkerPolicy,
    trailing_policy: TrailingPolicy,
) -> SplitResult<(Vec<Segment>, SegmenterStats)> {
    let mut segments = Vec::new();
    let stats = ObjSegmenter::new(marker_policy, trailing_policy).segment_document(text, |segment| {
        segments.push(segment);
        Ok(())
    })?;
    Ok((segments, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(segments: &[Segment]) -> Vec<(&str, String)> {
        segments
            .iter()
            .map(|s| (s.name.as_str(), s.content()))
            .collect()
    }

    #[test]
    fn test_two_pieces_with_comment_and_end() {
        let text = "# comment\n# object king\nv 1 2 3\nv 4 5 6\n# object queen\nv 7 8 9\nEND marker";
        let (segments, stats) =
            segment_text(text, MarkerPolicy::Exclude, TrailingPolicy::Flush).unwrap();

        assert_eq!(
            contents(&segments),
            vec![
                ("king", "v 1 2 3\nv 4 5 6".to_string()),
                ("queen", "v 7 8 9".to_string()),
            ]
        );
        assert_eq!(segments[0].marker_line, 2);
        assert_eq!(segments[1].marker_line, 5);
        assert_eq!(stats.comments_dropped, 1);
        assert!(stats.ended_by_marker);
    }

    #[test]
    fn test_include_policy_keeps_marker_line() {
        let text = "# object king\nv 1 2 3\n# object queen\nv 7 8 9\nEND";
        let (segments, _) =
            segment_text(text, MarkerPolicy::Include, TrailingPolicy::Flush).unwrap();

        assert_eq!(segments[0].content(), "# object king\nv 1 2 3");
        assert_eq!(segments[1].content(), "# object queen\nv 7 8 9");
    }

    #[test]
    fn test_end_only_produces_nothing() {
        let (segments, stats) =
            segment_text("v 0 0 0\nEND", MarkerPolicy::Exclude, TrailingPolicy::Flush).unwrap();
        assert!(segments.is_empty());
        assert_eq!(stats.orphan_lines, 1);
        assert!(stats.ended_by_marker);
    }

    #[test]
    fn test_trailing_segment_follows_policy() {
        let text = "# object rook\nv 1 1 1\nf 1 2 3";

        let (flushed, stats) =
            segment_text(text, MarkerPolicy::Exclude, TrailingPolicy::Flush).unwrap();
        assert_eq!(contents(&flushed), vec![("rook", "v 1 1 1\nf 1 2 3".to_string())]);
        assert!(!stats.ended_by_marker);

        let (discarded, stats) =
            segment_text(text, MarkerPolicy::Exclude, TrailingPolicy::Discard).unwrap();
        assert!(discarded.is_empty());
        assert_eq!(stats.discarded_trailing, 2);
    }

    #[test]
    fn test_comments_dropped_inside_segment() {
        let text = "# object pawn\nv 1 2 3\n# smoothing group\nvn 0 1 0\nv 4 5 6 # inline\nEND";
        let (segments, stats) =
            segment_text(text, MarkerPolicy::Exclude, TrailingPolicy::Flush).unwrap();
        assert_eq!(segments[0].content(), "v 1 2 3\nvn 0 1 0");
        assert_eq!(stats.comments_dropped, 2);
    }

    #[test]
    fn test_lines_after_end_ignored() {
        let mut segmenter = ObjSegmenter::new(MarkerPolicy::Exclude, TrailingPolicy::Flush);
        segmenter.feed(1, "# object bishop").unwrap();
        segmenter.feed(2, "v 1 2 3").unwrap();
        let closed = segmenter.feed(3, "END").unwrap();
        assert_eq!(closed.map(|s| s.name), Some("bishop".to_string()));

        assert!(segmenter.feed(4, "# object knight").unwrap().is_none());
        assert!(segmenter.feed(5, "v 9 9 9").unwrap().is_none());

        let (trailing, stats) = segmenter.finish();
        assert!(trailing.is_none());
        assert_eq!(stats.lines_after_end, 2);
        assert_eq!(stats.lines_read, 5);
    }

    #[test]
    fn test_segment_text_reads_past_end() {
        let text = "# object king\nv 1 2 3\nEND\nv 9 9 9\n# object queen\nv 8 8 8";
        let (segments, stats) =
            segment_text(text, MarkerPolicy::Exclude, TrailingPolicy::Flush).unwrap();

        assert_eq!(contents(&segments), vec![("king", "v 1 2 3".to_string())]);
        assert_eq!(stats.lines_read, 6);
        assert_eq!(stats.lines_after_end, 3);
        assert!(stats.ended_by_marker);
    }

    #[test]
    fn test_state_transitions() {
        let mut segmenter = ObjSegmenter::new(MarkerPolicy::Exclude, TrailingPolicy::Flush);
        assert_eq!(segmenter.state(), &SegmenterState::Idle);

        assert!(segmenter.on_marker(1, "# object king").unwrap().is_none());
        segmenter.on_line("v 1 2 3");
        match segmenter.state() {
            SegmenterState::Accumulating(segment) => {
                assert_eq!(segment.name, "king");
                assert_eq!(segment.lines, vec!["v 1 2 3".to_string()]);
            }
            other => panic!("unexpected state {:?}", other),
        }

        let closed = segmenter.on_marker(3, "# object queen").unwrap();
        assert_eq!(closed.unwrap().name, "king");

        let closed = segmenter.on_end(4);
        assert_eq!(closed.unwrap().name, "queen");
        assert!(segmenter.is_finished());
    }

    #[test]
    fn test_two_field_marker_is_malformed() {
        let err = segment_text("object king\nv 1 2 3", MarkerPolicy::Exclude, TrailingPolicy::Flush)
            .unwrap_err();
        assert!(matches!(err, SplitError::MalformedMarker { line_number: 1, .. }));
    }

    #[test]
    fn test_malformed_marker_keeps_open_segment() {
        let mut segmenter = ObjSegmenter::new(MarkerPolicy::Exclude, TrailingPolicy::Flush);
        segmenter.feed(1, "# object king").unwrap();
        segmenter.feed(2, "v 1 2 3").unwrap();
        assert!(segmenter.feed(3, "object queen").is_err());
        assert!(matches!(segmenter.state(), SegmenterState::Accumulating(s) if s.name == "king"));
    }

    #[test]
    fn test_parse_marker_name() {
        assert_eq!(parse_marker_name(1, "# object White_King").unwrap(), "White_King");
        assert_eq!(parse_marker_name(1, "  # object Black_Pawn extra\r").unwrap(), "Black_Pawn");
        // doubled space leaves an empty third field
        assert!(matches!(
            parse_marker_name(7, "# object  King"),
            Err(SplitError::MalformedMarker { line_number: 7, .. })
        ));
        assert!(matches!(
            parse_marker_name(2, "# object ../escape"),
            Err(SplitError::InvalidSegmentName { .. })
        ));
        assert!(matches!(
            parse_marker_name(2, "# object .."),
            Err(SplitError::InvalidSegmentName { .. })
        ));
    }

    #[test]
    fn test_carriage_returns_kept_verbatim() {
        let text = "# object queen\r\nv 1 2 3\r\nv 4 5 6\r\nEND\r\n";
        let (segments, _) =
            segment_text(text, MarkerPolicy::Exclude, TrailingPolicy::Flush).unwrap();
        assert_eq!(segments[0].name, "queen");
        assert_eq!(segments[0].content(), "v 1 2 3\r\nv 4 5 6\r");
    }

    #[test]
    fn test_trailing_newline_becomes_empty_line() {
        let (segments, _) =
            segment_text("# object king\nv 1 2 3\n", MarkerPolicy::Exclude, TrailingPolicy::Flush)
                .unwrap();
        assert_eq!(segments[0].lines, vec!["v 1 2 3".to_string(), String::new()]);
        assert_eq!(segments[0].content(), "v 1 2 3\n");
    }
}
