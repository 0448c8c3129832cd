//! Stack trace log parser.
//!
//! Reads the line-oriented trace format produced by a stack trace recorder:
//! blocks of frame lines, each block closed by a `###ncalls <count>`
//! terminator. Parsing is lazy: completed call paths are yielded one at a
//! time as their terminator line is consumed.

use super::frame::{Frame, FrameNormalizer};
use crate::utils::config::COUNT_MARKER;
use crate::utils::error::ParseError;
use log::debug;
use std::io::BufRead;

/// One complete observed call path: an ordered list of frames (outer-most
/// caller first, inner-most callee last) plus the number of times this exact
/// path was observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallPath {
    /// Frames in caller-to-callee order
    pub frames: Vec<Frame>,

    /// How many times this exact path was observed
    pub ncalls: u64,
}

impl CallPath {
    /// Create an empty call path
    ///
    /// **Public** - constructor
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the given frame to this call path.
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }
}

/// Enumeration of legal parser states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No call path currently open
    Ready,

    /// Accumulating frames into an in-progress path
    Building,

    /// Input exhausted normally
    Done,

    /// Malformed input was seen; the iterator yields nothing further
    Error,
}

/// Lazy parser over an open trace source.
///
/// Yields one [`CallPath`] per block, in input order. The sequence is finite
/// and non-restartable; after the first error the iterator is fused.
///
/// **Public** - main entry point for parsing
pub struct CallPathParser<R: BufRead> {
    reader: R,
    normalizer: FrameNormalizer,
    state: State,
    current: Option<CallPath>,
    line_no: usize,
}

impl<R: BufRead> CallPathParser<R> {
    /// Create a parser over an open readable text source.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            normalizer: FrameNormalizer::new(),
            state: State::Ready,
            current: None,
            line_no: 0,
        }
    }

    /// Handle a count-terminator line, completing the open path.
    ///
    /// **Private** - internal transition for the `Building` -> `Ready` step
    fn finish_path(&mut self, line: &str) -> Result<CallPath, ParseError> {
        let Some(mut path) = self.current.take() else {
            // A terminator with no preceding frame lines is malformed input.
            return Err(ParseError::UnexpectedCount(format!(
                "line {}: {}",
                self.line_no, line
            )));
        };

        path.ncalls = self.parse_count(line)?;
        self.state = State::Ready;
        Ok(path)
    }

    /// Split a `###ncalls <count>` line into its integer call count.
    ///
    /// **Private** - internal helper for finish_path
    fn parse_count(&self, line: &str) -> Result<u64, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.len() != 2 || tokens[0] != COUNT_MARKER {
            return Err(ParseError::InvalidCountLine(format!(
                "line {}: expected '{} <count>': {}",
                self.line_no, COUNT_MARKER, line
            )));
        }

        tokens[1].parse::<u64>().map_err(|e| {
            ParseError::InvalidCountLine(format!(
                "line {}: bad call count ({}): {}",
                self.line_no, e, line
            ))
        })
    }
}

impl<R: BufRead> Iterator for CallPathParser<R> {
    type Item = Result<CallPath, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, State::Done | State::Error) {
            return None;
        }

        let mut buf = String::new();
        loop {
            buf.clear();
            match self.reader.read_line(&mut buf) {
                Ok(0) => {
                    // End of input: a path still open means the file was
                    // truncated mid-block.
                    return if self.state == State::Building {
                        self.state = State::Error;
                        Some(Err(ParseError::TruncatedInput))
                    } else {
                        debug!("Trace exhausted after {} lines", self.line_no);
                        self.state = State::Done;
                        None
                    };
                }
                Ok(_) => {}
                Err(e) => {
                    self.state = State::Error;
                    return Some(Err(ParseError::Io(e)));
                }
            }
            self.line_no += 1;

            let line = buf.trim();
            if line.is_empty() {
                // Blank lines are tolerated, but well-formed input never
                // contains one.
                continue;
            }

            if line.starts_with(COUNT_MARKER) {
                match self.finish_path(line) {
                    Ok(path) => return Some(Ok(path)),
                    Err(e) => {
                        self.state = State::Error;
                        return Some(Err(e));
                    }
                }
            }

            // The only other sort of line in the file is a stack frame record.
            if self.state == State::Ready {
                self.current = Some(CallPath::new());
                self.state = State::Building;
            }

            match self.normalizer.parse_line(line) {
                Ok(frame) => {
                    if let Some(path) = self.current.as_mut() {
                        path.push(frame);
                    }
                }
                Err(e) => {
                    self.state = State::Error;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parser(input: &str) -> CallPathParser<Cursor<&str>> {
        CallPathParser::new(Cursor::new(input))
    }

    fn parse_all(input: &str) -> Vec<CallPath> {
        parser(input)
            .collect::<Result<Vec<_>, _>>()
            .expect("input is well-formed")
    }

    #[test]
    fn test_single_block() {
        let paths = parse_all("A in libX.so\nB in libY.so\n###ncalls 3\n");

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ncalls, 3);
        assert_eq!(
            paths[0].frames,
            vec![Frame::new("A", "libX.so"), Frame::new("B", "libY.so")]
        );
    }

    #[test]
    fn test_multiple_blocks_preserve_order() {
        let paths = parse_all(
            "A in libX.so\nB in libY.so\n###ncalls 3\nC in libZ.so\n###ncalls 7\n",
        );

        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].frames.len(), 2);
        assert_eq!(paths[0].ncalls, 3);
        assert_eq!(paths[1].frames, vec![Frame::new("C", "libZ.so")]);
        assert_eq!(paths[1].ncalls, 7);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let paths = parse_all("\nA in libX.so\n\nB in libY.so\n###ncalls 2\n\n");

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].frames.len(), 2);
    }

    #[test]
    fn test_missing_trailing_newline() {
        let paths = parse_all("A in libX.so\n###ncalls 1");

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ncalls, 1);
    }

    #[test]
    fn test_stray_count_terminator_is_fatal() {
        let mut parser = parser("###ncalls 5\n");

        let result = parser.next().expect("one item");
        assert!(matches!(result, Err(ParseError::UnexpectedCount(_))));
    }

    #[test]
    fn test_terminator_after_completed_block_is_fatal() {
        let mut parser = parser("A in libX.so\n###ncalls 1\n###ncalls 2\n");

        assert!(parser.next().expect("first block").is_ok());
        let result = parser.next().expect("error item");
        assert!(matches!(result, Err(ParseError::UnexpectedCount(_))));
    }

    #[test]
    fn test_truncated_input_is_fatal() {
        let mut parser = parser("A in libX.so\nB in libY.so\n");

        let result = parser.next().expect("one item");
        assert!(matches!(result, Err(ParseError::TruncatedInput)));
    }

    #[test]
    fn test_parser_fused_after_error() {
        let mut parser = parser("###ncalls 5\nA in libX.so\n###ncalls 1\n");

        assert!(parser.next().expect("error item").is_err());
        assert!(parser.next().is_none());
    }

    #[test]
    fn test_count_line_with_extra_tokens_is_fatal() {
        let mut parser = parser("A in libX.so\n###ncalls 3 4\n");

        let result = parser.next().expect("one item");
        assert!(matches!(result, Err(ParseError::InvalidCountLine(_))));
    }

    #[test]
    fn test_count_line_with_bad_integer_is_fatal() {
        let mut parser = parser("A in libX.so\n###ncalls three\n");

        let result = parser.next().expect("one item");
        assert!(matches!(result, Err(ParseError::InvalidCountLine(_))));
    }

    #[test]
    fn test_frame_line_without_separator_is_fatal() {
        let mut parser = parser("garbage\n###ncalls 1\n");

        let result = parser.next().expect("one item");
        assert!(matches!(result, Err(ParseError::InvalidFrameLine(_))));
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let mut parser = parser("");
        assert!(parser.next().is_none());
        // Stays exhausted on repeated pulls.
        assert!(parser.next().is_none());
    }
}
