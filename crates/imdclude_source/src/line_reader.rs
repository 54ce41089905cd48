//! Splitting byte streams into logical lines.

use std::io::{self, BufRead, BufReader, Read};

/// Default size of the reader's internal buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 4096;

/// Default cap on the length of a single logical line (16 MiB).
pub const DEFAULT_MAX_LINE_BYTES: usize = 16 * 1024 * 1024;

/// Tuning for [`LineReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Size of the internal read buffer. Lines longer than this are
    /// reassembled across several fills.
    pub buffer_capacity: usize,
    /// Longest logical line accepted, in bytes (terminator excluded).
    pub max_line_bytes: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

/// A failure reading one line.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    /// The logical line exceeded the configured cap. The line is dropped and
    /// reading continues with the next one.
    #[error("line {line}: line exceeds {limit} bytes")]
    TooLong {
        /// 1-based line number.
        line: usize,
        /// The configured cap in bytes.
        limit: usize,
    },

    /// The line is not valid UTF-8. The line is dropped and reading
    /// continues with the next one.
    #[error("line {line}: invalid UTF-8")]
    InvalidUtf8 {
        /// 1-based line number.
        line: usize,
    },

    /// The underlying reader failed. No further lines are produced.
    #[error("line {line}: {source}")]
    Io {
        /// 1-based line number at the point of failure.
        line: usize,
        /// The underlying I/O error.
        source: io::Error,
    },
}

/// A lazy, non-restartable iterator over the logical lines of a byte stream.
///
/// `\n` and `\r\n` terminators are stripped. Lines that are not valid UTF-8
/// are reported rather than altered. End of stream ends the sequence; an I/O
/// error is yielded once and then the iterator is exhausted.
pub struct LineReader<R> {
    inner: BufReader<R>,
    max_line_bytes: usize,
    line: usize,
    done: bool,
    ended_with_newline: bool,
}

impl<R: Read> LineReader<R> {
    /// Wraps `reader` using the default options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ReaderOptions::default())
    }

    /// Wraps `reader` with explicit buffer and line-length settings.
    pub fn with_options(reader: R, options: ReaderOptions) -> Self {
        Self {
            inner: BufReader::with_capacity(options.buffer_capacity.max(1), reader),
            max_line_bytes: options.max_line_bytes,
            line: 0,
            done: false,
            ended_with_newline: false,
        }
    }

    /// Returns `true` if the last line read was terminated by a newline.
    pub fn ended_with_newline(&self) -> bool {
        self.ended_with_newline
    }
}

impl<R: Read> Iterator for LineReader<R> {
    type Item = Result<String, LineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut buf = Vec::new();
        let mut overflow = false;
        let mut terminated = false;
        let mut consumed_any = false;

        while !terminated {
            let available = match self.inner.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    self.line += 1;
                    return Some(Err(LineError::Io {
                        line: self.line,
                        source: e,
                    }));
                }
            };

            if available.is_empty() {
                self.done = true;
                break;
            }

            let (chunk_len, used) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => {
                    terminated = true;
                    (i, i + 1)
                }
                None => (available.len(), available.len()),
            };

            // Partial fills are accumulated until the terminator shows up.
            if buf.len() + chunk_len > self.max_line_bytes {
                overflow = true;
                buf.clear();
            } else if !overflow {
                buf.extend_from_slice(&available[..chunk_len]);
            }

            self.inner.consume(used);
            consumed_any = true;
        }

        if !consumed_any {
            return None;
        }

        self.line += 1;
        self.ended_with_newline = terminated;

        if overflow {
            return Some(Err(LineError::TooLong {
                line: self.line,
                limit: self.max_line_bytes,
            }));
        }

        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        match String::from_utf8(buf) {
            Ok(line) => Some(Ok(line)),
            Err(_) => Some(Err(LineError::InvalidUtf8 { line: self.line })),
        }
    }
}

/// Joins lines with `\n`, without a separator after the last line.
pub fn merge_lines<S: AsRef<str>>(lines: &[S]) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push(b'\n');
        }
        out.extend_from_slice(line.as_ref().as_bytes());
    }
    out
}

/// Splits stored bytes back into lines; the inverse of [`merge_lines`].
///
/// Splits on every `\n`, so a trailing separator yields a final empty line.
/// Empty input has no lines.
pub fn split_lines(bytes: &[u8]) -> Vec<String> {
    if bytes.is_empty() {
        return Vec::new();
    }
    bytes
        .split(|b| *b == b'\n')
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str, options: ReaderOptions) -> Vec<Result<String, String>> {
        LineReader::with_options(input.as_bytes(), options)
            .map(|r| r.map_err(|e| e.to_string()))
            .collect()
    }

    fn lines(input: &str) -> Vec<String> {
        LineReader::new(input.as_bytes()).map(Result::unwrap).collect()
    }

    #[test]
    fn splits_on_newlines() {
        assert_eq!(lines("a\nb\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn trailing_newline_adds_no_empty_line() {
        let mut reader = LineReader::new("a\nb\n".as_bytes());
        assert_eq!(reader.next().unwrap().unwrap(), "a");
        assert_eq!(reader.next().unwrap().unwrap(), "b");
        assert!(reader.next().is_none());
        assert!(reader.ended_with_newline());
    }

    #[test]
    fn unterminated_last_line() {
        let mut reader = LineReader::new("a\nb".as_bytes());
        assert_eq!(reader.by_ref().count(), 2);
        assert!(!reader.ended_with_newline());
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(lines("").is_empty());
    }

    #[test]
    fn blank_lines_are_kept() {
        assert_eq!(lines("\n\nx\n"), vec!["", "", "x"]);
    }

    #[test]
    fn crlf_is_stripped() {
        assert_eq!(lines("one\r\ntwo\r\n"), vec!["one", "two"]);
    }

    #[test]
    fn long_line_is_reassembled_across_fills() {
        let long = "x".repeat(100);
        let input = format!("{long}\nshort");
        let options = ReaderOptions {
            buffer_capacity: 8,
            max_line_bytes: 1024,
        };
        let out = collect(&input, options);
        assert_eq!(out, vec![Ok(long), Ok("short".to_string())]);
    }

    #[test]
    fn too_long_line_is_reported_and_reading_continues() {
        let input = format!("ok\n{}\nafter", "y".repeat(50));
        let options = ReaderOptions {
            buffer_capacity: 8,
            max_line_bytes: 16,
        };
        let out = collect(&input, options);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], Ok("ok".to_string()));
        assert_eq!(out[1], Err("line 2: line exceeds 16 bytes".to_string()));
        assert_eq!(out[2], Ok("after".to_string()));
    }

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
            }
            self.served = true;
            let data = b"first\n";
            buf[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }
    }

    #[test]
    fn io_error_is_reported_once_with_line_number() {
        let mut reader = LineReader::new(FailingReader { served: false });
        assert_eq!(reader.next().unwrap().unwrap(), "first");
        match reader.next() {
            Some(Err(LineError::Io { line, .. })) => assert_eq!(line, 2),
            other => panic!("expected io error, got {other:?}"),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn invalid_utf8_is_reported_and_reading_continues() {
        let bytes: &[u8] = b"ok\ncaf\xe9\nafter\n";
        let out: Vec<Result<String, String>> = LineReader::new(bytes)
            .map(|r| r.map_err(|e| e.to_string()))
            .collect();
        assert_eq!(
            out,
            vec![
                Ok("ok".to_string()),
                Err("line 2: invalid UTF-8".to_string()),
                Ok("after".to_string()),
            ]
        );
    }

    #[test]
    fn merge_lines_omits_trailing_separator() {
        let merged = merge_lines(&["First line", "Second line", "Third line"]);
        assert_eq!(merged, b"First line\nSecond line\nThird line");
    }

    #[test]
    fn merge_empty_is_empty() {
        let empty: [&str; 0] = [];
        assert!(merge_lines(&empty).is_empty());
    }

    #[test]
    fn split_lines_inverts_merge() {
        let split = split_lines(b"First line\nSecond line\nThird line");
        assert_eq!(split, vec!["First line", "Second line", "Third line"]);
        assert_eq!(merge_lines(&split), b"First line\nSecond line\nThird line");
    }

    #[test]
    fn split_keeps_trailing_blank_line() {
        let merged = merge_lines(&["a", ""]);
        assert_eq!(merged, b"a\n");
        assert_eq!(split_lines(&merged), vec!["a", ""]);
    }

    #[test]
    fn split_keeps_blank_lines_everywhere() {
        let original = ["", "# Notes", "", "body", "", ""];
        let merged = merge_lines(&original);
        assert_eq!(split_lines(&merged), original);
    }

    #[test]
    fn split_empty_is_empty() {
        assert!(split_lines(b"").is_empty());
    }
}
