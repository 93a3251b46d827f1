//! Delimited Span Scanner
//!
//! Extracts the text between two literal markers from a stream of byte
//! chunks without holding the whole document in memory. Only the last
//! `start.len()` bytes are kept while looking for the start marker; after
//! that, bytes are captured until the end marker shows up.

use std::io;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    /// The stream ended before both markers were seen
    #[error("delimited span not found")]
    NotFound,

    #[error("markers must not be empty")]
    EmptyMarker,

    #[error("failed to read stream: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Discard,
    Capture,
    Done,
}

// == Span Scanner ==
/// Push-based scanner: feed it chunks until it yields the span.
#[derive(Debug)]
pub struct SpanScanner {
    start: Vec<u8>,
    end: Vec<u8>,
    phase: Phase,
    /// Trailing bytes seen while discarding, at most `start.len()`
    window: Vec<u8>,
    captured: Vec<u8>,
}

impl SpanScanner {
    pub fn new(start: &str, end: &str) -> Result<Self, ScanError> {
        if start.is_empty() || end.is_empty() {
            return Err(ScanError::EmptyMarker);
        }

        Ok(Self {
            start: start.as_bytes().to_vec(),
            end: end.as_bytes().to_vec(),
            phase: Phase::Discard,
            window: Vec::with_capacity(start.len()),
            captured: Vec::new(),
        })
    }

    // == Feed ==
    /// Consumes the next chunk.
    ///
    /// Returns the span as soon as the end marker completes; bytes after it
    /// in the same chunk are ignored.
    pub fn feed(&mut self, chunk: &[u8]) -> Option<String> {
        for &byte in chunk {
            match self.phase {
                Phase::Discard => self.discard(byte),
                Phase::Capture => {
                    self.captured.push(byte);
                    if self.captured.ends_with(&self.end) {
                        self.phase = Phase::Done;
                        let span_len = self.captured.len() - self.end.len();
                        self.captured.truncate(span_len);
                        let span = std::mem::take(&mut self.captured);
                        return Some(String::from_utf8_lossy(&span).into_owned());
                    }
                }
                Phase::Done => return None,
            }
        }

        None
    }

    fn discard(&mut self, byte: u8) {
        if self.window.len() == self.start.len() {
            self.window.remove(0);
        }
        self.window.push(byte);

        if self.window == self.start {
            self.phase = Phase::Capture;
            self.window = Vec::new();
        }
    }
}

// == Read Between ==
/// Returns the text strictly between the first `start` and the first `end`
/// following it.
///
/// Reading stops as soon as the end marker is found, so the stream may be
/// left partially consumed. A stream that ends before either marker is
/// complete yields [`ScanError::NotFound`].
pub async fn read_between<S>(mut stream: S, start: &str, end: &str) -> Result<String, ScanError>
where
    S: Stream<Item = io::Result<Bytes>> + Unpin,
{
    let mut scanner = SpanScanner::new(start, end)?;

    while let Some(chunk) = stream.next().await {
        if let Some(span) = scanner.feed(&chunk?) {
            return Ok(span);
        }
    }

    Err(ScanError::NotFound)
}
