//! Frame transport over a byte stream: `data: {"<nodeId>": <partialState>}\n\n`.
//!
//! The server writes [`encode_frame`] output to a chunked `text/event-stream`
//! body; clients feed raw body chunks into a [`FrameDecoder`]. There is no end
//! sentinel: the stream ends when the transport closes.

use serde_json::Value;
use thiserror::Error;

use crate::stream::Frame;

/// Record separator.
const DELIMITER: &[u8] = b"\n\n";
/// Record prefix.
const DATA_PREFIX: &str = "data:";

/// A record the decoder could not turn into a frame. Dropped, never fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("record is not valid UTF-8")]
    InvalidUtf8,
    #[error("record does not start with \"data:\"")]
    MissingDataPrefix,
    #[error("record payload is not JSON: {0}")]
    InvalidJson(String),
    #[error("record payload must be an object with exactly one key, got {0} keys")]
    NotSingleKey(usize),
    #[error("partial state of node {0} is not an object")]
    PartialNotObject(String),
    #[error("stream closed inside a record ({0} bytes discarded)")]
    Truncated(usize),
}

/// Encodes one frame as a complete record, delimiter included.
pub fn encode_frame(frame: &Frame) -> String {
    format!("{} {}\n\n", DATA_PREFIX, frame.to_value())
}

/// Parses one record (without its delimiter).
pub fn parse_record(record: &str) -> Result<Frame, ProtocolError> {
    let record = record.trim_matches(|c| c == '\r' || c == '\n');
    let payload = record
        .strip_prefix(DATA_PREFIX)
        .ok_or(ProtocolError::MissingDataPrefix)?
        .trim();
    let value: Value =
        serde_json::from_str(payload).map_err(|e| ProtocolError::InvalidJson(e.to_string()))?;
    let Value::Object(outer) = value else {
        return Err(ProtocolError::NotSingleKey(0));
    };
    if outer.len() != 1 {
        return Err(ProtocolError::NotSingleKey(outer.len()));
    }
    let Some((node_id, partial)) = outer.into_iter().next() else {
        return Err(ProtocolError::NotSingleKey(0));
    };
    match partial {
        Value::Object(partial) => Ok(Frame::new(node_id, partial)),
        _ => Err(ProtocolError::PartialNotObject(node_id)),
    }
}

/// Incremental decoder over raw body chunks.
///
/// Buffers bytes, so a record or a UTF-8 sequence split across reads decodes once
/// the rest arrives. Malformed records are logged at warn and skipped.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
    /// Bytes of `buf` already known to hold no delimiter start.
    scanned: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk; returns every frame it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buf.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some(found) = find(&self.buf[self.scanned..], DELIMITER) {
            let pos = self.scanned + found;
            self.scanned = 0;
            let record: Vec<u8> = self.buf.drain(..pos + DELIMITER.len()).collect();
            let record = &record[..pos];
            if record.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match std::str::from_utf8(record)
                .map_err(|_| ProtocolError::InvalidUtf8)
                .and_then(parse_record)
            {
                Ok(frame) => frames.push(frame),
                Err(e) => log_dropped(&e),
            }
        }
        self.scanned = self.buf.len().saturating_sub(DELIMITER.len() - 1);
        frames
    }

    /// Ends the stream. An incomplete trailing record is discarded and reported.
    pub fn finish(&mut self) -> Result<(), ProtocolError> {
        let rest = std::mem::take(&mut self.buf);
        self.scanned = 0;
        if rest.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }
        let e = ProtocolError::Truncated(rest.len());
        log_dropped(&e);
        Err(e)
    }

    /// Bytes waiting for a delimiter.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn log_dropped(error: &ProtocolError) {
    #[cfg(feature = "tracing")]
    tracing::warn!(%error, "Dropping malformed frame");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[WARN] Dropping malformed frame: {}", error);
}
