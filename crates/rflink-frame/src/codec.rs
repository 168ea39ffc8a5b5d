use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, warn};

use crate::error::{FrameError, Result};

/// Every gateway line ends with carriage return + newline.
pub const LINE_TERMINATOR: &[u8; 2] = b"\r\n";

/// Default upper bound for a single unterminated line: 4 KiB.
///
/// The longest line the firmware emits is well under 200 bytes, so anything
/// past this is line noise on the serial port.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4 * 1024;

/// Splits the gateway byte stream into `\r\n` terminated text lines.
///
/// One codec belongs to one connection: the partially received line lives in
/// the `BytesMut` owned by the surrounding `FramedRead`, so a reconnect starts
/// from an empty buffer.
///
/// Wire format:
/// ```text
/// ┌──────────────────────────┬──────┐
/// │ ASCII text (no CR LF)    │ \r\n │
/// └──────────────────────────┴──────┘
/// ```
#[derive(Debug, Clone)]
pub struct LineCodec {
    max_line_length: usize,
    /// Bytes of the buffer already searched for a terminator.
    next_index: usize,
}

impl LineCodec {
    /// Create a codec with the default maximum line length.
    pub fn new() -> Self {
        Self::with_max_line_length(DEFAULT_MAX_LINE_LENGTH)
    }

    /// Create a codec that discards unterminated lines longer than `max`.
    pub fn with_max_line_length(max: usize) -> Self {
        Self {
            max_line_length: max,
            next_index: 0,
        }
    }

    /// Configured maximum line length.
    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        loop {
            // A terminator may straddle two reads, so back up one byte.
            let start = self.next_index.saturating_sub(1).min(src.len());
            let found = src[start..]
                .windows(LINE_TERMINATOR.len())
                .position(|w| w == LINE_TERMINATOR);

            if let Some(offset) = found {
                let line = src.split_to(start + offset);
                src.advance(LINE_TERMINATOR.len());
                self.next_index = 0;
                return Ok(Some(decode_text(&line)));
            }

            if src.len() <= self.max_line_length {
                self.next_index = src.len();
                return Ok(None);
            }

            warn!(
                discarded = src.len(),
                max = self.max_line_length,
                "unterminated line exceeds maximum length, discarding"
            );
            src.clear();
            self.next_index = 0;
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if !src.is_empty() {
            debug!(
                partial = %String::from_utf8_lossy(src),
                "connection closed mid-line, discarding partial line"
            );
            src.clear();
        }
        self.next_index = 0;
        Ok(None)
    }
}

impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = FrameError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<()> {
        let line = item.as_ref();
        if line.contains(['\r', '\n']) {
            return Err(FrameError::EmbeddedTerminator(line.to_string()));
        }
        dst.reserve(line.len() + LINE_TERMINATOR.len());
        dst.put_slice(line.as_bytes());
        dst.put_slice(LINE_TERMINATOR);
        Ok(())
    }
}

/// Decode one line of gateway text.
///
/// Invalid UTF-8 is never dropped: offending sequences become U+FFFD and the
/// line is still delivered.
fn decode_text(line: &[u8]) -> String {
    match std::str::from_utf8(line) {
        Ok(text) => text.to_string(),
        Err(err) => {
            let text = String::from_utf8_lossy(line).into_owned();
            warn!(%err, line = %text, "invalid UTF-8 from gateway, substituted replacement characters");
            text
        }
    }
}
