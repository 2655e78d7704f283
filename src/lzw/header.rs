// Stream header: one byte holding the initial code width.
//
// The encoder always writes 9. The decoder accepts 9..=31 and uses the value
// both as the starting width and as the width restored by a reset marker.

use crate::error::{Error, Result};
use crate::io::{ByteSink, ByteSource};

use super::{INITIAL_CODE_WIDTH, MAX_CODE_WIDTH};

/// Parsed stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub code_width: u8,
}

impl Default for StreamHeader {
    fn default() -> Self {
        Self {
            code_width: INITIAL_CODE_WIDTH,
        }
    }
}

impl StreamHeader {
    /// Encoded size in bytes.
    pub const LEN: usize = 1;

    /// Validate a raw header byte.
    ///
    /// Widths of 32 and up cannot be carried by the bit packer. Widths below 9
    /// cannot address the reset marker.
    pub fn parse(byte: u8) -> Result<Self> {
        if !(INITIAL_CODE_WIDTH..=MAX_CODE_WIDTH).contains(&byte) {
            return Err(Error::MalformedHeader(byte));
        }
        Ok(Self { code_width: byte })
    }

    pub fn encode<S: ByteSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.write_bytes(&[self.code_width])
            .map_err(Error::SinkWriteFailed)
    }

    /// Read and validate the header byte.
    ///
    /// An empty source has no header at all and reports `TruncatedStream`.
    pub fn decode<R: ByteSource + ?Sized>(source: &mut R) -> Result<Self> {
        let mut byte = [0u8; 1];
        let n = source
            .read_bytes(&mut byte)
            .map_err(Error::SourceReadFailed)?;
        if n == 0 {
            return Err(Error::TruncatedStream);
        }
        Self::parse(byte[0])
    }
}
