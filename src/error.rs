// Codec error type.
//
// Every variant is fatal to the pass that produced it. Output written before
// the error is undefined and should be discarded by the caller.

use thiserror::Error;

use crate::lzw::Code;

/// Result alias used throughout the codec.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The stream's initial code width byte is outside `9..=31`.
    #[error("malformed header: initial code width {0} is outside 9..=31")]
    MalformedHeader(u8),

    /// The stream ended inside a code (or before the header byte).
    #[error("truncated stream: input ended in the middle of a code")]
    TruncatedStream,

    /// A decoded code refers to an entry that cannot exist yet.
    #[error("unknown code {code} (next free code is {next_code})")]
    UnknownCode { code: Code, next_code: Code },

    /// The decoder would need codes wider than 31 bits.
    #[error("code space exhausted: width would grow past {width} bits")]
    CodeSpaceExhausted { width: u8 },

    /// The decoder would build an entry longer than the format allows.
    #[error("dictionary entry of {len} bytes exceeds the 65535-byte limit")]
    EntryTooLong { len: usize },

    /// The byte source reported an I/O fault.
    #[error("source read failed: {0}")]
    SourceReadFailed(#[source] std::io::Error),

    /// The byte sink rejected a write.
    #[error("sink write failed: {0}")]
    SinkWriteFailed(#[source] std::io::Error),

    /// `CodecOptions` outside the supported range.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl Error {
    /// True for errors caused by the compressed input itself (as opposed to
    /// I/O faults or caller configuration).
    pub fn is_corrupt_stream(&self) -> bool {
        matches!(
            self,
            Self::MalformedHeader(_)
                | Self::TruncatedStream
                | Self::UnknownCode { .. }
                | Self::CodeSpaceExhausted { .. }
                | Self::EntryTooLong { .. }
        )
    }
}
