// Dictionary codec: LZW compression and decompression over byte I/O.
//
// - `encoder`: `DictionaryCodec::compress`, longest-prefix matching plus
//              code emission, width growth and the reset policy
// - `decoder`: `DictionaryCodec::decompress`, code reconstruction including
//              the self-referential `code == next_code` case
//
// A codec owns one dictionary and runs one pass at a time. Each pass starts
// from the 257 fixed entries, so a codec can be reused across files.

pub mod decoder;
pub mod encoder;

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::lzw::bitstream::DEFAULT_READ_CHUNK;
use crate::lzw::{Code, Dictionary, INITIAL_CODE_WIDTH, MAX_CODE_WIDTH};

pub use decoder::DecoderState;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for a `DictionaryCodec`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Widest code the encoder may emit (9..=31). When the dictionary would
    /// need a wider code, the encoder emits a reset marker and starts over.
    /// Decoding ignores this; it follows whatever the stream carries.
    pub max_code_width: u8,
    /// Bytes pulled from the source per refill.
    pub read_chunk_size: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_code_width: MAX_CODE_WIDTH,
            read_chunk_size: DEFAULT_READ_CHUNK,
        }
    }
}

impl CodecOptions {
    pub fn validate(&self) -> Result<()> {
        if !(INITIAL_CODE_WIDTH..=MAX_CODE_WIDTH).contains(&self.max_code_width) {
            return Err(Error::InvalidOptions(format!(
                "max_code_width {} is outside {INITIAL_CODE_WIDTH}..={MAX_CODE_WIDTH}",
                self.max_code_width
            )));
        }
        if self.read_chunk_size == 0 {
            return Err(Error::InvalidOptions(
                "read_chunk_size must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Counters for the most recent pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecStats {
    /// Bytes pulled from the source.
    pub bytes_in: u64,
    /// Bytes pushed to the sink.
    pub bytes_out: u64,
    /// Codes written or read, reset markers included.
    pub codes: u64,
    /// Reset markers written or read.
    pub resets: u64,
    /// Code width announced in the stream header.
    pub initial_code_width: u8,
    /// Widest code written or read.
    pub max_code_width: u8,
}

// ---------------------------------------------------------------------------
// DictionaryCodec
// ---------------------------------------------------------------------------

/// LZW codec owning an adaptive dictionary.
///
/// # Example
/// ```
/// use oxilzw::codec::DictionaryCodec;
///
/// let mut codec = DictionaryCodec::new();
/// let mut packed = Vec::new();
/// codec.compress(&mut &b"TOBEORNOTTOBEORTOBEORNOT"[..], &mut packed).unwrap();
///
/// let mut unpacked = Vec::new();
/// codec.decompress(&mut &packed[..], &mut unpacked).unwrap();
/// assert_eq!(unpacked, b"TOBEORNOTTOBEORTOBEORNOT");
/// ```
#[derive(Debug)]
pub struct DictionaryCodec {
    dict: Dictionary,
    /// `(prefix code, next byte) -> code`, maintained only while compressing.
    prefixes: HashMap<(Code, u8), Code>,
    opts: CodecOptions,
    stats: CodecStats,
    decoder_state: DecoderState,
}

impl Default for DictionaryCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryCodec {
    /// Codec with default options.
    pub fn new() -> Self {
        Self {
            dict: Dictionary::new(),
            prefixes: HashMap::new(),
            opts: CodecOptions::default(),
            stats: CodecStats::default(),
            decoder_state: DecoderState::Start,
        }
    }

    pub fn with_options(opts: CodecOptions) -> Result<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            ..Self::new()
        })
    }

    pub fn options(&self) -> &CodecOptions {
        &self.opts
    }

    /// Counters for the last `compress` or `decompress` call.
    pub fn stats(&self) -> CodecStats {
        self.stats
    }

    /// Where the last `decompress` call stopped (`Done` or `Failed`).
    pub fn decoder_state(&self) -> DecoderState {
        self.decoder_state
    }

    /// Return the dictionary to its fixed entries at `base_width`.
    fn begin_pass(&mut self, base_width: u8) {
        self.dict.set_base_width(base_width);
        self.prefixes.clear();
        self.stats = CodecStats {
            initial_code_width: base_width,
            max_code_width: base_width,
            ..CodecStats::default()
        };
    }
}

// ---------------------------------------------------------------------------
// Convenience functions
// ---------------------------------------------------------------------------

/// Compress `data` in memory with default options.
pub fn compress_to_vec(data: &[u8]) -> Result<Vec<u8>> {
    compress_to_vec_with(data, CodecOptions::default())
}

/// Compress `data` in memory.
pub fn compress_to_vec_with(data: &[u8], opts: CodecOptions) -> Result<Vec<u8>> {
    let mut codec = DictionaryCodec::with_options(opts)?;
    let mut out = Vec::with_capacity(data.len() / 2 + 2);
    let mut src = data;
    codec.compress(&mut src, &mut out)?;
    Ok(out)
}

/// Decompress an in-memory stream.
pub fn decompress_to_vec(packed: &[u8]) -> Result<Vec<u8>> {
    let mut codec = DictionaryCodec::new();
    let mut out = Vec::with_capacity(packed.len().saturating_mul(2));
    let mut src = packed;
    codec.decompress(&mut src, &mut out)?;
    Ok(out)
}
