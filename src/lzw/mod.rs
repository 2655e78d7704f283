// LZW stream format.
//
// This module holds the pieces shared by both directions of the codec:
//
// - `bitstream`:  LSB-first variable-width integer packing over byte I/O
// - `dictionary`: the code -> bytes table with its width/reset bookkeeping
// - `header`:     the single initial-code-width byte at stream start
//
// Stream layout:
//
//   [W0: u8] [code: W0 bits] [code] ... [zero padding to a byte boundary]
//
// Codes 0..=255 are literals, 256 is the reset marker, 257.. are learned.

pub mod bitstream;
pub mod dictionary;
pub mod header;

pub use bitstream::{BitReader, BitWriter};
pub use dictionary::Dictionary;
pub use header::StreamHeader;

/// A dictionary code as carried on the wire.
pub type Code = u32;

/// Number of literal codes (one per byte value).
pub const LITERAL_COUNT: usize = 256;

/// Reserved code telling both sides to drop all learned entries.
pub const RESET_CODE: Code = 256;

/// First code handed out to a learned entry.
pub const FIRST_DYNAMIC_CODE: Code = 257;

/// Code width written by the encoder; wide enough for codes 0..=256.
pub const INITIAL_CODE_WIDTH: u8 = 9;

/// Widest code the bit packer carries. A header claiming 32 or more is corrupt.
pub const MAX_CODE_WIDTH: u8 = 31;

/// Longest byte sequence a single dictionary entry may hold.
pub const MAX_ENTRY_LEN: usize = u16::MAX as usize;
