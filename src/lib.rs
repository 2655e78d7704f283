//! Oxilzw: adaptive-dictionary (LZW) compression in Rust.
//!
//! The crate provides:
//! - The stream format pieces: bit packing, dictionary, header (`lzw`)
//! - A streaming compressor/decompressor (`codec`)
//! - Source/sink traits and file-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use oxilzw::codec::{compress_to_vec, decompress_to_vec};
//!
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//! let packed = compress_to_vec(data).unwrap();
//! assert_eq!(packed[0], 9);
//! assert_eq!(decompress_to_vec(&packed).unwrap(), data);
//! ```

pub mod codec;
pub mod error;
pub mod io;
pub mod lzw;

#[cfg(feature = "cli")]
pub mod cli;

pub use codec::{CodecOptions, CodecStats, DecoderState, DictionaryCodec};
pub use error::{Error, Result};
