// Byte I/O seams and file-level helpers.
//
// The codec never touches files directly. It pulls from a `ByteSource` and
// pushes to a `ByteSink`; every `std::io::Read` / `std::io::Write` is one.
//
// `compress_file()` and `decompress_file()` wrap a codec pass with buffered
// file I/O. With the `file-io` feature they also hash the uncompressed side
// with SHA-256 as it streams.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

#[cfg(feature = "file-io")]
use sha2::{Digest, Sha256};

use crate::codec::{CodecOptions, DictionaryCodec};
use crate::error::Error;

// ---------------------------------------------------------------------------
// Source / sink traits
// ---------------------------------------------------------------------------

/// Where compressed or uncompressed bytes come from.
pub trait ByteSource {
    /// Fill up to `buf.len()` bytes. `Ok(0)` means end of input.
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Where output bytes go. A call either accepts all of `buf` or fails.
pub trait ByteSink {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()>;
}

impl<R: Read + ?Sized> ByteSource for R {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }
}

impl<W: Write + ?Sized> ByteSink for W {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        self.write_all(buf)
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `compress_file()`.
#[derive(Debug, Clone)]
pub struct CompressStats {
    /// Uncompressed input size in bytes.
    pub input_size: u64,
    /// Compressed output size in bytes, header included.
    pub output_size: u64,
    pub codes: u64,
    pub resets: u64,
    pub max_code_width: u8,
    /// SHA-256 of the uncompressed input (if `file-io` feature is enabled).
    pub input_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `decompress_file()`.
#[derive(Debug, Clone)]
pub struct DecompressStats {
    /// Compressed input size in bytes, header included.
    pub input_size: u64,
    /// Reconstructed output size in bytes.
    pub output_size: u64,
    pub codes: u64,
    pub resets: u64,
    pub max_code_width: u8,
    /// SHA-256 of the reconstructed output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

/// What a compressed stream contains, as reported by `inspect()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub header_code_width: u8,
    pub compressed_size: u64,
    pub decoded_size: u64,
    pub codes: u64,
    pub resets: u64,
    pub max_code_width: u8,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// Opening, creating, flushing or stat-ing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The codec pass failed.
    #[error(transparent)]
    Codec(#[from] Error),
}

// ---------------------------------------------------------------------------
// Default buffer size
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// compress_file / decompress_file
// ---------------------------------------------------------------------------

/// Compress `input_path` into `output_path`.
///
/// Both files are streamed; neither is held in memory. When the `file-io`
/// feature is enabled, the SHA-256 of the input is computed as it is read.
pub fn compress_file(
    input_path: &Path,
    output_path: &Path,
    opts: CodecOptions,
) -> Result<CompressStats, FileError> {
    let mut codec = DictionaryCodec::with_options(opts)?;

    let input = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);

    #[cfg(feature = "file-io")]
    let input_sha256 = {
        let mut reader = HashingReader::new(input);
        codec.compress(&mut reader, &mut writer)?;
        Some(reader.finalize())
    };
    #[cfg(not(feature = "file-io"))]
    let input_sha256: Option<[u8; 32]> = {
        let mut reader = input;
        codec.compress(&mut reader, &mut writer)?;
        None
    };

    writer.flush()?;

    let stats = codec.stats();
    Ok(CompressStats {
        input_size: stats.bytes_in,
        output_size: stats.bytes_out,
        codes: stats.codes,
        resets: stats.resets,
        max_code_width: stats.max_code_width,
        input_sha256,
    })
}

/// Decompress `input_path` into `output_path`.
///
/// On error the partially written output is left in place; callers should
/// remove it. When the `file-io` feature is enabled, the SHA-256 of the
/// output is computed as it is written.
pub fn decompress_file(
    input_path: &Path,
    output_path: &Path,
) -> Result<DecompressStats, FileError> {
    let mut codec = DictionaryCodec::new();

    let mut reader = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let output_file = File::create(output_path)?;
    let mut output_writer = BufWriter::with_capacity(BUF_SIZE, output_file);

    #[cfg(feature = "file-io")]
    let output_sha256 = {
        let mut hashing_writer = HashingWriter::new(&mut output_writer);
        codec.decompress(&mut reader, &mut hashing_writer)?;
        Some(hashing_writer.finalize())
    };
    #[cfg(not(feature = "file-io"))]
    let output_sha256: Option<[u8; 32]> = {
        codec.decompress(&mut reader, &mut output_writer)?;
        None
    };

    output_writer.flush()?;

    let stats = codec.stats();
    Ok(DecompressStats {
        input_size: stats.bytes_in,
        output_size: stats.bytes_out,
        codes: stats.codes,
        resets: stats.resets,
        max_code_width: stats.max_code_width,
        output_sha256,
    })
}

/// Decode a stream without keeping the output and report what it holds.
///
/// The output is discarded but the dictionary is not: every learned entry is
/// held in full until the next reset marker, so memory grows with the sum of
/// entry lengths. A stream of self-referential codes makes that quadratic in
/// the number of codes (n codes learn entries of 2..=n+1 bytes).
pub fn inspect<R: ByteSource + ?Sized>(source: &mut R) -> crate::Result<StreamSummary> {
    let mut codec = DictionaryCodec::new();
    codec.decompress(source, &mut io::sink())?;
    let stats = codec.stats();
    Ok(StreamSummary {
        header_code_width: stats.initial_code_width,
        compressed_size: stats.bytes_in,
        decoded_size: stats.bytes_out,
        codes: stats.codes,
        resets: stats.resets,
        max_code_width: stats.max_code_width,
    })
}

// ---------------------------------------------------------------------------
// Hashing adapters (used with file-io feature)
// ---------------------------------------------------------------------------

#[cfg(feature = "file-io")]
struct HashingReader<R: Read> {
    inner: R,
    hasher: Sha256,
}

#[cfg(feature = "file-io")]
impl<R: Read> HashingReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    fn finalize(self) -> [u8; 32] {
        self.hasher.finalize().into()
    }
}

#[cfg(feature = "file-io")]
impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

#[cfg(feature = "file-io")]
struct HashingWriter<'a, W: Write> {
    inner: &'a mut W,
    hasher: Sha256,
}

#[cfg(feature = "file-io")]
impl<'a, W: Write> HashingWriter<'a, W> {
    fn new(inner: &'a mut W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    fn finalize(self) -> [u8; 32] {
        self.hasher.finalize().into()
    }
}

#[cfg(feature = "file-io")]
impl<W: Write> Write for HashingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
