// LZW compression.
//
// The matcher walks the prefix index one input byte at a time. While
// `(current code, next byte)` is a known entry the match extends; when it is
// not, `current` is the longest entry matching at the cursor, so it is emitted
// and `current + byte` is learned. Learned sequences are unique between
// resets, so there is never a tie to break.
//
// Width growth happens just before an entry is learned. The decoder learns
// each entry one code later than the encoder, and both sides then read and
// write every code at the same width.

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::io::{ByteSink, ByteSource};
use crate::lzw::{BitWriter, Code, MAX_ENTRY_LEN, RESET_CODE, StreamHeader};

use super::DictionaryCodec;

// ---------------------------------------------------------------------------
// Lookahead buffer
// ---------------------------------------------------------------------------

/// Chunked read buffer with a cursor.
///
/// Refilled from the source whenever the cursor reaches the end. The pending
/// match lives in the encoder, so the buffer never has to hold a whole entry.
struct Lookahead<'a, R: ByteSource + ?Sized> {
    source: &'a mut R,
    buf: Vec<u8>,
    pos: usize,
    len: usize,
    consumed: u64,
    eof: bool,
}

impl<'a, R: ByteSource + ?Sized> Lookahead<'a, R> {
    fn new(source: &'a mut R, chunk_size: usize) -> Self {
        Self {
            source,
            buf: vec![0u8; chunk_size.max(1)],
            pos: 0,
            len: 0,
            consumed: 0,
            eof: false,
        }
    }

    /// Byte under the cursor, or `None` once the source is exhausted.
    #[inline]
    fn peek(&mut self) -> Result<Option<u8>> {
        if self.pos == self.len && !self.refill()? {
            return Ok(None);
        }
        Ok(Some(self.buf[self.pos]))
    }

    #[inline]
    fn advance(&mut self) {
        debug_assert!(self.pos < self.len);
        self.pos += 1;
        self.consumed += 1;
    }

    fn refill(&mut self) -> Result<bool> {
        if self.eof {
            return Ok(false);
        }
        let n = self
            .source
            .read_bytes(&mut self.buf)
            .map_err(Error::SourceReadFailed)?;
        if n == 0 {
            self.eof = true;
            return Ok(false);
        }
        self.pos = 0;
        self.len = n.min(self.buf.len());
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Compression
// ---------------------------------------------------------------------------

impl DictionaryCodec {
    /// Compress everything `source` yields into `sink`.
    ///
    /// Writes the header byte, then one code per longest dictionary match,
    /// then the zero-padded trailing byte if one was started.
    pub fn compress<R, W>(&mut self, source: &mut R, sink: &mut W) -> Result<()>
    where
        R: ByteSource + ?Sized,
        W: ByteSink + ?Sized,
    {
        let header = StreamHeader::default();
        self.begin_pass(header.code_width);
        header.encode(sink)?;

        let mut input = Lookahead::new(source, self.opts.read_chunk_size);
        let mut writer = BitWriter::new(sink);
        // Longest entry matched so far at the cursor, with its length.
        let mut current: Option<(Code, usize)> = None;

        while let Some(byte) = input.peek()? {
            let Some((code, len)) = current else {
                current = Some((Code::from(byte), 1));
                input.advance();
                continue;
            };
            if let Some(&longer) = self.prefixes.get(&(code, byte)) {
                current = Some((longer, len + 1));
                input.advance();
                continue;
            }
            self.emit(&mut writer, code)?;
            // `byte` is not consumed: it starts the next match.
            self.learn(&mut writer, code, len, byte)?;
            current = None;
        }

        if let Some((code, _)) = current {
            self.emit(&mut writer, code)?;
        }

        let packed = writer.finish()?;
        self.stats.bytes_in = input.consumed;
        self.stats.bytes_out = StreamHeader::LEN as u64 + packed;
        debug!(
            "compressed {} -> {} bytes ({} codes, {} resets, max width {})",
            self.stats.bytes_in,
            self.stats.bytes_out,
            self.stats.codes,
            self.stats.resets,
            self.stats.max_code_width
        );
        Ok(())
    }

    fn emit<W: ByteSink + ?Sized>(
        &mut self,
        writer: &mut BitWriter<'_, W>,
        code: Code,
    ) -> Result<()> {
        debug_assert!(
            self.dict.contains(code),
            "matcher produced unallocated code {code}"
        );
        let width = self.dict.code_width();
        writer.write(code, width)?;
        self.stats.codes += 1;
        self.stats.max_code_width = self.stats.max_code_width.max(width);
        Ok(())
    }

    /// Learn `bytes(prefix) + byte`, or reset if the dictionary is exhausted.
    fn learn<W: ByteSink + ?Sized>(
        &mut self,
        writer: &mut BitWriter<'_, W>,
        prefix: Code,
        prefix_len: usize,
        byte: u8,
    ) -> Result<()> {
        self.dict.grow_if_full()?;

        if self.dictionary_exhausted(prefix_len) {
            self.emit(writer, RESET_CODE)?;
            self.stats.resets += 1;
            trace!(
                "reset after {} learned entries ({} arena bytes)",
                self.dict.learned(),
                self.dict.arena_len()
            );
            self.dict.reset();
            self.prefixes.clear();
            return Ok(());
        }

        let code = self.dict.push(prefix, byte)?;
        self.prefixes.insert((prefix, byte), code);
        Ok(())
    }

    /// True when the next entry would need the last code below
    /// `2^max_code_width`, or would exceed the entry length limit.
    ///
    /// Stopping one code short keeps the reset marker itself within
    /// `max_code_width` bits: the decoder, one entry behind, has not widened.
    fn dictionary_exhausted(&self, prefix_len: usize) -> bool {
        let limit = 1u64 << self.opts.max_code_width;
        u64::from(self.dict.next_code()) + 1 >= limit || prefix_len >= MAX_ENTRY_LEN
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
