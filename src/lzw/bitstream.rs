// Variable-width integer packing, least-significant bit first.
//
// A code of width `w` occupies the next `w` bits of the stream; bit 0 of the
// code is the lowest unused bit of the current byte. Codes are not aligned
// and carry no separators. The final partial byte is zero-padded.
//
// Example (two 9-bit codes, 65 then 257):
//
//   bits  0..9  = 0b0_0100_0001   (65)
//   bits  9..18 = 0b1_0000_0001   (257)
//   bytes       = 41 02 02

use crate::error::{Error, Result};
use crate::io::{ByteSink, ByteSource};

use super::{Code, MAX_CODE_WIDTH};

/// Default number of bytes pulled from the source per refill.
pub const DEFAULT_READ_CHUNK: usize = 64 * 1024;

#[inline]
fn low_bits(width: u32) -> u64 {
    (1u64 << width) - 1
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Packs codes into bytes and pushes each completed byte to a sink.
pub struct BitWriter<'a, S: ByteSink + ?Sized> {
    sink: &'a mut S,
    acc: u64,
    nbits: u32,
    bytes_written: u64,
}

impl<'a, S: ByteSink + ?Sized> BitWriter<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self {
            sink,
            acc: 0,
            nbits: 0,
            bytes_written: 0,
        }
    }

    /// Append the `width` low-order bits of `value`.
    ///
    /// Every byte completed by this call goes to the sink immediately, one
    /// `write_bytes` call per byte. Leftover bits stay buffered.
    pub fn write(&mut self, value: Code, width: u8) -> Result<()> {
        debug_assert!((1..=MAX_CODE_WIDTH).contains(&width));
        let width = u32::from(width);
        self.acc |= (u64::from(value) & low_bits(width)) << self.nbits;
        self.nbits += width;
        while self.nbits >= 8 {
            self.push_byte(self.acc as u8)?;
            self.acc >>= 8;
            self.nbits -= 8;
        }
        Ok(())
    }

    /// Bits written but not yet part of a completed byte (0..=7).
    #[cfg(test)]
    fn pending_bits(&self) -> u32 {
        self.nbits
    }

    /// Emit the trailing partial byte (zero-padded) if one was started.
    ///
    /// Returns the total number of bytes written by this writer.
    pub fn finish(mut self) -> Result<u64> {
        if self.nbits > 0 {
            self.push_byte(self.acc as u8)?;
            self.acc = 0;
            self.nbits = 0;
        }
        Ok(self.bytes_written)
    }

    fn push_byte(&mut self, byte: u8) -> Result<()> {
        self.sink
            .write_bytes(&[byte])
            .map_err(Error::SinkWriteFailed)?;
        self.bytes_written += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Unpacks codes from a byte source, refilling lazily in chunks.
pub struct BitReader<'a, R: ByteSource + ?Sized> {
    source: &'a mut R,
    buf: Vec<u8>,
    pos: usize,
    len: usize,
    exhausted: bool,
    acc: u64,
    nbits: u32,
    bytes_read: u64,
}

impl<'a, R: ByteSource + ?Sized> BitReader<'a, R> {
    pub fn new(source: &'a mut R) -> Self {
        Self::with_chunk_size(source, DEFAULT_READ_CHUNK)
    }

    pub fn with_chunk_size(source: &'a mut R, chunk_size: usize) -> Self {
        Self {
            source,
            buf: vec![0u8; chunk_size.max(1)],
            pos: 0,
            len: 0,
            exhausted: false,
            acc: 0,
            nbits: 0,
            bytes_read: 0,
        }
    }

    /// Read the next `width`-bit code.
    ///
    /// Returns `Ok(None)` when the source is exhausted on a code boundary.
    /// Leftover bits count as a boundary only if they could be the writer's
    /// padding, i.e. fewer than 8 of them and all zero; anything else is
    /// `TruncatedStream`.
    pub fn read(&mut self, width: u8) -> Result<Option<Code>> {
        debug_assert!((1..=MAX_CODE_WIDTH).contains(&width));
        let width = u32::from(width);
        while self.nbits < width {
            match self.next_byte()? {
                Some(byte) => {
                    self.acc |= u64::from(byte) << self.nbits;
                    self.nbits += 8;
                }
                None if self.nbits < 8 && self.acc == 0 => {
                    self.nbits = 0;
                    return Ok(None);
                }
                None => return Err(Error::TruncatedStream),
            }
        }
        let code = (self.acc & low_bits(width)) as Code;
        self.acc >>= width;
        self.nbits -= width;
        Ok(Some(code))
    }

    /// Bytes consumed from the source so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        if self.pos == self.len {
            if self.exhausted {
                return Ok(None);
            }
            let n = self
                .source
                .read_bytes(&mut self.buf)
                .map_err(Error::SourceReadFailed)?;
            if n == 0 {
                self.exhausted = true;
                return Ok(None);
            }
            self.pos = 0;
            self.len = n.min(self.buf.len());
        }
        let byte = self.buf[self.pos];
        self.pos += 1;
        self.bytes_read += 1;
        Ok(Some(byte))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Read, Write};

    fn pack(codes: &[(Code, u8)]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut w = BitWriter::new(&mut out);
        for &(code, width) in codes {
            w.write(code, width).unwrap();
        }
        w.finish().unwrap();
        out
    }

    /// Counts sink calls to check the one-call-per-byte contract.
    struct CountingSink {
        calls: usize,
        data: Vec<u8>,
    }

    impl Write for CountingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingSource;

    impl Read for FailingSource {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device gone"))
        }
    }

    #[test]
    fn packs_lsb_first() {
        assert_eq!(pack(&[(65, 9), (257, 9)]), vec![0x41, 0x02, 0x02]);
        assert_eq!(pack(&[(1, 1), (0, 1), (1, 1)]), vec![0b101]);
        assert_eq!(pack(&[(0xFF, 4)]), vec![0x0F]);
    }

    #[test]
    fn single_code_pads_trailing_byte() {
        assert_eq!(pack(&[(b'A' as Code, 9)]), vec![0x41, 0x00]);
        assert_eq!(pack(&[(0x1FF, 9)]), vec![0xFF, 0x01]);
    }

    #[test]
    fn empty_writer_emits_nothing() {
        assert!(pack(&[]).is_empty());
    }

    #[test]
    fn one_sink_call_per_completed_byte() {
        let mut sink = CountingSink {
            calls: 0,
            data: Vec::new(),
        };
        let mut w = BitWriter::new(&mut sink);
        w.write(0x1234, 13).unwrap();
        assert_eq!(w.pending_bits(), 5);
        w.write(0x7FFF_FFFF, 31).unwrap();
        let total = w.finish().unwrap();
        assert_eq!(total, 6);
        assert_eq!(sink.calls, 6);
        assert_eq!(sink.data.len(), 6);
    }

    #[test]
    fn reads_back_mixed_widths() {
        let codes: Vec<(Code, u8)> = (1..=31u8)
            .map(|w| (((1u64 << w) - 1) as Code & 0x5555_5555, w))
            .collect();
        let bytes = pack(&codes);
        let mut src: &[u8] = &bytes;
        let mut r = BitReader::with_chunk_size(&mut src, 3);
        for &(code, width) in &codes {
            assert_eq!(r.read(width).unwrap(), Some(code));
        }
        assert_eq!(r.read(9).unwrap(), None);
        assert_eq!(r.bytes_read(), bytes.len() as u64);
    }

    #[test]
    fn empty_source_is_end_of_stream() {
        let mut src: &[u8] = &[];
        let mut r = BitReader::new(&mut src);
        assert_eq!(r.read(9).unwrap(), None);
        // Stays at end.
        assert_eq!(r.read(9).unwrap(), None);
    }

    #[test]
    fn whole_dangling_byte_is_truncation() {
        let mut src: &[u8] = &[0x41];
        let mut r = BitReader::new(&mut src);
        assert!(matches!(r.read(9), Err(Error::TruncatedStream)));
    }

    #[test]
    fn nonzero_padding_is_truncation() {
        // One 9-bit code, then 7 leftover bits with bit 9 set.
        let mut src: &[u8] = &[0x41, 0x02];
        let mut r = BitReader::new(&mut src);
        assert_eq!(r.read(9).unwrap(), Some(0x41));
        assert!(matches!(r.read(9), Err(Error::TruncatedStream)));
    }

    #[test]
    fn zero_padding_is_clean_end() {
        let mut src: &[u8] = &[0x41, 0x00];
        let mut r = BitReader::new(&mut src);
        assert_eq!(r.read(9).unwrap(), Some(0x41));
        assert_eq!(r.read(9).unwrap(), None);
    }

    #[test]
    fn sink_failure_propagates() {
        let mut sink = FailingSink;
        let mut w = BitWriter::new(&mut sink);
        // Fewer than 8 bits: nothing reaches the sink yet.
        w.write(1, 7).unwrap();
        assert!(matches!(w.write(1, 9), Err(Error::SinkWriteFailed(_))));
    }

    #[test]
    fn source_failure_propagates() {
        let mut src = FailingSource;
        let mut r = BitReader::new(&mut src);
        assert!(matches!(r.read(9), Err(Error::SourceReadFailed(_))));
    }
}
