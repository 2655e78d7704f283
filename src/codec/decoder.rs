// LZW decompression.
//
// State progression:
//
//   Start -> ReadingHeader -> Streaming -> (Reset -> Streaming)* -> Done
//                  |              |
//                  +--------------+--> Failed
//
// The decoder learns each entry one code late: reading code `k` completes the
// entry the encoder created right after emitting code `k - 1`, using the first
// byte of code `k`. When `k` is that very entry (`code == next_code`), its
// first byte is the first byte of the previous code.

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::io::{ByteSink, ByteSource};
use crate::lzw::{BitReader, Code, RESET_CODE, StreamHeader};

use super::DictionaryCodec;

/// Decoder progress, observable after a `decompress` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecoderState {
    /// No decode has run yet.
    #[default]
    Start,
    /// Waiting for the initial code width byte.
    ReadingHeader,
    /// Reading codes.
    Streaming,
    /// A reset marker was the last code read. Transient: `decompress` always
    /// returns in `Done` or `Failed`.
    Reset,
    /// Stream ended cleanly on a code boundary.
    Done,
    /// Stream was malformed or an I/O fault occurred. Terminal.
    Failed,
}

impl DictionaryCodec {
    /// Decompress the stream `source` yields into `sink`.
    ///
    /// On error, whatever was already written to `sink` is undefined and
    /// should be discarded.
    pub fn decompress<R, W>(&mut self, source: &mut R, sink: &mut W) -> Result<()>
    where
        R: ByteSource + ?Sized,
        W: ByteSink + ?Sized,
    {
        self.decoder_state = DecoderState::Start;
        match self.decode_stream(source, sink) {
            Ok(()) => {
                self.decoder_state = DecoderState::Done;
                debug!(
                    "decompressed {} -> {} bytes ({} codes, {} resets, max width {})",
                    self.stats.bytes_in,
                    self.stats.bytes_out,
                    self.stats.codes,
                    self.stats.resets,
                    self.stats.max_code_width
                );
                Ok(())
            }
            Err(e) => {
                self.decoder_state = DecoderState::Failed;
                debug!(
                    "decompress failed after {} codes ({} bytes out): {e}",
                    self.stats.codes, self.stats.bytes_out
                );
                Err(e)
            }
        }
    }

    fn decode_stream<R, W>(&mut self, source: &mut R, sink: &mut W) -> Result<()>
    where
        R: ByteSource + ?Sized,
        W: ByteSink + ?Sized,
    {
        self.decoder_state = DecoderState::ReadingHeader;
        let header = StreamHeader::decode(source)?;
        self.begin_pass(header.code_width);
        self.decoder_state = DecoderState::Streaming;

        let mut reader = BitReader::with_chunk_size(source, self.opts.read_chunk_size);
        let mut prev: Option<Code> = None;

        loop {
            let width = self.dict.code_width();
            let read = reader.read(width);
            self.stats.bytes_in = StreamHeader::LEN as u64 + reader.bytes_read();
            let Some(code) = read? else {
                return Ok(());
            };
            self.stats.codes += 1;
            self.stats.max_code_width = self.stats.max_code_width.max(width);

            if code == RESET_CODE {
                self.decoder_state = DecoderState::Reset;
                trace!(
                    "reset marker after {} learned entries",
                    self.dict.learned()
                );
                self.dict.reset();
                self.stats.resets += 1;
                prev = None;
                continue;
            }
            self.decoder_state = DecoderState::Streaming;

            let next_code = self.dict.next_code();
            let unknown = Error::UnknownCode { code, next_code };
            if let Some(prev) = prev {
                if code > next_code {
                    return Err(unknown);
                }
                let first = if code < next_code {
                    self.dict.first_byte(code)
                } else {
                    self.dict.first_byte(prev)
                };
                let first = first.ok_or(unknown)?;
                self.dict.push(prev, first)?;
                self.dict.grow_if_full()?;
            } else if code >= next_code {
                return Err(unknown);
            }

            let Some(bytes) = self.dict.get(code) else {
                return Err(Error::UnknownCode {
                    code,
                    next_code: self.dict.next_code(),
                });
            };
            sink.write_bytes(bytes).map_err(Error::SinkWriteFailed)?;
            self.stats.bytes_out += bytes.len() as u64;
            prev = Some(code);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
