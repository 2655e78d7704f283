// Adaptive LZW dictionary.
//
// Layout:
//   - codes 0..=255   resolve into `LITERALS`, a process-wide static table
//   - code 256        the reset marker, empty payload
//   - codes 257..     `(offset, len)` spans into one shared byte arena
//
// A learned entry is always "an existing entry + one byte", so building one
// copies the prefix bytes inside the arena. Reset truncates the span list and
// the arena in place; the literal table is never touched.

use log::trace;

use crate::error::{Error, Result};

use super::{Code, FIRST_DYNAMIC_CODE, INITIAL_CODE_WIDTH, MAX_CODE_WIDTH, MAX_ENTRY_LEN, RESET_CODE};

/// One byte per literal code; entry `c` for `c < 256` is `LITERALS[c..=c]`.
static LITERALS: [u8; 256] = build_literals();

const fn build_literals() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < table.len() {
        table[i] = i as u8;
        i += 1;
    }
    table
}

#[derive(Debug, Clone, Copy)]
struct Span {
    offset: usize,
    len: u16,
}

/// Length of an entry extended by one byte, if it stays within the format limit.
fn extended_len(len: usize) -> Result<u16> {
    let new_len = len + 1;
    if new_len > MAX_ENTRY_LEN {
        return Err(Error::EntryTooLong { len: new_len });
    }
    Ok(new_len as u16)
}

/// Code table shared in shape by the encoder and decoder.
///
/// Besides the entries it tracks the current code width, which both sides
/// derive from `next_code` alone.
///
/// Each learned entry owns a full copy of its bytes, so the arena holds the
/// sum of all entry lengths until `reset`.
#[derive(Debug)]
pub struct Dictionary {
    spans: Vec<Span>,
    arena: Vec<u8>,
    code_width: u8,
    base_width: u8,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary {
    /// Dictionary with only the fixed entries and a 9-bit code width.
    pub fn new() -> Self {
        Self::with_base_width(INITIAL_CODE_WIDTH)
    }

    /// Dictionary whose code width starts (and resets) at `base_width`.
    pub fn with_base_width(base_width: u8) -> Self {
        debug_assert!((INITIAL_CODE_WIDTH..=MAX_CODE_WIDTH).contains(&base_width));
        Self {
            spans: Vec::new(),
            arena: Vec::new(),
            code_width: base_width,
            base_width,
        }
    }

    /// Change the width restored on reset, then reset.
    pub fn set_base_width(&mut self, base_width: u8) {
        debug_assert!((INITIAL_CODE_WIDTH..=MAX_CODE_WIDTH).contains(&base_width));
        self.base_width = base_width;
        self.reset();
    }

    /// Drop every learned entry and restore the base code width.
    ///
    /// Storage capacity is kept for the next pass.
    pub fn reset(&mut self) {
        self.spans.clear();
        self.arena.clear();
        self.code_width = self.base_width;
    }

    /// The code the next learned entry will receive.
    #[inline]
    pub fn next_code(&self) -> Code {
        FIRST_DYNAMIC_CODE + self.spans.len() as Code
    }

    /// Width, in bits, of the codes currently on the wire.
    #[inline]
    pub fn code_width(&self) -> u8 {
        self.code_width
    }

    /// Number of learned entries (codes 257 and up).
    pub fn learned(&self) -> usize {
        self.spans.len()
    }

    /// Bytes held by learned entries.
    pub fn arena_len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn contains(&self, code: Code) -> bool {
        code < self.next_code()
    }

    /// Bytes for `code`, or `None` if it has not been allocated.
    #[inline]
    pub fn get(&self, code: Code) -> Option<&[u8]> {
        if code < RESET_CODE {
            let i = code as usize;
            return Some(&LITERALS[i..=i]);
        }
        if code == RESET_CODE {
            return Some(&[]);
        }
        let span = self.spans.get((code - FIRST_DYNAMIC_CODE) as usize)?;
        Some(&self.arena[span.offset..span.offset + usize::from(span.len)])
    }

    #[cfg(test)]
    fn entry_len(&self, code: Code) -> Option<usize> {
        self.get(code).map(<[u8]>::len)
    }

    #[inline]
    pub fn first_byte(&self, code: Code) -> Option<u8> {
        self.get(code)?.first().copied()
    }

    /// Append `bytes(prefix) + byte` at `next_code` and return its code.
    pub fn push(&mut self, prefix: Code, byte: u8) -> Result<Code> {
        let code = self.next_code();
        let offset = self.arena.len();
        let len = if prefix < RESET_CODE {
            let len = extended_len(1)?;
            self.arena.push(prefix as u8);
            len
        } else {
            let span = match prefix.checked_sub(FIRST_DYNAMIC_CODE) {
                Some(i) => self.spans.get(i as usize).copied(),
                None => None,
            };
            let Some(span) = span else {
                return Err(Error::UnknownCode {
                    code: prefix,
                    next_code: code,
                });
            };
            let len = extended_len(usize::from(span.len))?;
            self.arena
                .extend_from_within(span.offset..span.offset + usize::from(span.len));
            len
        };
        self.arena.push(byte);
        self.spans.push(Span { offset, len });
        Ok(code)
    }

    /// Widen codes by one bit if `next_code` has reached `2^code_width`.
    ///
    /// Returns whether the width changed.
    pub fn grow_if_full(&mut self) -> Result<bool> {
        if u64::from(self.next_code()) < 1u64 << self.code_width {
            return Ok(false);
        }
        if self.code_width >= MAX_CODE_WIDTH {
            return Err(Error::CodeSpaceExhausted {
                width: MAX_CODE_WIDTH,
            });
        }
        self.code_width += 1;
        trace!(
            "code width -> {} bits at next_code {}",
            self.code_width,
            self.next_code()
        );
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
