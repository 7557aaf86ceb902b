//! Boolean Bit-Packing Channel
//!
//! Single-bit fields are not written inline. They are packed into shared
//! block bytes, up to five values per block:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  bit   7    6    5    4    3    2 1 0                       │
//! │       b0   b1   b2   b3   b4   [count]                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A block byte is placed in the stream at the position of the first boolean
//! it holds; later booleans in the same block are patched into that byte.
//! The decoder reads a block when its cursor is empty and then serves values
//! from it in order. Both sides therefore agree only if booleans are visited
//! in exactly the same order, across nested archives too. The channel lives
//! inside one archiver for one encode or decode call and is never shared.

use super::archive::{ArchiveError, MalformedKind};
use super::coded::{CodedReader, CodedWriter};

/// Values per block byte.
pub const BOOLS_PER_BLOCK: u8 = 5;

/// Mask of the count bits.
const COUNT_MASK: u8 = 0x07;

/// Bit holding the next value to be read.
const HEAD_BIT: u8 = 0x80;

/// Encode-side cursor.
#[derive(Clone, Debug, Default)]
pub struct BoolEncoder {
    /// Stream position of the open block byte.
    block: Option<usize>,
    /// Values stored in the open block.
    count: u8,
}

impl BoolEncoder {
    /// Create an encoder with no open block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value.
    ///
    /// Opens a new block byte at the current stream position when no block is
    /// open or the open one is full.
    pub fn write_bool(&mut self, out: &mut CodedWriter, value: bool) {
        let position = match self.block {
            Some(position) if self.count < BOOLS_PER_BLOCK => position,
            _ => {
                let position = out.position();
                out.write_byte(0);
                self.block = Some(position);
                self.count = 0;
                position
            }
        };

        let mut byte = out.byte_at(position);
        if value {
            byte |= HEAD_BIT >> self.count;
        }
        self.count += 1;
        byte = (byte & !COUNT_MASK) | self.count;
        out.patch_byte(position, byte);
    }
}

/// Decode-side cursor.
#[derive(Clone, Debug, Default)]
pub struct BoolDecoder {
    /// Remaining values at the top bits, remaining count in the low bits.
    buffer: u8,
    /// Count of the last block read, 0 before the first.
    last_count: u8,
}

impl BoolDecoder {
    /// Create a decoder with an empty cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Values left in the current block.
    #[inline]
    pub fn pending(&self) -> u8 {
        self.buffer & COUNT_MASK
    }

    /// Read the next value, refilling from the stream when empty.
    ///
    /// Blocks must be laid out as [`BoolEncoder`] lays them out: only a full
    /// block may be followed by another, and value bits past the count are
    /// zero.
    pub fn read_bool(&mut self, input: &mut CodedReader<'_>) -> Result<bool, ArchiveError> {
        if self.pending() == 0 {
            if self.last_count != 0 && self.last_count < BOOLS_PER_BLOCK {
                return Err(ArchiveError::Malformed(MalformedKind::NonCanonicalBools));
            }
            let block = input.read_byte()?;
            let count = block & COUNT_MASK;
            if count == 0 || count > BOOLS_PER_BLOCK {
                return Err(ArchiveError::Malformed(MalformedKind::EmptyBoolBlock));
            }
            if block & (0xFF >> count) & !COUNT_MASK != 0 {
                return Err(ArchiveError::Malformed(MalformedKind::NonCanonicalBools));
            }
            self.buffer = block;
            self.last_count = count;
        }

        let count = self.pending();
        let value = self.buffer & HEAD_BIT != 0;
        self.buffer = ((self.buffer & !COUNT_MASK) << 1) | (count - 1);
        Ok(value)
    }
}

// =============================================================================
// TESTS
// =============================================================================
