//! Coded Byte Streams
//!
//! Low-level wire primitives shared by every archive:
//! - base-128 varints (32- and 64-bit)
//! - zig-zag signed varints
//! - raw little-endian 32-bit words
//!
//! The writer appends to a `Vec<u8>`; the reader walks a borrowed slice and
//! reports truncation instead of panicking.

use crate::core::fixed::{zigzag_decode32, zigzag_encode32};
use super::archive::{ArchiveError, MalformedKind};

/// Longest legal 64-bit varint in bytes.
pub const MAX_VARINT64_LEN: usize = 10;

/// Append-only wire writer.
#[derive(Clone, Debug, Default)]
pub struct CodedWriter {
    buf: Vec<u8>,
}

impl CodedWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Bytes written so far.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes written.
    #[inline]
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Finish writing.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Write one byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Overwrite a byte already written.
    ///
    /// # Panics
    /// Panics if `position` has not been written yet.
    #[inline]
    pub fn patch_byte(&mut self, position: usize, byte: u8) {
        self.buf[position] = byte;
    }

    /// Read back a byte already written.
    #[inline]
    pub fn byte_at(&self, position: usize) -> u8 {
        self.buf[position]
    }

    /// Write a 64-bit varint.
    pub fn write_varint64(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buf.push((value as u8 & 0x7F) | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
    }

    /// Write a 32-bit varint.
    #[inline]
    pub fn write_varint32(&mut self, value: u32) {
        self.write_varint64(value as u64);
    }

    /// Write a zig-zag folded signed varint.
    #[inline]
    pub fn write_zigzag32(&mut self, value: i32) {
        self.write_varint32(zigzag_encode32(value));
    }

    /// Write a raw little-endian 32-bit word.
    #[inline]
    pub fn write_raw_le32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }
}

/// Bounds-checked wire reader over a byte slice.
#[derive(Clone, Debug)]
pub struct CodedReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> CodedReader<'a> {
    /// Create a reader at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Check if every byte has been consumed.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    /// Read one byte.
    #[inline]
    pub fn read_byte(&mut self) -> Result<u8, ArchiveError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(ArchiveError::Malformed(MalformedKind::Truncated))?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read a 64-bit varint. Only the shortest encoding is accepted.
    pub fn read_varint64(&mut self) -> Result<u64, ArchiveError> {
        let mut value: u64 = 0;
        for i in 0..MAX_VARINT64_LEN {
            let byte = self.read_byte()?;
            // The tenth byte may only carry bit 63.
            if i == MAX_VARINT64_LEN - 1 && byte > 1 {
                return Err(ArchiveError::Malformed(MalformedKind::VarintOverflow));
            }
            if i > 0 && byte == 0 {
                return Err(ArchiveError::Malformed(MalformedKind::OverlongVarint));
            }
            value |= ((byte & 0x7F) as u64) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ArchiveError::Malformed(MalformedKind::VarintOverflow))
    }

    /// Read a 32-bit varint. Values above `u32::MAX` are malformed.
    pub fn read_varint32(&mut self) -> Result<u32, ArchiveError> {
        let value = self.read_varint64()?;
        u32::try_from(value).map_err(|_| ArchiveError::Malformed(MalformedKind::ValueOutOfRange))
    }

    /// Read a zig-zag folded signed varint.
    #[inline]
    pub fn read_zigzag32(&mut self) -> Result<i32, ArchiveError> {
        Ok(zigzag_decode32(self.read_varint32()?))
    }

    /// Read a raw little-endian 32-bit word.
    pub fn read_raw_le32(&mut self) -> Result<u32, ArchiveError> {
        let end = self.pos + 4;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(ArchiveError::Malformed(MalformedKind::Truncated))?;
        self.pos = end;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn varint_bytes(value: u64) -> Vec<u8> {
        let mut writer = CodedWriter::new();
        writer.write_varint64(value);
        writer.into_bytes()
    }

    #[test]
    fn test_varint_known_encodings() {
        assert_eq!(varint_bytes(0), vec![0x00]);
        assert_eq!(varint_bytes(1), vec![0x01]);
        assert_eq!(varint_bytes(127), vec![0x7F]);
        assert_eq!(varint_bytes(128), vec![0x80, 0x01]);
        assert_eq!(varint_bytes(300), vec![0xAC, 0x02]);
        assert_eq!(varint_bytes(u64::MAX).len(), MAX_VARINT64_LEN);
    }

    #[test]
    fn test_varint_read() {
        let bytes = [0xAC, 0x02, 0x7F];
        let mut reader = CodedReader::new(&bytes);
        assert_eq!(reader.read_varint64().unwrap(), 300);
        assert_eq!(reader.read_varint32().unwrap(), 127);
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_varint_extremes() {
        let bytes = varint_bytes(u64::MAX);
        assert_eq!(CodedReader::new(&bytes).read_varint64().unwrap(), u64::MAX);
    }

    #[test]
    fn test_varint_truncated() {
        let bytes = [0x80, 0x80];
        let err = CodedReader::new(&bytes).read_varint64().unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed(MalformedKind::Truncated)));
    }

    #[test]
    fn test_varint_overflow() {
        let bytes = [0xFF; 11];
        let err = CodedReader::new(&bytes).read_varint64().unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed(MalformedKind::VarintOverflow)));

        let mut tenth_too_big = vec![0xFF; 9];
        tenth_too_big.push(0x02);
        let err = CodedReader::new(&tenth_too_big).read_varint64().unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed(MalformedKind::VarintOverflow)));
    }

    #[test]
    fn test_overlong_varint_rejected() {
        // 2 padded with an empty continuation byte.
        let err = CodedReader::new(&[0x82, 0x00]).read_varint64().unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed(MalformedKind::OverlongVarint)));

        let err = CodedReader::new(&[0x80, 0x80, 0x00]).read_varint64().unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed(MalformedKind::OverlongVarint)));

        // A lone zero byte is the canonical 0.
        assert_eq!(CodedReader::new(&[0x00]).read_varint64().unwrap(), 0);
    }

    #[test]
    fn test_varint32_out_of_range() {
        let bytes = varint_bytes(u32::MAX as u64 + 1);
        let err = CodedReader::new(&bytes).read_varint32().unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed(MalformedKind::ValueOutOfRange)));
    }

    #[test]
    fn test_zigzag_stream() {
        let mut writer = CodedWriter::new();
        writer.write_zigzag32(-1);
        writer.write_zigzag32(600);
        assert_eq!(writer.as_bytes(), &[0x01, 0xB0, 0x09]);

        let bytes = writer.into_bytes();
        let mut reader = CodedReader::new(&bytes);
        assert_eq!(reader.read_zigzag32().unwrap(), -1);
        assert_eq!(reader.read_zigzag32().unwrap(), 600);
    }

    #[test]
    fn test_raw_le32() {
        let mut writer = CodedWriter::new();
        writer.write_raw_le32(0x0403_0201);
        assert_eq!(writer.as_bytes(), &[0x01, 0x02, 0x03, 0x04]);

        let mut reader = CodedReader::new(&[0x01, 0x02, 0x03]);
        assert!(matches!(
            reader.read_raw_le32(),
            Err(ArchiveError::Malformed(MalformedKind::Truncated))
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_patch_byte() {
        let mut writer = CodedWriter::new();
        writer.write_byte(0);
        writer.write_byte(7);
        writer.patch_byte(0, 0x81);
        assert_eq!(writer.byte_at(0), 0x81);
        assert_eq!(writer.as_bytes(), &[0x81, 0x07]);
    }
}
