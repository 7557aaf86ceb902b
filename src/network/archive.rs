//! Archive Traversal
//!
//! Every archive type describes its layout exactly once, as a static schema
//! table walked by one `transfer` method. The same method runs against an
//! [`ArchiveWriter`] when encoding and an [`ArchiveReader`] when decoding, so
//! field order, flag checks and boolean-channel order cannot drift apart.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  SCHEMA: [FieldSpec { field, gate, precision }, ...]         │
//! │                         │                                    │
//! │              transfer(&mut self, ar)                         │
//! │                 ┌───────┴────────┐                           │
//! │           ArchiveWriter     ArchiveReader                    │
//! │           CodedWriter       CodedReader                      │
//! │           BoolEncoder       BoolDecoder                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prototype references never travel as raw ids. They are resolved through a
//! category of the [`PrototypeEnumTables`] on both sides.

use std::fmt;

use thiserror::Error;

use crate::core::fixed::{from_fixed, to_fixed};
use crate::core::vector::{Orientation, Vector3};
use crate::data::enums::{EnumCategory, PrototypeEnumTables};
use crate::data::ids::PrototypeId;
use super::bools::{BoolDecoder, BoolEncoder};
use super::coded::{CodedReader, CodedWriter};

// =============================================================================
// ERRORS
// =============================================================================

/// Ways a byte stream can be structurally invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedKind {
    /// Stream ended while a field was expected.
    #[error("stream truncated")]
    Truncated,
    /// Varint longer than 64 bits.
    #[error("varint overflows 64 bits")]
    VarintOverflow,
    /// Varint with redundant zero continuation bytes.
    #[error("overlong varint")]
    OverlongVarint,
    /// Value does not fit the field's width.
    #[error("value out of range for field")]
    ValueOutOfRange,
    /// Boolean block with a count of zero or above five.
    #[error("invalid boolean block")]
    EmptyBoolBlock,
    /// Boolean block that an encoder would not produce: stray value bits,
    /// a short block followed by another, or values left unread.
    #[error("non-canonical boolean block")]
    NonCanonicalBools,
    /// List length larger than the bytes left in the stream.
    #[error("list length exceeds remaining bytes")]
    LengthOverflow,
    /// Bytes left over after the top-level archive.
    #[error("{0} trailing bytes")]
    TrailingBytes(usize),
}

/// Codec errors. All of them reject one message; none is process-fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArchiveError {
    /// Stream truncated or internally inconsistent.
    #[error("malformed archive: {0}")]
    Malformed(MalformedKind),

    /// Decoded index outside a category table.
    #[error("unknown {category} reference index {index}")]
    UnknownReferenceIndex {
        /// Category the index was resolved against
        category: EnumCategory,
        /// Index read from the stream
        index: u64,
    },

    /// Prototype to encode is not a member of the category.
    #[error("prototype {id} is not in the {category} enum")]
    UnknownPrototype {
        /// Category the prototype was resolved against
        category: EnumCategory,
        /// Offending prototype
        id: PrototypeId,
    },

    /// Real value not representable at the field's precision.
    #[error("{value} does not fit a fixed-point field with {precision} fraction bits")]
    FixedPointOverflow {
        /// Value being encoded
        value: f32,
        /// Fraction bits of the field
        precision: u32,
    },
}

impl From<MalformedKind> for ArchiveError {
    fn from(kind: MalformedKind) -> Self {
        ArchiveError::Malformed(kind)
    }
}

// =============================================================================
// FLAGS AND SCHEMA TABLES
// =============================================================================

/// 16-bit presence mask, sent as a varint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FlagWord(pub u16);

impl FlagWord {
    /// No bits set.
    pub const EMPTY: Self = Self(0);

    /// Check a bit.
    #[inline]
    pub const fn is_set(self, bit: u8) -> bool {
        self.0 & (1 << bit) != 0
    }

    /// Set or clear a bit.
    #[inline]
    pub fn set(&mut self, bit: u8, on: bool) {
        if on {
            self.0 |= 1 << bit;
        } else {
            self.0 &= !(1 << bit);
        }
    }

    /// Copy with a bit set.
    #[inline]
    pub const fn with(self, bit: u8) -> Self {
        Self(self.0 | (1 << bit))
    }

    /// Indices of the set bits, ascending.
    pub fn bits(self) -> impl Iterator<Item = u8> {
        (0..16u8).filter(move |&bit| self.is_set(bit))
    }
}

impl fmt::Display for FlagWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x} [", self.0)?;
        for (i, bit) in self.bits().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", bit)?;
        }
        f.write_str("]")
    }
}

/// Presence rule for one schema field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    /// Always present.
    Always,
    /// Present when a general flag bit is set.
    Flag(u8),
    /// Present when a location flag bit is set.
    LocFlag(u8),
    /// Present when a location flag bit is clear.
    NotLocFlag(u8),
}

impl Gate {
    /// Evaluate against the flag words read so far.
    #[inline]
    pub const fn is_open(self, flags: FlagWord, loc_flags: FlagWord) -> bool {
        match self {
            Gate::Always => true,
            Gate::Flag(bit) => flags.is_set(bit),
            Gate::LocFlag(bit) => loc_flags.is_set(bit),
            Gate::NotLocFlag(bit) => !loc_flags.is_set(bit),
        }
    }
}

/// One row of a schema table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec<F> {
    /// Field identifier understood by the owning archive.
    pub field: F,
    /// Presence rule.
    pub gate: Gate,
    /// Fraction bits for fixed-point fields, 0 otherwise.
    pub precision: u32,
}

impl<F> FieldSpec<F> {
    /// Field without fixed-point precision.
    pub const fn new(field: F, gate: Gate) -> Self {
        Self { field, gate, precision: 0 }
    }

    /// Fixed-point field.
    pub const fn fixed(field: F, gate: Gate, precision: u32) -> Self {
        Self { field, gate, precision }
    }
}

// =============================================================================
// ARCHIVER
// =============================================================================

/// One direction of the codec.
///
/// Every method takes the field by `&mut`: the writer reads it, the reader
/// overwrites it.
pub trait Archiver {
    /// True when decoding.
    fn is_reading(&self) -> bool;

    /// Unsigned 32-bit varint.
    fn varint32(&mut self, value: &mut u32) -> Result<(), ArchiveError>;

    /// Unsigned 64-bit varint.
    fn varint64(&mut self, value: &mut u64) -> Result<(), ArchiveError>;

    /// Raw little-endian 32-bit integer.
    fn raw_i32(&mut self, value: &mut i32) -> Result<(), ArchiveError>;

    /// Fixed-point real as a zig-zag varint of `round(value * 2^precision)`.
    fn fixed(&mut self, value: &mut f32, precision: u32) -> Result<(), ArchiveError>;

    /// Boolean routed through the packing channel.
    fn boolean(&mut self, value: &mut bool) -> Result<(), ArchiveError>;

    /// Prototype reference as its index in `category`.
    fn prototype(&mut self, id: &mut PrototypeId, category: EnumCategory) -> Result<(), ArchiveError>;

    /// Length prefix of a list whose elements each take at least one byte.
    fn list_len(&mut self, len: &mut usize) -> Result<(), ArchiveError>;

    /// 16-bit flag word as a varint.
    fn flags(&mut self, word: &mut FlagWord) -> Result<(), ArchiveError> {
        let mut raw = word.0 as u32;
        self.varint32(&mut raw)?;
        word.0 = u16::try_from(raw).map_err(|_| MalformedKind::ValueOutOfRange)?;
        Ok(())
    }

    /// Three fixed-point components.
    fn vector3(&mut self, v: &mut Vector3, precision: u32) -> Result<(), ArchiveError> {
        self.fixed(&mut v.x, precision)?;
        self.fixed(&mut v.y, precision)?;
        self.fixed(&mut v.z, precision)
    }

    /// Orientation: all three angles when `full`, else yaw only.
    fn orientation(&mut self, o: &mut Orientation, full: bool, precision: u32) -> Result<(), ArchiveError> {
        self.fixed(&mut o.yaw, precision)?;
        if full {
            self.fixed(&mut o.pitch, precision)?;
            self.fixed(&mut o.roll, precision)?;
        } else if self.is_reading() {
            o.pitch = 0.0;
            o.roll = 0.0;
        }
        Ok(())
    }
}

/// Transfer a length-prefixed list, one element at a time.
pub fn transfer_list<A, T, F>(ar: &mut A, items: &mut Vec<T>, mut element: F) -> Result<(), ArchiveError>
where
    A: Archiver + ?Sized,
    T: Default,
    F: FnMut(&mut A, &mut T) -> Result<(), ArchiveError>,
{
    let mut len = items.len();
    ar.list_len(&mut len)?;
    if ar.is_reading() {
        items.clear();
        items.resize_with(len, T::default);
    }
    for item in items.iter_mut() {
        element(ar, item)?;
    }
    Ok(())
}

/// A schema-typed record that can be walked by an [`Archiver`].
pub trait Archive {
    /// Walk every field in schema order.
    fn transfer<A: Archiver + ?Sized>(&mut self, ar: &mut A) -> Result<(), ArchiveError>;
}

// =============================================================================
// WRITER
// =============================================================================

/// Encoding side: owns the output buffer and the boolean encoder.
#[derive(Debug)]
pub struct ArchiveWriter<'a> {
    out: CodedWriter,
    bools: BoolEncoder,
    enums: &'a PrototypeEnumTables,
}

impl<'a> ArchiveWriter<'a> {
    /// Start an empty archive.
    pub fn new(enums: &'a PrototypeEnumTables) -> Self {
        Self {
            out: CodedWriter::new(),
            bools: BoolEncoder::new(),
            enums,
        }
    }

    /// Finish and return the encoded bytes.
    pub fn finish(self) -> Vec<u8> {
        self.out.into_bytes()
    }
}

impl Archiver for ArchiveWriter<'_> {
    fn is_reading(&self) -> bool {
        false
    }

    fn varint32(&mut self, value: &mut u32) -> Result<(), ArchiveError> {
        self.out.write_varint32(*value);
        Ok(())
    }

    fn varint64(&mut self, value: &mut u64) -> Result<(), ArchiveError> {
        self.out.write_varint64(*value);
        Ok(())
    }

    fn raw_i32(&mut self, value: &mut i32) -> Result<(), ArchiveError> {
        self.out.write_raw_le32(*value as u32);
        Ok(())
    }

    fn fixed(&mut self, value: &mut f32, precision: u32) -> Result<(), ArchiveError> {
        let raw = to_fixed(*value, precision).ok_or(ArchiveError::FixedPointOverflow {
            value: *value,
            precision,
        })?;
        self.out.write_zigzag32(raw);
        Ok(())
    }

    fn boolean(&mut self, value: &mut bool) -> Result<(), ArchiveError> {
        self.bools.write_bool(&mut self.out, *value);
        Ok(())
    }

    fn prototype(&mut self, id: &mut PrototypeId, category: EnumCategory) -> Result<(), ArchiveError> {
        let index = self
            .enums
            .enum_value(*id, category)
            .ok_or(ArchiveError::UnknownPrototype { category, id: *id })?;
        self.out.write_varint64(index);
        Ok(())
    }

    fn list_len(&mut self, len: &mut usize) -> Result<(), ArchiveError> {
        self.out.write_varint64(*len as u64);
        Ok(())
    }
}

// =============================================================================
// READER
// =============================================================================

/// Decoding side: owns the input cursor and the boolean decoder.
#[derive(Debug)]
pub struct ArchiveReader<'a> {
    input: CodedReader<'a>,
    bools: BoolDecoder,
    enums: &'a PrototypeEnumTables,
}

impl<'a> ArchiveReader<'a> {
    /// Start reading at the beginning of `bytes`.
    pub fn new(bytes: &'a [u8], enums: &'a PrototypeEnumTables) -> Self {
        Self {
            input: CodedReader::new(bytes),
            bools: BoolDecoder::new(),
            enums,
        }
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.input.position()
    }

    /// Require that the whole input and every boolean block were consumed.
    pub fn finish(self) -> Result<(), ArchiveError> {
        if self.bools.pending() != 0 {
            return Err(MalformedKind::NonCanonicalBools.into());
        }
        match self.input.remaining() {
            0 => Ok(()),
            n => Err(MalformedKind::TrailingBytes(n).into()),
        }
    }
}

impl Archiver for ArchiveReader<'_> {
    fn is_reading(&self) -> bool {
        true
    }

    fn varint32(&mut self, value: &mut u32) -> Result<(), ArchiveError> {
        *value = self.input.read_varint32()?;
        Ok(())
    }

    fn varint64(&mut self, value: &mut u64) -> Result<(), ArchiveError> {
        *value = self.input.read_varint64()?;
        Ok(())
    }

    fn raw_i32(&mut self, value: &mut i32) -> Result<(), ArchiveError> {
        *value = self.input.read_raw_le32()? as i32;
        Ok(())
    }

    fn fixed(&mut self, value: &mut f32, precision: u32) -> Result<(), ArchiveError> {
        let raw = self.input.read_zigzag32()?;
        let real = from_fixed(raw, precision);
        // Scaled values beyond f32's 24-bit mantissa would re-encode differently.
        if to_fixed(real, precision) != Some(raw) {
            return Err(MalformedKind::ValueOutOfRange.into());
        }
        *value = real;
        Ok(())
    }

    fn boolean(&mut self, value: &mut bool) -> Result<(), ArchiveError> {
        *value = self.bools.read_bool(&mut self.input)?;
        Ok(())
    }

    fn prototype(&mut self, id: &mut PrototypeId, category: EnumCategory) -> Result<(), ArchiveError> {
        let index = self.input.read_varint64()?;
        *id = self
            .enums
            .prototype(index, category)
            .ok_or(ArchiveError::UnknownReferenceIndex { category, index })?;
        Ok(())
    }

    fn list_len(&mut self, len: &mut usize) -> Result<(), ArchiveError> {
        let raw = self.input.read_varint64()?;
        *len = usize::try_from(raw)
            .ok()
            .filter(|&n| n <= self.input.remaining())
            .ok_or(MalformedKind::LengthOverflow)?;
        Ok(())
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Encode one top-level archive.
///
/// Takes `&mut` because encoding walks the same traversal as decoding; the
/// value is never modified.
pub fn encode<T: Archive + ?Sized>(archive: &mut T, enums: &PrototypeEnumTables) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = ArchiveWriter::new(enums);
    archive.transfer(&mut writer)?;
    Ok(writer.finish())
}

/// Decode one top-level archive.
///
/// Only canonical bytes are accepted: no trailing bytes, no overlong varints
/// and no boolean blocks an encoder would have packed differently. Anything
/// accepted re-encodes to the same bytes.
pub fn decode<T: Archive + Default>(bytes: &[u8], enums: &PrototypeEnumTables) -> Result<T, ArchiveError> {
    let mut reader = ArchiveReader::new(bytes, enums);
    let mut archive = T::default();
    archive.transfer(&mut reader)?;
    reader.finish()?;
    Ok(archive)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::blueprint::Blueprint;
    use crate::data::enums::{EnumPolicy, PrototypeCatalog};
    use crate::data::ids::BlueprintId;
    use std::collections::BTreeMap;

    /// Fixture tables:
    /// All = [0, 10, 20, 30, 40, 50, 60], Entity = [0, 20, 40],
    /// Inventory = [0, 30], Power = [0, 10, 50]. 60 is a resource prototype.
    pub(crate) fn fixture_enums() -> PrototypeEnumTables {
        struct Catalog(BTreeMap<PrototypeId, Option<Blueprint>>);

        impl PrototypeCatalog for Catalog {
            fn is_structured(&self, id: PrototypeId) -> bool {
                matches!(self.0.get(&id), Some(Some(_)))
            }
            fn blueprint_of(&self, id: PrototypeId) -> Option<&Blueprint> {
                self.0.get(&id).and_then(Option::as_ref)
            }
        }

        let bindings = [
            (10, Some("PowerPrototype")),
            (20, Some("AvatarPrototype")),
            (30, Some("InventoryPrototype")),
            (40, Some("AgentPrototype")),
            (50, Some("MissilePowerPrototype")),
            (60, None),
        ];
        let catalog = Catalog(
            bindings
                .iter()
                .map(|&(id, binding)| {
                    let blueprint = binding.map(|b| Blueprint::new(BlueprintId(id + 1), b));
                    (PrototypeId(id), blueprint)
                })
                .collect(),
        );
        let ids: Vec<PrototypeId> = catalog.0.keys().copied().collect();
        PrototypeEnumTables::build(ids, &catalog, EnumPolicy::default()).unwrap()
    }

    /// Small record mixing every primitive, with one nested list.
    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        count: u32,
        big: u64,
        raw: i32,
        scale: f32,
        flag: bool,
        power: PrototypeId,
        items: Vec<u64>,
        last: bool,
    }

    impl Archive for Sample {
        fn transfer<A: Archiver + ?Sized>(&mut self, ar: &mut A) -> Result<(), ArchiveError> {
            ar.varint32(&mut self.count)?;
            ar.boolean(&mut self.flag)?;
            ar.varint64(&mut self.big)?;
            ar.raw_i32(&mut self.raw)?;
            ar.fixed(&mut self.scale, 8)?;
            ar.prototype(&mut self.power, EnumCategory::Power)?;
            transfer_list(ar, &mut self.items, |ar, item| ar.varint64(item))?;
            ar.boolean(&mut self.last)
        }
    }

    fn sample() -> Sample {
        Sample {
            count: 3,
            big: 1 << 40,
            raw: -2,
            scale: 1.5,
            flag: true,
            power: PrototypeId(50),
            items: vec![1, 300],
            last: true,
        }
    }

    #[test]
    fn test_sample_bytes() {
        let enums = fixture_enums();
        let bytes = encode(&mut sample(), &enums).unwrap();

        let mut expected = vec![0x03, 0xC2];
        expected.extend([0x80, 0x80, 0x80, 0x80, 0x80, 0x20]);
        expected.extend([0xFE, 0xFF, 0xFF, 0xFF]);
        expected.extend([0x80, 0x06]);
        expected.push(0x02);
        expected.extend([0x02, 0x01, 0xAC, 0x02]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_sample_roundtrip() {
        let enums = fixture_enums();
        let bytes = encode(&mut sample(), &enums).unwrap();
        let decoded: Sample = decode(&bytes, &enums).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let enums = fixture_enums();
        let mut bytes = encode(&mut sample(), &enums).unwrap();
        bytes.push(0x00);
        let err = decode::<Sample>(&bytes, &enums).unwrap_err();
        assert_eq!(err, ArchiveError::Malformed(MalformedKind::TrailingBytes(1)));
    }

    #[test]
    fn test_every_truncation_is_malformed() {
        let enums = fixture_enums();
        let bytes = encode(&mut sample(), &enums).unwrap();
        for cut in 0..bytes.len() {
            let err = decode::<Sample>(&bytes[..cut], &enums).unwrap_err();
            assert!(matches!(err, ArchiveError::Malformed(_)), "cut {}: {:?}", cut, err);
        }
    }

    #[test]
    fn test_unknown_prototype_on_encode() {
        let enums = fixture_enums();
        let mut value = Sample { power: PrototypeId(20), ..sample() };
        let err = encode(&mut value, &enums).unwrap_err();
        assert_eq!(
            err,
            ArchiveError::UnknownPrototype { category: EnumCategory::Power, id: PrototypeId(20) }
        );
    }

    #[test]
    fn test_unknown_reference_index_on_decode() {
        let enums = fixture_enums();
        let mut bytes = encode(&mut sample(), &enums).unwrap();
        // Power index lives after count, bool block, big, raw and scale.
        bytes[14] = 0x05;
        let err = decode::<Sample>(&bytes, &enums).unwrap_err();
        assert_eq!(
            err,
            ArchiveError::UnknownReferenceIndex { category: EnumCategory::Power, index: 5 }
        );
    }

    #[test]
    fn test_fixed_point_overflow() {
        let enums = fixture_enums();
        let mut value = Sample { scale: 1.0e9, ..sample() };
        let err = encode(&mut value, &enums).unwrap_err();
        assert!(matches!(err, ArchiveError::FixedPointOverflow { precision: 8, .. }));
    }

    #[test]
    fn test_inexact_fixed_point_rejected() {
        let enums = fixture_enums();
        let mut out = CodedWriter::new();
        out.write_zigzag32((1 << 24) + 1);
        out.write_zigzag32(1 << 24);
        let bytes = out.into_bytes();

        let mut reader = ArchiveReader::new(&bytes, &enums);
        let mut value = 0.0;
        let err = reader.fixed(&mut value, 0).unwrap_err();
        assert_eq!(err, ArchiveError::Malformed(MalformedKind::ValueOutOfRange));
        reader.fixed(&mut value, 0).unwrap();
        assert_eq!(value, 16_777_216.0);
    }

    #[test]
    fn test_unread_bools_rejected_at_finish() {
        let enums = fixture_enums();
        let mut reader = ArchiveReader::new(&[0xA3], &enums);
        let mut flag = false;
        reader.boolean(&mut flag).unwrap();
        assert!(flag);
        assert_eq!(
            reader.finish().unwrap_err(),
            ArchiveError::Malformed(MalformedKind::NonCanonicalBools)
        );
    }

    #[test]
    fn test_accepted_bytes_reencode_identically() {
        let enums = fixture_enums();
        let bytes = encode(&mut sample(), &enums).unwrap();
        let mut decoded: Sample = decode(&bytes, &enums).unwrap();
        assert_eq!(encode(&mut decoded, &enums).unwrap(), bytes);
    }

    #[test]
    fn test_list_length_overflow() {
        let enums = fixture_enums();
        let mut reader = ArchiveReader::new(&[0x05, 0x01], &enums);
        let mut len = 0;
        let err = reader.list_len(&mut len).unwrap_err();
        assert_eq!(err, ArchiveError::Malformed(MalformedKind::LengthOverflow));
    }

    #[test]
    fn test_flag_word_out_of_range() {
        let enums = fixture_enums();
        let mut out = CodedWriter::new();
        out.write_varint32(0x1_0000);
        let bytes = out.into_bytes();

        let mut reader = ArchiveReader::new(&bytes, &enums);
        let mut word = FlagWord::EMPTY;
        let err = reader.flags(&mut word).unwrap_err();
        assert_eq!(err, ArchiveError::Malformed(MalformedKind::ValueOutOfRange));
    }

    #[test]
    fn test_yaw_only_orientation() {
        let enums = fixture_enums();
        let mut writer = ArchiveWriter::new(&enums);
        let mut o = Orientation::new(1.0, 2.0, 3.0);
        writer.orientation(&mut o, false, 6).unwrap();
        let bytes = writer.finish();
        assert_eq!(bytes, vec![0x80, 0x01]);

        let mut reader = ArchiveReader::new(&bytes, &enums);
        let mut decoded = Orientation::new(9.0, 9.0, 9.0);
        reader.orientation(&mut decoded, false, 6).unwrap();
        assert_eq!(decoded, Orientation::from_yaw(1.0));
        reader.finish().unwrap();
    }

    #[test]
    fn test_gates() {
        let flags = FlagWord::EMPTY.with(3);
        let loc = FlagWord::EMPTY.with(1);
        assert!(Gate::Always.is_open(FlagWord::EMPTY, FlagWord::EMPTY));
        assert!(Gate::Flag(3).is_open(flags, loc));
        assert!(!Gate::Flag(4).is_open(flags, loc));
        assert!(Gate::LocFlag(1).is_open(flags, loc));
        assert!(!Gate::NotLocFlag(1).is_open(flags, loc));
        assert!(Gate::NotLocFlag(0).is_open(flags, loc));
    }

    #[test]
    fn test_flag_word_display() {
        let word = FlagWord::EMPTY.with(0).with(11);
        assert_eq!(word.to_string(), "0x0801 [0 11]");

        let mut cleared = word;
        cleared.set(0, false);
        assert_eq!(cleared.bits().collect::<Vec<_>>(), vec![11]);
    }
}
