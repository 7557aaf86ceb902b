//! Ability Key Mappings
//!
//! Which powers an avatar has bound to its action bar. Every prototype
//! reference here resolves through the All category, since slots may hold
//! any kind of prototype.
//!
//! The `should_persist` flag goes through the boolean channel. In a mapping
//! set all mappings share one channel, so up to five consecutive mappings
//! pack their flags into the block byte placed in the first of them.

use std::fmt;

use crate::data::enums::EnumCategory;
use crate::data::ids::PrototypeId;
use crate::network::archive::{transfer_list, Archive, ArchiveError, Archiver, FieldSpec, FlagWord, Gate};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    PowerSpecIndex,
    ShouldPersist,
    TransformMode,
    Slot0,
    Slot1,
    PowerSlots,
}

const SCHEMA: &[FieldSpec<Field>] = &[
    FieldSpec::new(Field::PowerSpecIndex, Gate::Always),
    FieldSpec::new(Field::ShouldPersist, Gate::Always),
    FieldSpec::new(Field::TransformMode, Gate::Always),
    FieldSpec::new(Field::Slot0, Gate::Always),
    FieldSpec::new(Field::Slot1, Gate::Always),
    FieldSpec::new(Field::PowerSlots, Gate::Always),
];

/// One action-bar layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AbilityKeyMapping {
    /// Power spec this layout belongs to.
    pub power_spec_index: i32,
    /// Whether the layout is saved.
    pub should_persist: bool,
    /// Transform mode the layout is tied to, or invalid.
    pub transform_mode: PrototypeId,
    /// Primary mouse slot.
    pub slot0: PrototypeId,
    /// Secondary mouse slot.
    pub slot1: PrototypeId,
    /// Remaining action-bar slots.
    pub power_slots: Vec<PrototypeId>,
}

impl AbilityKeyMapping {
    fn transfer_field<A: Archiver + ?Sized>(
        &mut self,
        spec: &FieldSpec<Field>,
        ar: &mut A,
    ) -> Result<(), ArchiveError> {
        match spec.field {
            Field::PowerSpecIndex => ar.raw_i32(&mut self.power_spec_index),
            Field::ShouldPersist => ar.boolean(&mut self.should_persist),
            Field::TransformMode => ar.prototype(&mut self.transform_mode, EnumCategory::All),
            Field::Slot0 => ar.prototype(&mut self.slot0, EnumCategory::All),
            Field::Slot1 => ar.prototype(&mut self.slot1, EnumCategory::All),
            Field::PowerSlots => transfer_list(ar, &mut self.power_slots, |ar, slot| {
                ar.prototype(slot, EnumCategory::All)
            }),
        }
    }
}

impl Archive for AbilityKeyMapping {
    fn transfer<A: Archiver + ?Sized>(&mut self, ar: &mut A) -> Result<(), ArchiveError> {
        for spec in SCHEMA {
            if spec.gate.is_open(FlagWord::EMPTY, FlagWord::EMPTY) {
                self.transfer_field(spec, ar)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for AbilityKeyMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PowerSpecIndex: {:#x}", self.power_spec_index)?;
        writeln!(f, "ShouldPersist: {}", self.should_persist)?;
        writeln!(f, "AssociatedTransformMode: {}", self.transform_mode)?;
        writeln!(f, "Slot0: {}", self.slot0)?;
        writeln!(f, "Slot1: {}", self.slot1)?;
        for (i, slot) in self.power_slots.iter().enumerate() {
            writeln!(f, "PowerSlot{}: {}", i, slot)?;
        }
        Ok(())
    }
}

/// Every layout of one avatar, encoded with a single boolean channel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AbilityKeyMappingSet {
    /// Layouts in wire order.
    pub mappings: Vec<AbilityKeyMapping>,
}

impl Archive for AbilityKeyMappingSet {
    fn transfer<A: Archiver + ?Sized>(&mut self, ar: &mut A) -> Result<(), ArchiveError> {
        transfer_list(ar, &mut self.mappings, |ar, mapping| mapping.transfer(ar))
    }
}

impl fmt::Display for AbilityKeyMappingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mapping) in self.mappings.iter().enumerate() {
            writeln!(f, "AbilityKeyMapping{}:", i)?;
            write!(f, "{}", mapping)?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::archive::tests::fixture_enums;
    use crate::network::archive::{decode, encode, MalformedKind};
    use proptest::prelude::*;

    fn mapping(index: i32, persist: bool) -> AbilityKeyMapping {
        AbilityKeyMapping {
            power_spec_index: index,
            should_persist: persist,
            transform_mode: PrototypeId::INVALID,
            slot0: PrototypeId(20),
            slot1: PrototypeId::INVALID,
            power_slots: vec![PrototypeId(10)],
        }
    }

    #[test]
    fn test_mapping_bytes() {
        let enums = fixture_enums();
        let mut m = mapping(1, true);
        let bytes = encode(&mut m, &enums).unwrap();
        assert_eq!(
            bytes,
            vec![0x01, 0x00, 0x00, 0x00, 0x81, 0x00, 0x02, 0x00, 0x01, 0x01]
        );
        assert_eq!(decode::<AbilityKeyMapping>(&bytes, &enums).unwrap(), m);
    }

    #[test]
    fn test_negative_spec_index_is_raw() {
        let enums = fixture_enums();
        let mut m = mapping(-1, false);
        let bytes = encode(&mut m, &enums).unwrap();
        assert_eq!(&bytes[..5], &[0xFF, 0xFF, 0xFF, 0xFF, 0x01]);
        assert_eq!(decode::<AbilityKeyMapping>(&bytes, &enums).unwrap(), m);
    }

    #[test]
    fn test_set_shares_one_bool_block() {
        let enums = fixture_enums();
        let mut set = AbilityKeyMappingSet {
            mappings: vec![mapping(0, true), mapping(1, false), mapping(2, true)],
        };
        let bytes = encode(&mut set, &enums).unwrap();

        // count, then the first mapping carries the block for all three
        let mut expected = vec![0x03];
        expected.extend([0x00, 0x00, 0x00, 0x00, 0xA3, 0x00, 0x02, 0x00, 0x01, 0x01]);
        expected.extend([0x01, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x01]);
        expected.extend([0x02, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x01]);
        assert_eq!(bytes, expected);

        let decoded: AbilityKeyMappingSet = decode(&bytes, &enums).unwrap();
        assert_eq!(decoded, set);
    }

    #[test]
    fn test_sixth_mapping_opens_new_block() {
        let enums = fixture_enums();
        let mut set = AbilityKeyMappingSet {
            mappings: (0..7).map(|i| mapping(i, i % 2 == 0)).collect(),
        };
        let bytes = encode(&mut set, &enums).unwrap();
        let decoded: AbilityKeyMappingSet = decode(&bytes, &enums).unwrap();
        assert_eq!(decoded, set);
        // 7 mappings of 9 bytes, 2 block bytes, 1 count byte
        assert_eq!(bytes.len(), 7 * 9 + 2 + 1);
    }

    #[test]
    fn test_bad_slot_index() {
        let enums = fixture_enums();
        let bytes = [0x01, 0x00, 0x00, 0x00, 0x81, 0x00, 0x07, 0x00, 0x00];
        assert_eq!(
            decode::<AbilityKeyMapping>(&bytes, &enums).unwrap_err(),
            ArchiveError::UnknownReferenceIndex { category: EnumCategory::All, index: 7 }
        );
    }

    #[test]
    fn test_missing_bool_block() {
        let enums = fixture_enums();
        let bytes = [0x01, 0x00, 0x00, 0x00];
        assert_eq!(
            decode::<AbilityKeyMapping>(&bytes, &enums).unwrap_err(),
            ArchiveError::Malformed(MalformedKind::Truncated)
        );
    }

    #[test]
    fn test_unused_bool_count_rejected() {
        let enums = fixture_enums();
        // Block claims five values; a lone mapping reads one.
        let bytes = [0x01, 0x00, 0x00, 0x00, 0x85, 0x00, 0x02, 0x00, 0x01, 0x01];
        assert_eq!(
            decode::<AbilityKeyMapping>(&bytes, &enums).unwrap_err(),
            ArchiveError::Malformed(MalformedKind::NonCanonicalBools)
        );
    }

    #[test]
    fn test_overlong_slot_index_rejected() {
        let enums = fixture_enums();
        let bytes = [0x01, 0x00, 0x00, 0x00, 0x81, 0x00, 0x82, 0x00, 0x00, 0x01, 0x01];
        assert_eq!(
            decode::<AbilityKeyMapping>(&bytes, &enums).unwrap_err(),
            ArchiveError::Malformed(MalformedKind::OverlongVarint)
        );
    }

    #[test]
    fn test_split_set_blocks_rejected() {
        let enums = fixture_enums();
        // Two mappings, each with its own one-value block.
        let mut bytes = vec![0x02];
        bytes.extend([0x00, 0x00, 0x00, 0x00, 0x81, 0x00, 0x02, 0x00, 0x01, 0x01]);
        bytes.extend([0x01, 0x00, 0x00, 0x00, 0x81, 0x00, 0x02, 0x00, 0x01, 0x01]);
        assert_eq!(
            decode::<AbilityKeyMappingSet>(&bytes, &enums).unwrap_err(),
            ArchiveError::Malformed(MalformedKind::NonCanonicalBools)
        );
    }

    #[test]
    fn test_display_dump() {
        let dump = mapping(1, true).to_string();
        assert!(dump.contains("PowerSpecIndex: 0x1"));
        assert!(dump.contains("ShouldPersist: true"));
        assert!(dump.contains("PowerSlot0: 0x000000000000000a"));
    }

    proptest! {
        #[test]
        fn prop_set_roundtrip(
            layouts in prop::collection::vec(
                (any::<i32>(), any::<bool>(), prop::collection::vec(0usize..7, 0..5)),
                0..12,
            )
        ) {
            let enums = fixture_enums();
            let all = enums.table(EnumCategory::All).to_vec();
            let mut set = AbilityKeyMappingSet {
                mappings: layouts
                    .into_iter()
                    .map(|(index, persist, slots)| AbilityKeyMapping {
                        power_spec_index: index,
                        should_persist: persist,
                        transform_mode: all[slots.len() % all.len()],
                        slot0: all[1],
                        slot1: PrototypeId::INVALID,
                        power_slots: slots.into_iter().map(|i| all[i]).collect(),
                    })
                    .collect(),
            };

            let bytes = encode(&mut set, &enums).unwrap();
            let mut decoded: AbilityKeyMappingSet = decode(&bytes, &enums).unwrap();
            prop_assert_eq!(&decoded, &set);
            prop_assert_eq!(encode(&mut decoded, &enums).unwrap(), bytes);
        }
    }
}
