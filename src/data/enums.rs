//! Prototype Enum Tables
//!
//! Dense, sorted index spaces over prototype ids. The wire protocol never
//! sends a 64-bit prototype id; it sends the prototype's index in one of
//! these tables.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  All        [INVALID, p1, p2, p3, p4, p5, ...]   every proto │
//! │  Entity     [INVALID, p2, p5, ...]               entity-like │
//! │  Inventory  [INVALID, p4, ...]                inventory-like │
//! │  Power      [INVALID, p1, ...]                    power-like │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every table is sorted by raw id because it is built by filtering the
//! already-sorted prototype directory. Index 0 is always the invalid id.
//! Identical source data therefore yields identical tables on every run.

use std::collections::HashMap;
use std::fmt;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::blueprint::Blueprint;
use super::ids::PrototypeId;
use super::DataError;

/// Domain separator for the enum table fingerprint.
const FINGERPRINT_DOMAIN: &[u8] = b"GAMEDATA_PROTOTYPE_ENUMS_V1";

/// Prototype enum categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumCategory {
    /// Every prototype, structured and resource alike.
    All = 0,
    /// Entity-like structured prototypes.
    Entity = 1,
    /// Inventory-like structured prototypes.
    Inventory = 2,
    /// Power-like structured prototypes.
    Power = 3,
}

impl EnumCategory {
    /// All categories in table order.
    pub const ALL: [EnumCategory; 4] = [
        EnumCategory::All,
        EnumCategory::Entity,
        EnumCategory::Inventory,
        EnumCategory::Power,
    ];

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EnumCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnumCategory::All => "All",
            EnumCategory::Entity => "Entity",
            EnumCategory::Inventory => "Inventory",
            EnumCategory::Power => "Power",
        };
        f.write_str(name)
    }
}

/// Per-prototype classification data supplied by the data loader.
pub trait PrototypeCatalog {
    /// True for schema-derived prototypes, false for resource-derived ones.
    fn is_structured(&self, id: PrototypeId) -> bool;

    /// Blueprint of a structured prototype.
    fn blueprint_of(&self, id: PrototypeId) -> Option<&Blueprint>;
}

/// Verification policy applied after the tables are built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnumPolicy {
    /// Accept an Inventory table holding only the invalid sentinel.
    pub allow_empty_inventory: bool,
}

/// The four prototype enum tables with inverse lookups.
#[derive(Clone, Debug)]
pub struct PrototypeEnumTables {
    /// index -> prototype, per category
    tables: [Vec<PrototypeId>; 4],
    /// prototype -> index, per category (lookup only, never iterated)
    lookups: [HashMap<PrototypeId, u64>; 4],
}

impl PrototypeEnumTables {
    /// Build and verify the tables.
    ///
    /// `sorted_ids` must be every registered prototype in ascending raw order,
    /// as produced by the prototype directory. Resource prototypes land in
    /// `All` only. A structured prototype lands in at most one of the narrow
    /// categories, decided by its blueprint's runtime binding.
    pub fn build<I, C>(sorted_ids: I, catalog: &C, policy: EnumPolicy) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = PrototypeId>,
        C: PrototypeCatalog + ?Sized,
    {
        let mut all = vec![PrototypeId::INVALID];
        all.extend(sorted_ids);
        debug_assert!(
            all[1..].windows(2).all(|w| w[0] < w[1]),
            "prototype ids must be strictly ascending"
        );

        let mut entity = vec![PrototypeId::INVALID];
        let mut inventory = vec![PrototypeId::INVALID];
        let mut power = vec![PrototypeId::INVALID];

        for &id in &all[1..] {
            if !catalog.is_structured(id) {
                continue;
            }

            let blueprint = catalog
                .blueprint_of(id)
                .ok_or(DataError::MissingBlueprint { prototype: id })?;

            match blueprint.category() {
                Some(EnumCategory::Entity) => entity.push(id),
                Some(EnumCategory::Inventory) => inventory.push(id),
                Some(EnumCategory::Power) => power.push(id),
                Some(EnumCategory::All) | None => {}
            }
        }

        let tables = [all, entity, inventory, power];
        let lookups = [
            Self::inverse(&tables[0]),
            Self::inverse(&tables[1]),
            Self::inverse(&tables[2]),
            Self::inverse(&tables[3]),
        ];

        let enums = Self { tables, lookups };
        enums.verify(policy)?;

        for category in EnumCategory::ALL {
            debug!("{} enum: {} entries", category, enums.len(category));
        }

        Ok(enums)
    }

    fn inverse(table: &[PrototypeId]) -> HashMap<PrototypeId, u64> {
        table
            .iter()
            .enumerate()
            .map(|(index, &id)| (id, index as u64))
            .collect()
    }

    /// Fail with [`DataError::EmptyCategory`] if any table holds only the
    /// sentinel. Inventory is exempt when the policy allows it.
    pub fn verify(&self, policy: EnumPolicy) -> Result<(), DataError> {
        for category in EnumCategory::ALL {
            if category == EnumCategory::Inventory && policy.allow_empty_inventory {
                continue;
            }
            if self.len(category) <= 1 {
                return Err(DataError::EmptyCategory(category));
            }
        }
        Ok(())
    }

    /// Prototype at `index` in `category`.
    #[inline]
    pub fn prototype(&self, index: u64, category: EnumCategory) -> Option<PrototypeId> {
        let table = &self.tables[category.slot()];
        usize::try_from(index).ok().and_then(|i| table.get(i)).copied()
    }

    /// Index of `id` in `category`. The invalid id is always index 0.
    #[inline]
    pub fn enum_value(&self, id: PrototypeId, category: EnumCategory) -> Option<u64> {
        self.lookups[category.slot()].get(&id).copied()
    }

    /// Full table for a category, sentinel included.
    #[inline]
    pub fn table(&self, category: EnumCategory) -> &[PrototypeId] {
        &self.tables[category.slot()]
    }

    /// Number of entries in a category, sentinel included.
    #[inline]
    pub fn len(&self, category: EnumCategory) -> usize {
        self.tables[category.slot()].len()
    }

    /// Largest valid index in the All table.
    #[inline]
    pub fn max_enum_value(&self) -> u64 {
        (self.len(EnumCategory::All) - 1) as u64
    }

    /// Power-relative indices of every power whose name contains `filter`.
    ///
    /// The sentinel is skipped. Prototypes without a resolvable name never
    /// match.
    pub fn power_indices_matching<'a, F>(&self, filter: &str, name_of: F) -> Vec<u64>
    where
        F: Fn(PrototypeId) -> Option<&'a str>,
    {
        self.table(EnumCategory::Power)
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, id)| name_of(**id).is_some_and(|name| name.contains(filter)))
            .map(|(index, _)| index as u64)
            .collect()
    }

    /// SHA-256 over every table in category order.
    ///
    /// Two processes built from the same source data report the same value.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(FINGERPRINT_DOMAIN);
        for table in &self.tables {
            hasher.update((table.len() as u64).to_le_bytes());
            for id in table {
                hasher.update(id.0.to_le_bytes());
            }
        }
        hasher.finalize().into()
    }
}

// =============================================================================
// TESTS
// =============================================================================
