//! Inventory Location
//!
//! Where an entity sits: which container, which inventory of that container,
//! which slot. Embedded twice in the entity snapshot (current and previous
//! location).

use std::fmt;

use crate::data::enums::EnumCategory;
use crate::data::ids::PrototypeId;
use crate::network::archive::{Archive, ArchiveError, Archiver};

/// Container, inventory and slot of an owned entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InventoryLocation {
    /// Entity owning the inventory.
    pub container_id: u64,
    /// Inventory prototype, resolved through the Inventory category.
    pub inventory: PrototypeId,
    /// Slot within the inventory.
    pub slot: u32,
}

impl InventoryLocation {
    /// Create a location.
    pub const fn new(container_id: u64, inventory: PrototypeId, slot: u32) -> Self {
        Self { container_id, inventory, slot }
    }
}

impl Archive for InventoryLocation {
    fn transfer<A: Archiver + ?Sized>(&mut self, ar: &mut A) -> Result<(), ArchiveError> {
        ar.varint64(&mut self.container_id)?;
        ar.prototype(&mut self.inventory, EnumCategory::Inventory)?;
        ar.varint32(&mut self.slot)
    }
}

impl fmt::Display for InventoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "container {:#x}, inventory {}, slot {}",
            self.container_id, self.inventory, self.slot
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::archive::tests::fixture_enums;
    use crate::network::archive::{decode, encode};

    #[test]
    fn test_inventory_location_bytes() {
        let enums = fixture_enums();
        let mut loc = InventoryLocation::new(0x100, PrototypeId(30), 7);
        let bytes = encode(&mut loc, &enums).unwrap();
        assert_eq!(bytes, vec![0x80, 0x02, 0x01, 0x07]);
        assert_eq!(decode::<InventoryLocation>(&bytes, &enums).unwrap(), loc);
    }

    #[test]
    fn test_inventory_must_be_inventory_category() {
        let enums = fixture_enums();
        let mut loc = InventoryLocation::new(1, PrototypeId(20), 0);
        assert!(matches!(
            encode(&mut loc, &enums),
            Err(ArchiveError::UnknownPrototype { category: EnumCategory::Inventory, .. })
        ));
    }
}
