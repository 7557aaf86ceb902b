//! Entity Snapshot
//!
//! Base replication record sent when an entity enters a client's interest
//! area. Five mandatory fields are followed by optional fields, each gated
//! by one bit of the general or location flag word.
//!
//! ## Wire Order
//!
//! ```text
//! ┌────────────────────────────┬──────────────────────────────────┐
//! │ replication policy         │ varint32                         │
//! │ entity id                  │ varint64                         │
//! │ prototype                  │ Entity enum index                │
//! │ general flags              │ varint32 (16 bits)               │
//! │ location flags             │ varint32 (16 bits)               │
//! ├────────────────────────────┼──────────────────────────────────┤
//! │ interest policies      [5] │ varint32                         │
//! │ avatar world instance  [9] │ varint32                         │
//! │ database id            [8] │ varint32                         │
//! │ position               [0] │ 3 x fixed, 3 bits                │
//! │ orientation            [0] │ 3 or 1 x fixed, 6 bits           │
//! │ locomotion       [loc !1]  │ embedded, gated by loc 3..9      │
//! │ bounds scale          [11] │ fixed, 8 bits                    │
//! │ source entity id       [3] │ varint64                         │
//! │ source position        [4] │ 3 x fixed, 3 bits                │
//! │ active power           [1] │ Power enum index                 │
//! │ inventory location     [6] │ embedded                         │
//! │ previous inv. location [7] │ embedded                         │
//! │ attachments           [14] │ varint64 count + varint64 each   │
//! └────────────────────────────┴──────────────────────────────────┘
//! ```
//!
//! General flag bits 2, 12, 13 and 15 have no known meaning. They are read,
//! kept and written back unchanged.

use std::fmt;

use crate::core::fixed::{ORIENTATION_PRECISION, POSITION_PRECISION, SCALE_PRECISION};
use crate::core::vector::{Orientation, Vector3};
use crate::data::enums::EnumCategory;
use crate::data::ids::PrototypeId;
use crate::network::archive::{
    transfer_list, Archive, ArchiveError, Archiver, FieldSpec, FlagWord, Gate,
};
use super::inventory::InventoryLocation;
use super::locomotion::{LocomotionState, LOC_FULL_ORIENTATION, LOC_NO_LOCOMOTION};

// =============================================================================
// GENERAL FLAG BITS
// =============================================================================

/// Position and orientation present.
pub const FLAG_HAS_LOCATION: u8 = 0;
/// Active power present.
pub const FLAG_HAS_ACTIVE_POWER: u8 = 1;
/// Source entity id present.
pub const FLAG_HAS_SOURCE_ENTITY: u8 = 3;
/// Source position present.
pub const FLAG_HAS_SOURCE_POSITION: u8 = 4;
/// Interest policies present.
pub const FLAG_HAS_INTEREST_POLICIES: u8 = 5;
/// Inventory location present.
pub const FLAG_HAS_INVENTORY_LOCATION: u8 = 6;
/// Previous inventory location present.
pub const FLAG_HAS_PREVIOUS_INVENTORY_LOCATION: u8 = 7;
/// Database id present.
pub const FLAG_HAS_DB_ID: u8 = 8;
/// Avatar world instance id present.
pub const FLAG_HAS_AVATAR_WORLD_INSTANCE: u8 = 9;
/// Client should snap to the position instead of interpolating.
pub const FLAG_SNAP_TO_POSITION: u8 = 10;
/// Bounds scale override present.
pub const FLAG_HAS_BOUNDS_SCALE: u8 = 11;
/// Attachment list present.
pub const FLAG_HAS_ATTACHMENTS: u8 = 14;

/// Bits with no known meaning, carried through untouched.
pub const RESERVED_FLAGS: [u8; 4] = [2, 12, 13, 15];

/// Replication policy used by freshly created snapshots.
pub const DEFAULT_REPLICATION_POLICY: u32 = 0x20;

// =============================================================================
// SCHEMA
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    ReplicationPolicy,
    EntityId,
    Prototype,
    Flags,
    LocationFlags,
    InterestPolicies,
    AvatarWorldInstanceId,
    DbId,
    Position,
    Orientation,
    Locomotion,
    BoundsScale,
    SourceEntityId,
    SourcePosition,
    ActivePower,
    InventoryLocation,
    PreviousInventoryLocation,
    Attachments,
}

const SCHEMA: &[FieldSpec<Field>] = &[
    FieldSpec::new(Field::ReplicationPolicy, Gate::Always),
    FieldSpec::new(Field::EntityId, Gate::Always),
    FieldSpec::new(Field::Prototype, Gate::Always),
    FieldSpec::new(Field::Flags, Gate::Always),
    FieldSpec::new(Field::LocationFlags, Gate::Always),
    FieldSpec::new(Field::InterestPolicies, Gate::Flag(FLAG_HAS_INTEREST_POLICIES)),
    FieldSpec::new(Field::AvatarWorldInstanceId, Gate::Flag(FLAG_HAS_AVATAR_WORLD_INSTANCE)),
    FieldSpec::new(Field::DbId, Gate::Flag(FLAG_HAS_DB_ID)),
    FieldSpec::fixed(Field::Position, Gate::Flag(FLAG_HAS_LOCATION), POSITION_PRECISION),
    FieldSpec::fixed(Field::Orientation, Gate::Flag(FLAG_HAS_LOCATION), ORIENTATION_PRECISION),
    FieldSpec::new(Field::Locomotion, Gate::NotLocFlag(LOC_NO_LOCOMOTION)),
    FieldSpec::fixed(Field::BoundsScale, Gate::Flag(FLAG_HAS_BOUNDS_SCALE), SCALE_PRECISION),
    FieldSpec::new(Field::SourceEntityId, Gate::Flag(FLAG_HAS_SOURCE_ENTITY)),
    FieldSpec::fixed(Field::SourcePosition, Gate::Flag(FLAG_HAS_SOURCE_POSITION), POSITION_PRECISION),
    FieldSpec::new(Field::ActivePower, Gate::Flag(FLAG_HAS_ACTIVE_POWER)),
    FieldSpec::new(Field::InventoryLocation, Gate::Flag(FLAG_HAS_INVENTORY_LOCATION)),
    FieldSpec::new(Field::PreviousInventoryLocation, Gate::Flag(FLAG_HAS_PREVIOUS_INVENTORY_LOCATION)),
    FieldSpec::new(Field::Attachments, Gate::Flag(FLAG_HAS_ATTACHMENTS)),
];

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Replicated base state of one entity.
///
/// Fields whose gate bit is clear are neither written nor read; after a
/// decode they hold their defaults. The `with_*` builders set a value and
/// its gate bit together.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntitySnapshot {
    /// Replication policy bits.
    pub replication_policy: u32,
    /// Entity id.
    pub entity_id: u64,
    /// Entity prototype, resolved through the Entity category.
    pub prototype: PrototypeId,
    /// General flag word.
    pub flags: FlagWord,
    /// Location flag word.
    pub location_flags: FlagWord,
    /// Interest policy bitmask.
    pub interest_policies: u32,
    /// Avatar world instance id.
    pub avatar_world_instance_id: u32,
    /// Persisted database id.
    pub db_id: u32,
    /// Position.
    pub position: Vector3,
    /// Orientation; yaw only unless [`LOC_FULL_ORIENTATION`] is set.
    pub orientation: Orientation,
    /// Movement state.
    pub locomotion: LocomotionState,
    /// Bounds scale override.
    pub bounds_scale: f32,
    /// Entity this one originates from.
    pub source_entity_id: u64,
    /// Position this entity originates from.
    pub source_position: Vector3,
    /// Power being used, resolved through the Power category.
    pub active_power: PrototypeId,
    /// Current inventory location.
    pub inventory_location: InventoryLocation,
    /// Previous inventory location.
    pub previous_inventory_location: InventoryLocation,
    /// Opaque attachment ids.
    pub attachments: Vec<u64>,
}

impl EntitySnapshot {
    /// Snapshot with only the mandatory fields.
    ///
    /// The locomotion state is present but empty, which takes zero bytes.
    pub fn new(entity_id: u64, prototype: PrototypeId) -> Self {
        Self {
            replication_policy: DEFAULT_REPLICATION_POLICY,
            entity_id,
            prototype,
            ..Default::default()
        }
    }

    /// Set position and orientation.
    pub fn with_location(mut self, position: Vector3, orientation: Orientation) -> Self {
        self.position = position;
        self.orientation = orientation;
        self.flags.set(FLAG_HAS_LOCATION, true);
        self.location_flags.set(LOC_FULL_ORIENTATION, !orientation.is_yaw_only());
        self
    }

    /// Set or clear the snap-to-position hint.
    pub fn with_snap(mut self, snap: bool) -> Self {
        self.flags.set(FLAG_SNAP_TO_POSITION, snap);
        self
    }

    /// Attach a locomotion state.
    pub fn with_locomotion(mut self, locomotion: LocomotionState) -> Self {
        locomotion.apply_presence(&mut self.location_flags);
        self.location_flags.set(LOC_NO_LOCOMOTION, false);
        self.locomotion = locomotion;
        self
    }

    /// Send no locomotion state at all.
    pub fn without_locomotion(mut self) -> Self {
        self.locomotion = LocomotionState::default();
        self.locomotion.apply_presence(&mut self.location_flags);
        self.location_flags.set(LOC_NO_LOCOMOTION, true);
        self
    }

    /// Set the interest policy bitmask.
    pub fn with_interest_policies(mut self, policies: u32) -> Self {
        self.interest_policies = policies;
        self.flags.set(FLAG_HAS_INTEREST_POLICIES, true);
        self
    }

    /// Set the avatar world instance id.
    pub fn with_avatar_world_instance(mut self, id: u32) -> Self {
        self.avatar_world_instance_id = id;
        self.flags.set(FLAG_HAS_AVATAR_WORLD_INSTANCE, true);
        self
    }

    /// Set the database id.
    pub fn with_db_id(mut self, db_id: u32) -> Self {
        self.db_id = db_id;
        self.flags.set(FLAG_HAS_DB_ID, true);
        self
    }

    /// Set the bounds scale override.
    pub fn with_bounds_scale(mut self, scale: f32) -> Self {
        self.bounds_scale = scale;
        self.flags.set(FLAG_HAS_BOUNDS_SCALE, true);
        self
    }

    /// Set the source entity.
    pub fn with_source_entity(mut self, entity_id: u64) -> Self {
        self.source_entity_id = entity_id;
        self.flags.set(FLAG_HAS_SOURCE_ENTITY, true);
        self
    }

    /// Set the source position.
    pub fn with_source_position(mut self, position: Vector3) -> Self {
        self.source_position = position;
        self.flags.set(FLAG_HAS_SOURCE_POSITION, true);
        self
    }

    /// Set the active power.
    pub fn with_active_power(mut self, power: PrototypeId) -> Self {
        self.active_power = power;
        self.flags.set(FLAG_HAS_ACTIVE_POWER, true);
        self
    }

    /// Set the current inventory location.
    pub fn with_inventory_location(mut self, location: InventoryLocation) -> Self {
        self.inventory_location = location;
        self.flags.set(FLAG_HAS_INVENTORY_LOCATION, true);
        self
    }

    /// Set the previous inventory location.
    pub fn with_previous_inventory_location(mut self, location: InventoryLocation) -> Self {
        self.previous_inventory_location = location;
        self.flags.set(FLAG_HAS_PREVIOUS_INVENTORY_LOCATION, true);
        self
    }

    /// Set the attachment list.
    pub fn with_attachments(mut self, attachments: Vec<u64>) -> Self {
        self.attachments = attachments;
        self.flags.set(FLAG_HAS_ATTACHMENTS, true);
        self
    }

    /// Check if the snap-to-position hint is set.
    #[inline]
    pub fn snaps(&self) -> bool {
        self.flags.is_set(FLAG_SNAP_TO_POSITION)
    }

    /// Reserved general flag bits that are set.
    pub fn reserved_flags(&self) -> FlagWord {
        let mut word = FlagWord::EMPTY;
        for bit in RESERVED_FLAGS {
            word.set(bit, self.flags.is_set(bit));
        }
        word
    }

    fn transfer_field<A: Archiver + ?Sized>(
        &mut self,
        spec: &FieldSpec<Field>,
        ar: &mut A,
    ) -> Result<(), ArchiveError> {
        match spec.field {
            Field::ReplicationPolicy => ar.varint32(&mut self.replication_policy),
            Field::EntityId => ar.varint64(&mut self.entity_id),
            Field::Prototype => ar.prototype(&mut self.prototype, EnumCategory::Entity),
            Field::Flags => ar.flags(&mut self.flags),
            Field::LocationFlags => ar.flags(&mut self.location_flags),
            Field::InterestPolicies => ar.varint32(&mut self.interest_policies),
            Field::AvatarWorldInstanceId => ar.varint32(&mut self.avatar_world_instance_id),
            Field::DbId => ar.varint32(&mut self.db_id),
            Field::Position => ar.vector3(&mut self.position, spec.precision),
            Field::Orientation => {
                let full = self.location_flags.is_set(LOC_FULL_ORIENTATION);
                ar.orientation(&mut self.orientation, full, spec.precision)
            }
            Field::Locomotion => self.locomotion.transfer_with(ar, self.location_flags),
            Field::BoundsScale => ar.fixed(&mut self.bounds_scale, spec.precision),
            Field::SourceEntityId => ar.varint64(&mut self.source_entity_id),
            Field::SourcePosition => ar.vector3(&mut self.source_position, spec.precision),
            Field::ActivePower => ar.prototype(&mut self.active_power, EnumCategory::Power),
            Field::InventoryLocation => self.inventory_location.transfer(ar),
            Field::PreviousInventoryLocation => self.previous_inventory_location.transfer(ar),
            Field::Attachments => transfer_list(ar, &mut self.attachments, |ar, id| ar.varint64(id)),
        }
    }
}

impl Archive for EntitySnapshot {
    fn transfer<A: Archiver + ?Sized>(&mut self, ar: &mut A) -> Result<(), ArchiveError> {
        for spec in SCHEMA {
            if spec.gate.is_open(self.flags, self.location_flags) {
                self.transfer_field(spec, ar)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for EntitySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ReplicationPolicy: {:#x}", self.replication_policy)?;
        writeln!(f, "EntityId: {}", self.entity_id)?;
        writeln!(f, "PrototypeId: {}", self.prototype)?;
        writeln!(f, "Flags: {}", self.flags)?;
        writeln!(f, "LocFlags: {}", self.location_flags)?;
        writeln!(f, "InterestPolicies: {:#x}", self.interest_policies)?;
        writeln!(f, "AvatarWorldInstanceId: {}", self.avatar_world_instance_id)?;
        writeln!(f, "DbId: {}", self.db_id)?;
        writeln!(f, "Position: {}", self.position)?;
        writeln!(f, "Orientation: {}", self.orientation)?;
        writeln!(f, "LocomotionState: {}", self.locomotion)?;
        writeln!(f, "BoundsScaleOverride: {}", self.bounds_scale)?;
        writeln!(f, "SourceEntityId: {}", self.source_entity_id)?;
        writeln!(f, "SourcePosition: {}", self.source_position)?;
        writeln!(f, "ActivePowerPrototypeId: {}", self.active_power)?;
        writeln!(f, "InvLoc: {}", self.inventory_location)?;
        writeln!(f, "InvLocPrev: {}", self.previous_inventory_location)?;
        for (i, id) in self.attachments.iter().enumerate() {
            writeln!(f, "Attachment{}: {:#x}", i, id)?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
