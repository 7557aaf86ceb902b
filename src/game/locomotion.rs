//! Locomotion
//!
//! Movement state embedded in entity snapshots and sent on its own as a
//! locomotion update. The embedded state carries no flag word of its own:
//! each field is gated by a bit of the owner's location flag word.
//!
//! ## Location Flags
//!
//! ```text
//! ┌──────┬──────────────────────────────────────────────┐
//! │  0   │ full orientation (else yaw only)             │
//! │  1   │ no locomotion state (entity snapshot only)   │
//! │  3   │ locomotion flags                             │
//! │  4   │ method                                       │
//! │  5   │ move speed                                   │
//! │  6   │ height                                       │
//! │  7   │ follow entity                                │
//! │  8   │ follow range                                 │
//! │  9   │ navigation path                              │
//! │ 11   │ prototype (locomotion update only)           │
//! └──────┴──────────────────────────────────────────────┘
//! ```

use std::fmt;

use crate::core::fixed::{ORIENTATION_PRECISION, POSITION_PRECISION, WHOLE_PRECISION};
use crate::core::vector::{Orientation, Vector3};
use crate::data::enums::EnumCategory;
use crate::data::ids::PrototypeId;
use crate::network::archive::{
    transfer_list, Archive, ArchiveError, Archiver, FieldSpec, FlagWord, Gate,
};

// =============================================================================
// LOCATION FLAG BITS
// =============================================================================

/// Orientation carries pitch and roll.
pub const LOC_FULL_ORIENTATION: u8 = 0;
/// Snapshot has no embedded locomotion state.
pub const LOC_NO_LOCOMOTION: u8 = 1;
/// Locomotion flags present.
pub const LOC_HAS_LOCOMOTION_FLAGS: u8 = 3;
/// Method present.
pub const LOC_HAS_METHOD: u8 = 4;
/// Move speed present.
pub const LOC_HAS_MOVE_SPEED: u8 = 5;
/// Height present.
pub const LOC_HAS_HEIGHT: u8 = 6;
/// Follow entity present.
pub const LOC_HAS_FOLLOW_ENTITY: u8 = 7;
/// Follow range present.
pub const LOC_HAS_FOLLOW_RANGE: u8 = 8;
/// Navigation path present.
pub const LOC_HAS_PATH: u8 = 9;
/// Update carries the entity prototype.
pub const LOC_HAS_PROTOTYPE: u8 = 11;

/// Bits owned by the locomotion state itself.
const LOCOMOTION_BITS: [u8; 7] = [
    LOC_HAS_LOCOMOTION_FLAGS,
    LOC_HAS_METHOD,
    LOC_HAS_MOVE_SPEED,
    LOC_HAS_HEIGHT,
    LOC_HAS_FOLLOW_ENTITY,
    LOC_HAS_FOLLOW_RANGE,
    LOC_HAS_PATH,
];

// =============================================================================
// NAVIGATION PATH
// =============================================================================

/// One waypoint of a navigation path.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NaviPathNode {
    /// Waypoint position.
    pub vertex: Vector3,
    /// Which side of the vertex the path passes.
    pub vertex_side: u32,
    /// Clearance radius.
    pub radius: f32,
}

impl Archive for NaviPathNode {
    fn transfer<A: Archiver + ?Sized>(&mut self, ar: &mut A) -> Result<(), ArchiveError> {
        ar.vector3(&mut self.vertex, POSITION_PRECISION)?;
        ar.varint32(&mut self.vertex_side)?;
        ar.fixed(&mut self.radius, POSITION_PRECISION)
    }
}

// =============================================================================
// LOCOMOTION STATE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StateField {
    LocomotionFlags,
    Method,
    MoveSpeed,
    Height,
    FollowEntity,
    FollowRange,
    Path,
}

const STATE_SCHEMA: &[FieldSpec<StateField>] = &[
    FieldSpec::new(StateField::LocomotionFlags, Gate::LocFlag(LOC_HAS_LOCOMOTION_FLAGS)),
    FieldSpec::new(StateField::Method, Gate::LocFlag(LOC_HAS_METHOD)),
    FieldSpec::fixed(StateField::MoveSpeed, Gate::LocFlag(LOC_HAS_MOVE_SPEED), WHOLE_PRECISION),
    FieldSpec::new(StateField::Height, Gate::LocFlag(LOC_HAS_HEIGHT)),
    FieldSpec::new(StateField::FollowEntity, Gate::LocFlag(LOC_HAS_FOLLOW_ENTITY)),
    FieldSpec::fixed(StateField::FollowRange, Gate::LocFlag(LOC_HAS_FOLLOW_RANGE), WHOLE_PRECISION),
    FieldSpec::new(StateField::Path, Gate::LocFlag(LOC_HAS_PATH)),
];

/// Movement state of an entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocomotionState {
    /// Opaque locomotion flag bits.
    pub locomotion_flags: u64,
    /// Movement method.
    pub method: u32,
    /// Current move speed.
    pub move_speed: f32,
    /// Height above ground.
    pub height: u32,
    /// Entity being followed.
    pub follow_entity_id: u64,
    /// Near edge of the follow range.
    pub follow_range_start: f32,
    /// Far edge of the follow range.
    pub follow_range_end: f32,
    /// Index of the goal node in `path_nodes`.
    pub path_goal_node_index: i32,
    /// Navigation path.
    pub path_nodes: Vec<NaviPathNode>,
}

impl LocomotionState {
    /// Location flag bits this state needs to be sent in full.
    pub fn presence_flags(&self) -> FlagWord {
        let mut word = FlagWord::EMPTY;
        word.set(LOC_HAS_LOCOMOTION_FLAGS, self.locomotion_flags != 0);
        word.set(LOC_HAS_METHOD, self.method != 0);
        word.set(LOC_HAS_MOVE_SPEED, self.move_speed != 0.0);
        word.set(LOC_HAS_HEIGHT, self.height != 0);
        word.set(LOC_HAS_FOLLOW_ENTITY, self.follow_entity_id != 0);
        word.set(
            LOC_HAS_FOLLOW_RANGE,
            self.follow_range_start != 0.0 || self.follow_range_end != 0.0,
        );
        word.set(
            LOC_HAS_PATH,
            self.path_goal_node_index != 0 || !self.path_nodes.is_empty(),
        );
        word
    }

    /// Replace the locomotion bits of `loc_flags` with this state's presence bits.
    pub fn apply_presence(&self, loc_flags: &mut FlagWord) {
        let presence = self.presence_flags();
        for bit in LOCOMOTION_BITS {
            loc_flags.set(bit, presence.is_set(bit));
        }
    }

    /// Walk the fields selected by the owner's location flags.
    pub fn transfer_with<A: Archiver + ?Sized>(
        &mut self,
        ar: &mut A,
        loc_flags: FlagWord,
    ) -> Result<(), ArchiveError> {
        for spec in STATE_SCHEMA {
            if spec.gate.is_open(FlagWord::EMPTY, loc_flags) {
                self.transfer_field(spec, ar)?;
            }
        }
        Ok(())
    }

    fn transfer_field<A: Archiver + ?Sized>(
        &mut self,
        spec: &FieldSpec<StateField>,
        ar: &mut A,
    ) -> Result<(), ArchiveError> {
        match spec.field {
            StateField::LocomotionFlags => ar.varint64(&mut self.locomotion_flags),
            StateField::Method => ar.varint32(&mut self.method),
            StateField::MoveSpeed => ar.fixed(&mut self.move_speed, spec.precision),
            StateField::Height => ar.varint32(&mut self.height),
            StateField::FollowEntity => ar.varint64(&mut self.follow_entity_id),
            StateField::FollowRange => {
                ar.fixed(&mut self.follow_range_start, spec.precision)?;
                ar.fixed(&mut self.follow_range_end, spec.precision)
            }
            StateField::Path => {
                ar.raw_i32(&mut self.path_goal_node_index)?;
                transfer_list(ar, &mut self.path_nodes, |ar, node| node.transfer(ar))
            }
        }
    }
}

impl fmt::Display for LocomotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "flags {:#x}, method {}, speed {}, height {}, follow {:#x} [{}..{}], goal {}, {} path nodes",
            self.locomotion_flags,
            self.method,
            self.move_speed,
            self.height,
            self.follow_entity_id,
            self.follow_range_start,
            self.follow_range_end,
            self.path_goal_node_index,
            self.path_nodes.len()
        )
    }
}

// =============================================================================
// LOCOMOTION UPDATE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UpdateField {
    ReplicationPolicy,
    EntityId,
    LocationFlags,
    Prototype,
    Position,
    Orientation,
    Locomotion,
}

const UPDATE_SCHEMA: &[FieldSpec<UpdateField>] = &[
    FieldSpec::new(UpdateField::ReplicationPolicy, Gate::Always),
    FieldSpec::new(UpdateField::EntityId, Gate::Always),
    FieldSpec::new(UpdateField::LocationFlags, Gate::Always),
    FieldSpec::new(UpdateField::Prototype, Gate::LocFlag(LOC_HAS_PROTOTYPE)),
    FieldSpec::fixed(UpdateField::Position, Gate::Always, POSITION_PRECISION),
    FieldSpec::fixed(UpdateField::Orientation, Gate::Always, ORIENTATION_PRECISION),
    FieldSpec::new(UpdateField::Locomotion, Gate::Always),
];

/// Standalone locomotion update for one entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocomotionUpdate {
    /// Replication policy bits.
    pub replication_policy: u32,
    /// Entity being moved.
    pub entity_id: u64,
    /// Location flag word.
    pub location_flags: FlagWord,
    /// Entity prototype, present with [`LOC_HAS_PROTOTYPE`].
    pub prototype: PrototypeId,
    /// Position.
    pub position: Vector3,
    /// Orientation; yaw only unless [`LOC_FULL_ORIENTATION`] is set.
    pub orientation: Orientation,
    /// Movement state.
    pub locomotion: LocomotionState,
}

impl LocomotionUpdate {
    /// Create an update, deriving the location flags from the values given.
    pub fn new(
        replication_policy: u32,
        entity_id: u64,
        position: Vector3,
        orientation: Orientation,
        locomotion: LocomotionState,
    ) -> Self {
        let mut location_flags = locomotion.presence_flags();
        location_flags.set(LOC_FULL_ORIENTATION, !orientation.is_yaw_only());
        Self {
            replication_policy,
            entity_id,
            location_flags,
            prototype: PrototypeId::INVALID,
            position,
            orientation,
            locomotion,
        }
    }

    /// Attach the entity prototype.
    pub fn with_prototype(mut self, prototype: PrototypeId) -> Self {
        self.prototype = prototype;
        self.location_flags.set(LOC_HAS_PROTOTYPE, true);
        self
    }

    fn transfer_field<A: Archiver + ?Sized>(
        &mut self,
        spec: &FieldSpec<UpdateField>,
        ar: &mut A,
    ) -> Result<(), ArchiveError> {
        match spec.field {
            UpdateField::ReplicationPolicy => ar.varint32(&mut self.replication_policy),
            UpdateField::EntityId => ar.varint64(&mut self.entity_id),
            UpdateField::LocationFlags => ar.flags(&mut self.location_flags),
            UpdateField::Prototype => ar.prototype(&mut self.prototype, EnumCategory::Entity),
            UpdateField::Position => ar.vector3(&mut self.position, spec.precision),
            UpdateField::Orientation => {
                let full = self.location_flags.is_set(LOC_FULL_ORIENTATION);
                ar.orientation(&mut self.orientation, full, spec.precision)
            }
            UpdateField::Locomotion => self.locomotion.transfer_with(ar, self.location_flags),
        }
    }
}

impl Archive for LocomotionUpdate {
    fn transfer<A: Archiver + ?Sized>(&mut self, ar: &mut A) -> Result<(), ArchiveError> {
        for spec in UPDATE_SCHEMA {
            if spec.gate.is_open(FlagWord::EMPTY, self.location_flags) {
                self.transfer_field(spec, ar)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for LocomotionUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ReplicationPolicy: {:#x}", self.replication_policy)?;
        writeln!(f, "EntityId: {}", self.entity_id)?;
        writeln!(f, "LocFlags: {}", self.location_flags)?;
        writeln!(f, "PrototypeId: {}", self.prototype)?;
        writeln!(f, "Position: {}", self.position)?;
        writeln!(f, "Orientation: {}", self.orientation)?;
        writeln!(f, "LocomotionState: {}", self.locomotion)
    }
}

// =============================================================================
// TESTS
// =============================================================================
