//! Game Archives
//!
//! Schema-typed records replicated to clients. Each one walks a static
//! schema table through the shared [`Archiver`](crate::network::Archiver)
//! traversal.
//!
//! ## Module Structure
//!
//! - `entity`: entity snapshot (base replication record)
//! - `locomotion`: locomotion update and the embedded movement state
//! - `inventory`: embedded inventory location
//! - `ability`: action-bar key mappings

pub mod ability;
pub mod entity;
pub mod inventory;
pub mod locomotion;

pub use ability::{AbilityKeyMapping, AbilityKeyMappingSet};
pub use entity::EntitySnapshot;
pub use inventory::InventoryLocation;
pub use locomotion::{LocomotionState, LocomotionUpdate, NaviPathNode};
