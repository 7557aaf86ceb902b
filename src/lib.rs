//! # Game Data Core
//!
//! Startup-built game-data registries and the binary archive codec that
//! replicates entity state to clients.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     GAMEDATA CORE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Stateless primitives                    │
//! │  ├── hash.rs      - Adler-32 / CRC-32 / djb2, path ids      │
//! │  ├── fixed.rs     - Fixed-point wire reals, zig-zag         │
//! │  └── vector.rs    - Vector3 and Orientation                 │
//! │                                                             │
//! │  data/            - Immutable game data (built once)        │
//! │  ├── ids.rs       - Typed stable ids per namespace          │
//! │  ├── directory.rs - id <-> name registries                  │
//! │  ├── blueprint.rs - Runtime-binding classification          │
//! │  ├── enums.rs     - Prototype enum tables                   │
//! │  ├── source.rs    - Data manifest boundary                  │
//! │  └── database.rs  - Published context + config              │
//! │                                                             │
//! │  network/         - Wire codec                              │
//! │  ├── coded.rs     - Varints and raw words                   │
//! │  ├── bools.rs     - Boolean bit-packing channel             │
//! │  └── archive.rs   - Shared encode/decode traversal          │
//! │                                                             │
//! │  game/            - Replicated archives                     │
//! │  ├── entity.rs    - Entity snapshot                         │
//! │  ├── locomotion.rs- Locomotion update + state               │
//! │  ├── inventory.rs - Inventory location                      │
//! │  └── ability.rs   - Ability key mappings                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup
//!
//! [`GameDatabase::load`] hashes every manifest path into a stable id,
//! registers the ids, builds the four prototype enum tables and verifies
//! them. Nothing is published until verification succeeds; after that the
//! database never changes and can be shared across threads as-is.
//!
//! ## Determinism
//!
//! Ids are pure functions of their paths and enum tables are sorted by id,
//! so identical source data yields identical enum indices on every run and
//! every platform. [`PrototypeEnumTables::fingerprint`] makes that checkable.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod data;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use crate::core::hash::hash_path;
pub use crate::core::vector::{Orientation, Vector3};
pub use data::{
    DataError, DataManifest, DatabaseConfig, EnumCategory, GameDatabase, PrototypeEnumTables,
    PrototypeId,
};
pub use game::{AbilityKeyMapping, AbilityKeyMappingSet, EntitySnapshot, LocomotionUpdate};
pub use network::{decode, encode, Archive, ArchiveError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
