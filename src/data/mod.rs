//! Game Data Layer
//!
//! Startup-built, immutable registries of named game-data objects.
//!
//! ## Module Structure
//!
//! - `ids`: typed 64-bit stable ids per namespace
//! - `directory`: id <-> name registry for one namespace
//! - `blueprint`: runtime-binding classification
//! - `enums`: dense prototype enum tables used on the wire
//! - `source`: JSON manifest supplied by the data loader
//! - `database`: the published context object tying it all together
//!
//! Data flows one way at startup: paths are hashed into ids, ids are
//! registered in directories, and the prototype directory feeds the enum
//! builder. Nothing here mutates after [`GameDatabase`] is returned.

pub mod blueprint;
pub mod database;
pub mod directory;
pub mod enums;
pub mod ids;
pub mod source;

use std::path::PathBuf;

use thiserror::Error;

pub use blueprint::{classify_runtime_binding, Blueprint};
pub use database::{DatabaseBuilder, DatabaseConfig, GameDatabase, PropertyIdReconstructor};
pub use directory::ReferenceDirectory;
pub use enums::{EnumCategory, EnumPolicy, PrototypeCatalog, PrototypeEnumTables};
pub use ids::{AssetTypeId, BlueprintId, CurveId, DataRef, Namespace, PrototypeId, StringId};
pub use source::{DataManifest, PathKind};

/// Data layer errors.
///
/// Everything raised while loading is fatal to startup. Lookup misses
/// (`UnknownId`, `UnknownName`, `UnknownReferenceIndex`) are per-request.
#[derive(Debug, Error)]
pub enum DataError {
    /// Required external data is not available.
    #[error("data source missing: {}", .path.display())]
    MissingDataSource {
        /// Path that was expected to exist.
        path: PathBuf,
    },

    /// Reading the data source failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The data manifest is not valid JSON for the expected shape.
    #[error("invalid data manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// Two entries share an id within one namespace.
    #[error("duplicate {namespace} id {id:#018x}: '{name}' collides with '{existing}'")]
    DuplicateId {
        /// Namespace of the collision.
        namespace: Namespace,
        /// Colliding id.
        id: u64,
        /// Name already registered under the id.
        existing: String,
        /// Name that failed to register.
        name: String,
    },

    /// Two ids share a name in a namespace with reverse lookup.
    #[error("duplicate {namespace} name '{name}': {id:#018x} collides with {existing:#018x}")]
    DuplicateName {
        /// Namespace of the collision.
        namespace: Namespace,
        /// Colliding name.
        name: String,
        /// Id already registered under the name.
        existing: u64,
        /// Id that failed to register.
        id: u64,
    },

    /// A structured prototype references a blueprint that was never registered.
    #[error("prototype {prototype} has no registered blueprint")]
    MissingBlueprint {
        /// Prototype being classified.
        prototype: PrototypeId,
    },

    /// An enum category contains nothing but the invalid sentinel.
    #[error("{0} enum category is empty")]
    EmptyCategory(EnumCategory),

    /// Id not registered.
    #[error("unknown {namespace} id {id:#018x}")]
    UnknownId {
        /// Namespace searched.
        namespace: Namespace,
        /// Missing id.
        id: u64,
    },

    /// Name not registered, or the namespace has no reverse lookup.
    #[error("unknown {namespace} name '{name}'")]
    UnknownName {
        /// Namespace searched.
        namespace: Namespace,
        /// Missing name.
        name: String,
    },

    /// Enum index outside a category's table.
    #[error("enum index {index} out of range for {category} category")]
    UnknownReferenceIndex {
        /// Category searched.
        category: EnumCategory,
        /// Offending index.
        index: u64,
    },
}
