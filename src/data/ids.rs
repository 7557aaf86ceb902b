//! Typed Data References
//!
//! Every named game-data object is addressed by a 64-bit stable id. Each
//! namespace gets its own newtype so a curve id can never be passed where a
//! prototype id is expected.
//!
//! Id `0` is reserved in every namespace as "no object".

use std::fmt;
use serde::{Deserialize, Serialize};

/// Namespaces of the reference directories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    /// Display strings (localized text keys)
    DisplayString,
    /// Asset types
    AssetType,
    /// Curves
    Curve,
    /// Blueprints
    Blueprint,
    /// Prototypes
    Prototype,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Namespace::DisplayString => "display string",
            Namespace::AssetType => "asset type",
            Namespace::Curve => "curve",
            Namespace::Blueprint => "blueprint",
            Namespace::Prototype => "prototype",
        };
        f.write_str(name)
    }
}

/// A typed stable id bound to one namespace.
pub trait DataRef: Copy + Ord + fmt::Debug + fmt::Display {
    /// Namespace this id type lives in.
    const NAMESPACE: Namespace;

    /// Wrap a raw id.
    fn from_raw(raw: u64) -> Self;

    /// Raw 64-bit value.
    fn raw(self) -> u64;
}

macro_rules! data_ref {
    ($(#[$meta:meta])* $name:ident, $namespace:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// The reserved "no object" id.
            pub const INVALID: Self = Self(0);

            /// Check whether this id refers to an object.
            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != 0
            }
        }

        impl DataRef for $name {
            const NAMESPACE: Namespace = $namespace;

            #[inline]
            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            #[inline]
            fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:#018x}", self.0)
            }
        }
    };
}

data_ref!(
    /// Display string id.
    StringId,
    Namespace::DisplayString
);
data_ref!(
    /// Asset type id.
    AssetTypeId,
    Namespace::AssetType
);
data_ref!(
    /// Curve id.
    CurveId,
    Namespace::Curve
);
data_ref!(
    /// Blueprint id.
    BlueprintId,
    Namespace::Blueprint
);
data_ref!(
    /// Prototype id.
    PrototypeId,
    Namespace::Prototype
);
