//! Core deterministic primitives.
//!
//! Stateless helpers shared by the data layer and the archive codec:
//! path hashing, fixed-point wire reals and spatial value types.

pub mod fixed;
pub mod hash;
pub mod vector;

// Re-export core types
pub use fixed::{from_fixed, to_fixed, zigzag_decode32, zigzag_encode32};
pub use hash::{adler32, crc32, djb2, hash_path};
pub use vector::{Orientation, Vector3};
