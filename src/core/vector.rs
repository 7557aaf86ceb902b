//! Spatial Value Types
//!
//! Plain `f32` vectors carried by archives. Wire precision is applied by the
//! codec, not stored here.

use std::fmt;

/// 3-component vector (positions, source positions, path vertices).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vector3 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Orientation as yaw / pitch / roll angles.
///
/// Archives without the full-orientation location flag only carry yaw;
/// pitch and roll are implicitly zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    /// Rotation around the vertical axis
    pub yaw: f32,
    /// Pitch angle
    pub pitch: f32,
    /// Roll angle
    pub roll: f32,
}

impl Orientation {
    /// Create a full orientation.
    #[inline]
    pub const fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Create a yaw-only orientation.
    #[inline]
    pub const fn from_yaw(yaw: f32) -> Self {
        Self { yaw, pitch: 0.0, roll: 0.0 }
    }

    /// True when pitch and roll are both zero.
    #[inline]
    pub fn is_yaw_only(&self) -> bool {
        self.pitch == 0.0 && self.roll == 0.0
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(yaw {:.3}, pitch {:.3}, roll {:.3})", self.yaw, self.pitch, self.roll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaw_only() {
        assert!(Orientation::from_yaw(1.5).is_yaw_only());
        assert!(!Orientation::new(1.5, 0.25, 0.0).is_yaw_only());
    }

    #[test]
    fn test_display() {
        assert_eq!(Vector3::new(1.0, -2.5, 0.125).to_string(), "(1.000, -2.500, 0.125)");
    }
}
