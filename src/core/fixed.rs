//! Fixed-Point Wire Reals
//!
//! Real numbers cross the wire as scaled integers: `round(value * 2^p)`,
//! zig-zag folded and varint encoded. `p` is the per-field precision.
//!
//! ## Format
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  value ──► × 2^p ──► round ──► i32 ──► zig-zag ──► varint   │
//! │                                                             │
//! │  p = 3  positions      (1/8 unit)                           │
//! │  p = 6  orientations   (1/64 radian)                        │
//! │  p = 8  scale factors  (1/256)                              │
//! │  p = 0  speeds, ranges (whole units)                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decoding divides by `2^p`, so the round-trip error is bounded by
//! `2^-(p+1)`.

/// Precision for position components.
pub const POSITION_PRECISION: u32 = 3;

/// Precision for orientation angles.
pub const ORIENTATION_PRECISION: u32 = 6;

/// Precision for bounds scale overrides.
pub const SCALE_PRECISION: u32 = 8;

/// Precision for speeds and follow ranges.
pub const WHOLE_PRECISION: u32 = 0;

/// Largest supported precision. Keeps `2^p` exact in an `f32` and leaves
/// headroom in the 32-bit scaled value.
pub const MAX_PRECISION: u32 = 16;

/// Scale factor `2^precision`.
#[inline]
pub fn scale_of(precision: u32) -> f64 {
    debug_assert!(precision <= MAX_PRECISION, "precision {} too large", precision);
    (1u32 << precision) as f64
}

/// Convert a real to its scaled integer form.
///
/// Returns `None` for non-finite input or when the scaled value does not fit
/// in an `i32`.
pub fn to_fixed(value: f32, precision: u32) -> Option<i32> {
    if !value.is_finite() {
        return None;
    }
    let scaled = (value as f64 * scale_of(precision)).round();
    if scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
        return None;
    }
    Some(scaled as i32)
}

/// Convert a scaled integer back to a real.
#[inline]
pub fn from_fixed(raw: i32, precision: u32) -> f32 {
    (raw as f64 / scale_of(precision)) as f32
}

/// Fold a signed value so small magnitudes stay small: 0, -1, 1, -2 -> 0, 1, 2, 3.
#[inline]
pub const fn zigzag_encode32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag_encode32`].
#[inline]
pub const fn zigzag_decode32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

// =============================================================================
// TESTS
// =============================================================================
