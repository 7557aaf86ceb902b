//! Path Hashing for Stable Identifiers
//!
//! Provides the deterministic checksums used to derive data references:
//! - Adler-32 over UTF-16 code units
//! - CRC-32 over UTF-8 bytes
//! - DJB2 multiplicative hash (utility)
//!
//! `hash_path` combines the first two into the 64-bit stable id used for
//! every named game-data object. None of these functions know about
//! namespaces: callers pre-transform paths per category before hashing.

/// Adler-32 modulus (largest prime below 2^16).
pub const ADLER_MOD: u32 = 65521;

/// DJB2 initial value.
pub const DJB2_SEED: u32 = 5381;

/// Adler-32 over the UTF-16 code units of `s`.
///
/// Each code unit is added as a whole (not split into bytes), so the result
/// only matches byte-wise Adler-32 for ASCII input.
pub fn adler32(s: &str) -> u32 {
    let mut a: u32 = 1;
    let mut b: u32 = 0;
    for unit in s.encode_utf16() {
        a = (a + unit as u32) % ADLER_MOD;
        b = (b + a) % ADLER_MOD;
    }
    (b << 16) | a
}

/// Standard CRC-32 (IEEE) over raw bytes.
#[inline]
pub fn crc32(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

/// CRC-32 over the UTF-8 encoding of `s`.
#[inline]
pub fn crc32_str(s: &str) -> u32 {
    crc32(s.as_bytes())
}

/// DJB2: `hash = hash * 33 + byte`, wrapping.
pub fn djb2(bytes: &[u8]) -> u32 {
    bytes.iter().fold(DJB2_SEED, |hash, &byte| {
        (hash << 5).wrapping_add(hash).wrapping_add(byte as u32)
    })
}

/// Hash a path into a 64-bit stable id.
///
/// The path is lower-cased, then `(adler32 | crc32 << 32) - 1`.
/// Lower-casing makes ids case-insensitive with respect to the source path.
pub fn hash_path(path: &str) -> u64 {
    let lowered = path.to_lowercase();
    let adler = adler32(&lowered) as u64;
    let crc = crc32_str(&lowered) as u64;
    (adler | (crc << 32)).wrapping_sub(1)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_adler32_known_values() {
        assert_eq!(adler32(""), 1);
        assert_eq!(adler32("Wikipedia"), 0x11E6_0398);
    }

    #[test]
    fn test_adler32_uses_utf16_units() {
        // U+00E9 is a single UTF-16 unit (0xE9) but two UTF-8 bytes.
        let a = 1 + 0xE9;
        let b = a;
        assert_eq!(adler32("\u{e9}"), (b << 16) | a);
    }

    #[test]
    fn test_crc32_known_values() {
        assert_eq!(crc32(b""), 0);
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
        assert_eq!(crc32_str("a"), 0xE8B7_BE43);
    }

    #[test]
    fn test_djb2_known_values() {
        assert_eq!(djb2(b""), DJB2_SEED);
        assert_eq!(djb2(b"a"), 5381 * 33 + 97);
    }

    #[test]
    fn test_hash_path_combination() {
        // adler32("a") = 0x00620062, crc32("a") = 0xE8B7BE43
        assert_eq!(hash_path("a"), 0xE8B7_BE43_0062_0061);
    }

    #[test]
    fn test_hash_path_case_insensitive() {
        assert_eq!(
            hash_path("Entity/Characters/Avatars/Hero.prototype"),
            hash_path("entity/characters/avatars/hero.prototype"),
        );
    }

    #[test]
    fn test_hash_path_distinguishes_pretransformed_paths() {
        // Same logical path, different category pre-transformation.
        assert_ne!(hash_path("Powers.Hero.prototype"), hash_path("&Powers/Hero.prototype"));
    }

    proptest! {
        #[test]
        fn prop_hash_path_deterministic(s in ".*") {
            prop_assert_eq!(hash_path(&s), hash_path(&s));
        }

        #[test]
        fn prop_adler32_halves_below_modulus(s in ".*") {
            let value = adler32(&s);
            prop_assert!((value & 0xFFFF) < ADLER_MOD);
            prop_assert!((value >> 16) < ADLER_MOD);
        }
    }
}
