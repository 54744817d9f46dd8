//! The 64-bit hash used to reduce elements into the map's hash universe.
//!
//! `spec.md` treats hash choice as an external collaborator: any fast
//! 64-bit non-cryptographic hash works, as long as the same algorithm and
//! seed are used at build time and at query time. [`GcmHash`] makes that a
//! capability parameter of [`GcMap`](crate::GcMap) and
//! [`GcMapBuilder`](crate::GcMapBuilder) instead of a hard-wired global.

use twox_hash::XxHash64;
use std::hash::Hasher;

/// The fixed seed used by [`XxHash64`]. Builder and querier must agree on
/// this, which they do automatically by sharing the same `H: GcmHash`.
pub const DEFAULT_SEED: u64 = 1337;

/// A deterministic 64-bit hash function, fixed at build and query time.
///
/// Implementations must be pure and stateless: identical bytes must
/// produce an identical hash every time, in every process.
pub trait GcmHash {
    /// Hashes `bytes` into a 64-bit value.
    fn hash64(bytes: &[u8]) -> u64;
}

/// The default hash: xxHash64 with a fixed seed, matching the reference
/// `gc_map_get_hash` (`XXH64(element, element_length, 1337)`).
#[derive(Clone, Copy, Debug, Default)]
pub struct XxHash64Seeded;

impl GcmHash for XxHash64Seeded {
    fn hash64(bytes: &[u8]) -> u64 {
        let mut hasher = XxHash64::with_seed(DEFAULT_SEED);
        hasher.write(bytes);
        hasher.finish()
    }
}
