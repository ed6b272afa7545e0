//! Chain-local RNG seeding (§5, §9). Each chain owns its RNG exclusively and
//! seeds it deterministically so that two runs with the same configuration
//! and seed are byte-identical (§8 S6), the same non-cryptographic
//! fast-RNG choice the teacher makes for its own walk sampling.

use rand::rngs::SmallRng;
use rand::SeedableRng;

pub type ChainRng = SmallRng;

/// Builds the chain's RNG from a configured seed. Two chains built from the
/// same `seed` produce byte-identical sequences of proposals.
pub fn seeded(seed: u64) -> ChainRng {
    SmallRng::seed_from_u64(seed)
}
