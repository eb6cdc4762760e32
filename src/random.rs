//! Seedable random-number helpers.
//!
//! Every stochastic step (initial draws, selection, crossover, mutation,
//! bootstrap resampling) receives an explicit generator built here, so a
//! run is fully reproducible from its seed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Generator type threaded through optimizer and bootstrap runs.
pub type FitRng = StdRng;

/// Creates a generator from a 64-bit seed.
pub fn create_rng(seed: u64) -> FitRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from `seed`, or from OS entropy when `None`.
pub fn rng_from_option(seed: Option<u64>) -> FitRng {
    match seed {
        Some(s) => create_rng(s),
        None => create_rng(rand::random()),
    }
}

/// Shuffles a slice in place (Fisher-Yates).
pub fn shuffle<T, R: Rng + ?Sized>(slice: &mut [T], rng: &mut R) {
    slice.shuffle(rng);
}

/// Derives an independent stream seed from a base seed (SplitMix64 step).
///
/// Bootstrap iterations use this so their results do not depend on the
/// order rayon happens to schedule them in.
pub fn derive_seed(base: u64, stream: u64) -> u64 {
    let mut z = base.wrapping_add(stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
