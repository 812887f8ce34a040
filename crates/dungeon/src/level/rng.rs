//! Bounded draws from the level's seeded stream.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

pub(super) fn level_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(mix_seed(seed))
}

/// Uniform value in `[min_value, max_value]`.
pub(super) fn roll(rng: &mut ChaCha8Rng, min_value: i32, max_value: i32) -> i32 {
    debug_assert!(min_value <= max_value);
    let range_size = (max_value - min_value) as u64 + 1;
    min_value + (rng.next_u64() % range_size) as i32
}

/// Uniform value in `[0, bound)`. `bound` must be positive.
pub(super) fn below(rng: &mut ChaCha8Rng, bound: i32) -> i32 {
    debug_assert!(bound > 0);
    (rng.next_u64() % bound as u64) as i32
}

/// Uniform percentage in `[0, 100)`.
pub(super) fn percent(rng: &mut ChaCha8Rng) -> u8 {
    (rng.next_u64() % 100) as u8
}

fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
