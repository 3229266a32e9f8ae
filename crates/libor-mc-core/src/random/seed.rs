use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finalizer applied to `base_seed` advanced by `path_index + 1`
/// golden-ratio steps. Neighbouring path indices map to unrelated seeds.
#[inline]
pub fn derive_path_seed(base_seed: u64, path_index: u64) -> u64 {
    let mut z = base_seed.wrapping_add(path_index.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Use the injected seed, or draw one from OS entropy.
pub fn resolve_base_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(s) => s,
        None => StdRng::from_entropy().gen::<u64>(),
    }
}
