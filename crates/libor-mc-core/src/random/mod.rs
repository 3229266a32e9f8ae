//! Random-number primitives shared by every Monte Carlo pricer.

pub mod box_muller;
pub mod seed;

pub use box_muller::{NormalSampler, PolarBoxMuller, DEFAULT_MAX_ATTEMPTS};
pub use seed::{derive_path_seed, resolve_base_seed};
