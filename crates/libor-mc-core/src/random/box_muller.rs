//! Polar (Marsaglia) form of the Box-Muller transform.
//!
//! Each accepted point `(x, y)` inside the unit disc yields two independent
//! standard normals. By default only the first is returned and the second is
//! discarded; [`PolarBoxMuller::with_spare_caching`] hands the second out on
//! the following call instead.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::LiborError;
use crate::LiborResult;

/// Rejection attempts before a draw is declared degenerate.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1_000;

/// Source of independent standard-normal variates.
pub trait NormalSampler {
    fn sample(&mut self) -> LiborResult<f64>;
}

#[derive(Debug, Clone)]
pub struct PolarBoxMuller<R: Rng = StdRng> {
    rng: R,
    max_attempts: u32,
    cache_spare: bool,
    spare: Option<f64>,
}

impl PolarBoxMuller<StdRng> {
    /// Sampler over a `StdRng` seeded from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Sampler over a `StdRng` seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> PolarBoxMuller<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cache_spare: false,
            spare: None,
        }
    }

    /// Cap the rejection loop at `max_attempts` draws per accepted point.
    /// A value of 0 is raised to 1, so every call draws at least once.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_spare_caching(mut self, enabled: bool) -> Self {
        self.cache_spare = enabled;
        if !enabled {
            self.spare = None;
        }
        self
    }

    /// Draw one accepted point and return both normals it produces.
    fn draw_pair(&mut self) -> LiborResult<(f64, f64)> {
        for _ in 0..self.max_attempts {
            let x: f64 = self.rng.gen_range(-1.0..1.0);
            let y: f64 = self.rng.gen_range(-1.0..1.0);
            let s = x * x + y * y;

            // s == 0 would take ln(0) and divide by zero.
            if s > 0.0 && s < 1.0 {
                let scale = (-2.0 * s.ln() / s).sqrt();
                return Ok((x * scale, y * scale));
            }
        }
        Err(LiborError::SamplerDegenerateDraw {
            attempts: self.max_attempts,
        })
    }
}

impl<R: Rng> NormalSampler for PolarBoxMuller<R> {
    fn sample(&mut self) -> LiborResult<f64> {
        if let Some(z) = self.spare.take() {
            return Ok(z);
        }
        let (z0, z1) = self.draw_pair()?;
        if self.cache_spare {
            self.spare = Some(z1);
        }
        Ok(z0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
