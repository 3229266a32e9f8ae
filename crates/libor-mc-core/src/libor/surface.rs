//! Dense `(tenor, step)` storage for the simulated forward-rate and
//! discount-factor surfaces, plus the Brownian increments driving a path.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::random::NormalSampler;
use crate::LiborResult;

/// Square row-major grid indexed by `(tenor, step)`.
#[derive(Debug, Clone, PartialEq)]
struct Grid {
    size: usize,
    cells: Vec<f64>,
}

impl Grid {
    fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0.0; size * size],
        }
    }

    #[inline]
    fn offset(&self, tenor: usize, step: usize) -> usize {
        assert!(
            tenor < self.size && step < self.size,
            "index ({tenor}, {step}) out of bounds for {0}x{0} surface",
            self.size
        );
        tenor * self.size + step
    }
}

// ---------------------------------------------------------------------------
// Forward rates
// ---------------------------------------------------------------------------

/// `L[i][n]`: forward rate of tenor `i` observed at step `n`, for
/// `i, n in [0, N]`. Entries with `n > i` are never written and read as 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardRateSurface {
    tenor_count: usize,
    grid: Grid,
}

impl ForwardRateSurface {
    /// Flat initial curve: `L[i][0] = spot_init` for every tenor.
    pub fn flat(tenor_count: usize, spot_init: f64) -> Self {
        let mut surface = Self {
            tenor_count,
            grid: Grid::new(tenor_count + 1),
        };
        for i in 0..=tenor_count {
            surface[(i, 0)] = spot_init;
        }
        surface
    }

    /// Number of tenors N; the surface holds `N + 1` rates per step.
    pub fn tenor_count(&self) -> usize {
        self.tenor_count
    }

    /// Rate of tenor `i` fixed at its own reset step, `L[i][i]`.
    pub fn fixing(&self, tenor: usize) -> f64 {
        self[(tenor, tenor)]
    }
}

impl Index<(usize, usize)> for ForwardRateSurface {
    type Output = f64;

    fn index(&self, (tenor, step): (usize, usize)) -> &f64 {
        &self.grid.cells[self.grid.offset(tenor, step)]
    }
}

impl IndexMut<(usize, usize)> for ForwardRateSurface {
    fn index_mut(&mut self, (tenor, step): (usize, usize)) -> &mut f64 {
        let offset = self.grid.offset(tenor, step);
        &mut self.grid.cells[offset]
    }
}

// ---------------------------------------------------------------------------
// Discount factors
// ---------------------------------------------------------------------------

/// `D[i][n]`: discount factor from step `n` to tenor date `i`, defined for
/// `i in [1, N+1]` and `n < i`.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountFactorSurface {
    tenor_count: usize,
    grid: Grid,
}

impl DiscountFactorSurface {
    pub(crate) fn empty(tenor_count: usize) -> Self {
        Self {
            tenor_count,
            grid: Grid::new(tenor_count + 2),
        }
    }

    pub fn tenor_count(&self) -> usize {
        self.tenor_count
    }

    /// `D[N+1][0]`, the time-0 price of the terminal zero-coupon bond.
    pub fn terminal(&self) -> f64 {
        self[(self.tenor_count + 1, 0)]
    }
}

impl Index<(usize, usize)> for DiscountFactorSurface {
    type Output = f64;

    fn index(&self, (tenor, step): (usize, usize)) -> &f64 {
        &self.grid.cells[self.grid.offset(tenor, step)]
    }
}

impl IndexMut<(usize, usize)> for DiscountFactorSurface {
    fn index_mut(&mut self, (tenor, step): (usize, usize)) -> &mut f64 {
        let offset = self.grid.offset(tenor, step);
        &mut self.grid.cells[offset]
    }
}

// ---------------------------------------------------------------------------
// Brownian increments
// ---------------------------------------------------------------------------

/// Brownian increments `dW[1..=N]` for one path, each `sqrt(dT) * Z`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSample {
    increments: Vec<f64>,
}

impl PathSample {
    /// Draw `tenor_count` fresh increments from `sampler`.
    pub fn draw(
        sampler: &mut impl NormalSampler,
        tenor_count: usize,
        time_step: f64,
    ) -> LiborResult<Self> {
        let scale = time_step.sqrt();
        let increments = (0..tenor_count)
            .map(|_| sampler.sample().map(|z| scale * z))
            .collect::<LiborResult<Vec<f64>>>()?;
        Ok(Self { increments })
    }

    /// Wrap pre-computed increments; element `k` is `dW[k + 1]`.
    pub fn from_increments(increments: Vec<f64>) -> Self {
        Self { increments }
    }

    /// All-zero increments, used for deterministic evaluation.
    pub fn zero(tenor_count: usize) -> Self {
        Self {
            increments: vec![0.0; tenor_count],
        }
    }

    /// `dW[step]` for `step in [1, N]`.
    pub fn increment(&self, step: usize) -> f64 {
        self.increments[step - 1]
    }

    pub fn len(&self) -> usize {
        self.increments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.increments.is_empty()
    }
}
