//! Log-Euler evolution of the forward-rate surface under the terminal
//! measure.
//!
//! For each step `n` and tenor `i > n`:
//!
//! ```text
//! drift_i   = sigma * sum_{k=i+1}^{N} alpha * sigma * L[k][n] / (1 + alpha * L[k][n])
//! L[i][n+1] = L[i][n] * exp((-drift_i - sigma^2 / 2) * dT + sigma * dW[n+1])
//! ```
//!
//! Single-factor model: every tenor on a step shares the same increment.

use crate::error::{DomainQuantity, LiborError};
use crate::libor::config::SimulationConfig;
use crate::libor::surface::{ForwardRateSurface, PathSample};
use crate::LiborResult;

#[derive(Debug, Clone, Copy)]
pub struct ForwardCurveSimulator {
    tenor_count: usize,
    accrual_fraction: f64,
    volatility: f64,
    time_step: f64,
    spot_init: f64,
}

impl ForwardCurveSimulator {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            tenor_count: config.tenor_count,
            accrual_fraction: config.accrual_fraction,
            volatility: config.volatility,
            time_step: config.time_step,
            spot_init: config.spot_init,
        }
    }

    /// Evolve the flat initial curve along one path.
    pub fn simulate(&self, sample: &PathSample) -> LiborResult<ForwardRateSurface> {
        let n_tenors = self.tenor_count;
        if sample.len() != n_tenors {
            return Err(LiborError::InvalidConfiguration {
                field: "path_sample".into(),
                reason: format!(
                    "Expected {n_tenors} Brownian increments, got {}",
                    sample.len()
                ),
            });
        }

        let alpha = self.accrual_fraction;
        let sigma = self.volatility;
        let convexity = 0.5 * sigma * sigma;
        let mut l = ForwardRateSurface::flat(n_tenors, self.spot_init);

        for n in 0..n_tenors {
            let shock = sigma * sample.increment(n + 1);

            // Walk tenors from the back so the drift sum over k > i is a
            // running suffix of terms observed at step n.
            let mut drift_sum = 0.0;
            for i in (n + 1..=n_tenors).rev() {
                let drift = sigma * drift_sum;
                let next = l[(i, n)] * ((-drift - convexity) * self.time_step + shock).exp();
                check_rate(alpha, next, i, n + 1)?;
                l[(i, n + 1)] = next;

                let current = l[(i, n)];
                drift_sum += alpha * sigma * current / check_rate(alpha, current, i, n)?;
            }
        }

        Ok(l)
    }
}

/// Return `1 + alpha * rate` when it is a usable discount denominator.
///
/// A non-finite rate is reported as itself; a finite rate with a
/// non-positive denominator reports the denominator.
pub(crate) fn check_rate(alpha: f64, rate: f64, tenor: usize, step: usize) -> LiborResult<f64> {
    if !rate.is_finite() {
        return Err(LiborError::NumericalDomain {
            tenor,
            step,
            quantity: DomainQuantity::ForwardRate,
            value: rate,
        });
    }
    let denom = 1.0 + alpha * rate;
    if denom > 0.0 {
        Ok(denom)
    } else {
        Err(LiborError::NumericalDomain {
            tenor,
            step,
            quantity: DomainQuantity::DiscountDenominator,
            value: denom,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
