//! Discount factors bootstrapped from the simulated term structure.
//!
//! `D[i][n] = prod_{k=n}^{i-1} 1 / (1 + alpha * L[k][n])` uses the rates as
//! observed at step `n` for every maturity, not a realized short-rate path.

use crate::error::{DomainQuantity, LiborError};
use crate::libor::config::SimulationConfig;
use crate::libor::forward_curve::check_rate;
use crate::libor::surface::{DiscountFactorSurface, ForwardRateSurface};
use crate::LiborResult;

#[derive(Debug, Clone, Copy)]
pub struct DiscountFactorBuilder {
    accrual_fraction: f64,
}

impl DiscountFactorBuilder {
    pub fn new(accrual_fraction: f64) -> Self {
        Self { accrual_fraction }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.accrual_fraction)
    }

    /// Fill `D[i][n]` for `i in [1, N+1]`, `n < i`.
    pub fn build(&self, rates: &ForwardRateSurface) -> LiborResult<DiscountFactorSurface> {
        let n_tenors = rates.tenor_count();
        let mut d = DiscountFactorSurface::empty(n_tenors);

        for n in 0..=n_tenors {
            let mut df_prod = 1.0;
            for i in n + 1..=n_tenors + 1 {
                let denom = check_rate(self.accrual_fraction, rates[(i - 1, n)], i - 1, n)?;
                df_prod *= 1.0 / denom;
                if !(df_prod.is_finite() && df_prod > 0.0) {
                    return Err(LiborError::NumericalDomain {
                        tenor: i,
                        step: n,
                        quantity: DomainQuantity::DiscountFactor,
                        value: df_prod,
                    });
                }
                d[(i, n)] = df_prod;
            }
        }

        Ok(d)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
