//! Per-path cap and swap cashflows rolled to the terminal numeraire.
//!
//! Period `i in [1, N+1]` pays on the rate fixed at its own reset,
//! `L[i-1][i-1]`. The cashflow is carried to the terminal bond through
//! `D[i][i-1] / D[N+1][i-1]`. Cap path values stay in terminal-numeraire
//! units; swap cashflows are each discounted to time 0 with `D[i][0]`.

use serde::{Deserialize, Serialize};

use crate::libor::config::SimulationConfig;
use crate::libor::surface::{DiscountFactorSurface, ForwardRateSurface};

/// Cashflows of a single path, indexed by period `i - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathCashflows {
    /// `FV[i]`, the undiscounted payoff of period `i`.
    pub future_values: Vec<f64>,
    /// `FVprime[i]`, the payoff in terminal-numeraire units.
    pub terminal_values: Vec<f64>,
    /// Accumulated path value `V`.
    pub path_value: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct PayoffEngine {
    notional: f64,
    strike: f64,
    accrual_fraction: f64,
    is_cap: bool,
}

impl PayoffEngine {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            notional: config.notional,
            strike: config.strike,
            accrual_fraction: config.accrual_fraction,
            is_cap: config.is_cap,
        }
    }

    /// Path value `V` without materializing the per-period cashflows.
    pub fn path_value(&self, rates: &ForwardRateSurface, discounts: &DiscountFactorSurface) -> f64 {
        (1..=rates.tenor_count() + 1)
            .map(|i| self.period(i, rates, discounts).2)
            .sum()
    }

    /// Full per-period breakdown of one path.
    pub fn cashflows(
        &self,
        rates: &ForwardRateSurface,
        discounts: &DiscountFactorSurface,
    ) -> PathCashflows {
        let periods = rates.tenor_count() + 1;
        let mut future_values = Vec::with_capacity(periods);
        let mut terminal_values = Vec::with_capacity(periods);
        let mut path_value = 0.0;

        for i in 1..=periods {
            let (fv, fv_prime, contribution) = self.period(i, rates, discounts);
            future_values.push(fv);
            terminal_values.push(fv_prime);
            path_value += contribution;
        }

        PathCashflows {
            future_values,
            terminal_values,
            path_value,
        }
    }

    /// `(FV[i], FVprime[i], contribution to V)` for period `i`.
    fn period(
        &self,
        i: usize,
        rates: &ForwardRateSurface,
        discounts: &DiscountFactorSurface,
    ) -> (f64, f64, f64) {
        let terminal = rates.tenor_count() + 1;
        let fixing = rates.fixing(i - 1);

        let fv = if self.is_cap {
            (fixing - self.strike).max(0.0)
        } else {
            self.notional * self.accrual_fraction * (fixing - self.strike)
        };

        let fv_prime = fv * discounts[(i, i - 1)] / discounts[(terminal, i - 1)];

        let contribution = if self.is_cap {
            fv_prime
        } else {
            fv_prime * discounts[(i, 0)]
        };

        (fv, fv_prime, contribution)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
