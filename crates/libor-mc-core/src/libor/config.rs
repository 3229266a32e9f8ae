use serde::{Deserialize, Serialize};

use crate::error::LiborError;
use crate::types::{Rate, Years};
use crate::LiborResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the cap branch converts terminal-numeraire path values to time 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalDiscounting {
    /// `PV = D[N+1][0] * mean(V)` using the terminal discount factor of the
    /// last evaluated path.
    #[default]
    LastPath,
    /// `PV = mean(V[p] * D_p[N+1][0])`, each path discounted with its own
    /// terminal discount factor.
    PathAverage,
}

/// Input for a LIBOR market model simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Swap notional. Ignored by the cap payoff.
    #[serde(default)]
    pub notional: f64,
    /// Strike rate K.
    #[serde(default = "default_strike")]
    pub strike: Rate,
    /// Day-count fraction alpha applied to each forward rate.
    #[serde(default = "default_accrual_fraction")]
    pub accrual_fraction: Years,
    /// Forward-rate volatility sigma.
    #[serde(default = "default_volatility")]
    pub volatility: f64,
    /// Simulation step dT, independent of the accrual fraction.
    #[serde(default = "default_time_step")]
    pub time_step: Years,
    /// Number of tenors N.
    #[serde(default = "default_tenor_count")]
    pub tenor_count: usize,
    /// Number of Monte Carlo paths M.
    #[serde(default = "default_path_count")]
    pub path_count: usize,
    /// Price a cap (true) or a swap leg (false).
    #[serde(default)]
    pub is_cap: bool,
    /// Flat initial forward rate shared by every tenor.
    #[serde(default = "default_spot_init")]
    pub spot_init: Rate,
    /// Optional seed for reproducibility.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub terminal_discounting: TerminalDiscounting,
    /// Evaluate paths on the rayon pool (requires the `parallel` feature).
    #[serde(default)]
    pub parallel: bool,
}

fn default_strike() -> Rate {
    0.05
}

fn default_accrual_fraction() -> Years {
    0.5
}

fn default_volatility() -> f64 {
    0.15
}

fn default_time_step() -> Years {
    0.5
}

fn default_tenor_count() -> usize {
    4
}

fn default_path_count() -> usize {
    10_000
}

fn default_spot_init() -> Rate {
    0.05
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            notional: 0.0,
            strike: default_strike(),
            accrual_fraction: default_accrual_fraction(),
            volatility: default_volatility(),
            time_step: default_time_step(),
            tenor_count: default_tenor_count(),
            path_count: default_path_count(),
            is_cap: false,
            spot_init: default_spot_init(),
            seed: None,
            terminal_discounting: TerminalDiscounting::default(),
            parallel: false,
        }
    }
}

impl SimulationConfig {
    /// Swap leg paying `notional * alpha * (L - K)` each period.
    pub fn swap(
        notional: f64,
        strike: Rate,
        accrual_fraction: Years,
        volatility: f64,
        time_step: Years,
        tenor_count: usize,
        path_count: usize,
    ) -> Self {
        Self {
            notional,
            strike,
            accrual_fraction,
            volatility,
            time_step,
            tenor_count,
            path_count,
            is_cap: false,
            ..Self::default()
        }
    }

    /// Cap paying `max(L - K, 0)` each period. No notional applies.
    pub fn cap(
        strike: Rate,
        accrual_fraction: Years,
        volatility: f64,
        time_step: Years,
        tenor_count: usize,
        path_count: usize,
    ) -> Self {
        Self {
            strike,
            accrual_fraction,
            volatility,
            time_step,
            tenor_count,
            path_count,
            is_cap: true,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_spot_init(mut self, spot_init: Rate) -> Self {
        self.spot_init = spot_init;
        self
    }

    pub fn with_terminal_discounting(mut self, mode: TerminalDiscounting) -> Self {
        self.terminal_discounting = mode;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json(json: &str) -> LiborResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject configurations that cannot produce a meaningful simulation.
    pub fn validate(&self) -> LiborResult<()> {
        let finite_fields = [
            ("notional", self.notional),
            ("strike", self.strike),
            ("accrual_fraction", self.accrual_fraction),
            ("volatility", self.volatility),
            ("time_step", self.time_step),
            ("spot_init", self.spot_init),
        ];
        for (field, value) in finite_fields {
            if !value.is_finite() {
                return Err(invalid(field, "Must be a finite number"));
            }
        }
        if self.tenor_count < 1 {
            return Err(invalid("tenor_count", "Must be at least 1"));
        }
        if self.path_count < 1 {
            return Err(invalid("path_count", "Must be at least 1"));
        }
        if self.volatility < 0.0 {
            return Err(invalid("volatility", "Volatility cannot be negative"));
        }
        if self.time_step <= 0.0 {
            return Err(invalid("time_step", "Time step must be positive"));
        }
        if 1.0 + self.accrual_fraction * self.spot_init <= 0.0 {
            return Err(invalid(
                "spot_init",
                "1 + accrual_fraction * spot_init must be positive",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> LiborError {
    LiborError::InvalidConfiguration {
        field: field.into(),
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
