//! Closed-form references for the simulation.
//!
//! [`deterministic_present_value`] is the exact zero-volatility value of the
//! engine's own aggregation. [`black_cap_strip`] prices the cap as a strip of
//! Black caplets on the flat initial curve, which the simulated cap converges
//! to up to discretization bias.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::LiborError;
use crate::libor::config::SimulationConfig;
use crate::LiborResult;

/// Present value the engine produces when every rate stays at `spot_init`.
///
/// With `g = 1 + alpha * s`, `D[i][n] = g^-(i-n)` and
/// `FVprime[i] = FV[i] * g^(N+1-i)`, so
///
/// - cap:  `PV = sum_{i=1}^{N+1} max(s - K, 0) * g^-i`
/// - swap: `PV = sum_{i=1}^{N+1} notional * alpha * (s - K) * g^(N+1-2i)`
pub fn deterministic_present_value(config: &SimulationConfig) -> LiborResult<f64> {
    config.validate()?;

    let n = config.tenor_count as i32;
    let s = config.spot_init;
    let alpha = config.accrual_fraction;
    let growth = 1.0 + alpha * s;

    let pv: f64 = (1..=n + 1)
        .map(|i| {
            if config.is_cap {
                (s - config.strike).max(0.0) * growth.powi(-i)
            } else {
                config.notional * alpha * (s - config.strike) * growth.powi(n + 1 - 2 * i)
            }
        })
        .sum();
    Ok(pv)
}

/// Undiscounted Black (1976) caplet value `E[max(F_T - K, 0)]` for a
/// lognormal forward.
pub fn black_caplet(forward: f64, strike: f64, volatility: f64, expiry: f64) -> LiborResult<f64> {
    if forward <= 0.0 {
        return Err(LiborError::InvalidConfiguration {
            field: "forward".into(),
            reason: "Black formula requires a positive forward".into(),
        });
    }
    if strike <= 0.0 {
        return Ok(forward - strike);
    }
    let total_vol = volatility * expiry.max(0.0).sqrt();
    if total_vol == 0.0 {
        return Ok((forward - strike).max(0.0));
    }

    let std_normal = Normal::new(0.0, 1.0).map_err(|e| LiborError::InvalidConfiguration {
        field: "distribution".into(),
        reason: format!("Invalid Normal parameters: {e}"),
    })?;
    let d1 = ((forward / strike).ln() + 0.5 * total_vol * total_vol) / total_vol;
    let d2 = d1 - total_vol;
    Ok(forward * std_normal.cdf(d1) - strike * std_normal.cdf(d2))
}

/// Black caplet strip matching the cap payoff convention: period `i` pays
/// `max(L - K, 0)` on the rate reset at `(i - 1) * dT`, discounted with
/// `(1 + alpha * s)^-i`.
pub fn black_cap_strip(config: &SimulationConfig) -> LiborResult<f64> {
    config.validate()?;
    if !config.is_cap {
        return Err(LiborError::InvalidConfiguration {
            field: "is_cap".into(),
            reason: "Black caplet strip applies to caps only".into(),
        });
    }

    let s = config.spot_init;
    let growth = 1.0 + config.accrual_fraction * s;
    let mut pv = 0.0;
    for i in 1..=config.tenor_count + 1 {
        let expiry = (i - 1) as f64 * config.time_step;
        let caplet = black_caplet(s, config.strike, config.volatility, expiry)?;
        pv += caplet * growth.powi(-(i as i32));
    }
    Ok(pv)
}
