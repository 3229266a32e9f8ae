use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{DomainQuantity, LiborError};
use crate::libor::config::{SimulationConfig, TerminalDiscounting};
use crate::libor::discount::DiscountFactorBuilder;
use crate::libor::forward_curve::ForwardCurveSimulator;
use crate::libor::payoff::PayoffEngine;
use crate::libor::surface::PathSample;
use crate::pricing::Pricer;
use crate::random::{derive_path_seed, resolve_base_seed, PolarBoxMuller};
use crate::types::{with_metadata, ComputationOutput};
use crate::LiborResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Sample statistics of the path values `V`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStatistics {
    pub mean: f64,
    pub std_dev: f64,
    pub standard_error: f64,
    /// 95% confidence interval of the mean path value.
    pub confidence_interval_95: (f64, f64),
    pub min: f64,
    pub max: f64,
}

/// Output of a LIBOR market model simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Path values `V`, one per path in path order.
    pub values: Vec<f64>,
    pub present_value: f64,
    /// Standard error of `present_value`.
    pub present_value_standard_error: f64,
    /// `D[N+1][0]` applied by the cap branch: the last path's factor, or
    /// the path average under [`TerminalDiscounting::PathAverage`]. `None`
    /// for swaps, whose path values are already discounted to time 0.
    pub terminal_discount_factor: Option<f64>,
    pub statistics: SimulationStatistics,
}

#[derive(Debug, Clone, Copy)]
struct PathOutcome {
    value: f64,
    terminal_discount: f64,
}

/// Draw, evolve, discount and pay off paths for one configuration.
#[derive(Debug, Clone, Copy)]
struct LiborEngine {
    tenor_count: usize,
    time_step: f64,
    simulator: ForwardCurveSimulator,
    discounts: DiscountFactorBuilder,
    payoff: PayoffEngine,
}

impl LiborEngine {
    fn new(config: &SimulationConfig) -> Self {
        Self {
            tenor_count: config.tenor_count,
            time_step: config.time_step,
            simulator: ForwardCurveSimulator::from_config(config),
            discounts: DiscountFactorBuilder::from_config(config),
            payoff: PayoffEngine::from_config(config),
        }
    }

    fn evaluate(&self, sample: &PathSample) -> LiborResult<PathOutcome> {
        let rates = self.simulator.simulate(sample)?;
        let discounts = self.discounts.build(&rates)?;
        let value = self.payoff.path_value(&rates, &discounts);
        // Reported at the terminal tenor, step 0: V is a sum over all periods.
        if !value.is_finite() {
            return Err(LiborError::NumericalDomain {
                tenor: self.tenor_count + 1,
                step: 0,
                quantity: DomainQuantity::PathValue,
                value,
            });
        }
        Ok(PathOutcome {
            value,
            terminal_discount: discounts.terminal(),
        })
    }

    /// Each path owns a sampler seeded from `(base_seed, path_index)`.
    fn simulate_path(&self, base_seed: u64, path_index: usize) -> LiborResult<PathOutcome> {
        let mut sampler = PolarBoxMuller::seeded(derive_path_seed(base_seed, path_index as u64));
        let sample = PathSample::draw(&mut sampler, self.tenor_count, self.time_step)?;
        self.evaluate(&sample).map_err(|e| {
            warn!(path = path_index, error = %e, "path evaluation failed");
            e
        })
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Neumaier compensated summation.
fn compensated_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}

fn compute_statistics(values: &[f64]) -> SimulationStatistics {
    let n = values.len() as f64;
    let mean = compensated_sum(values.iter().copied()) / n;
    let variance = if values.len() > 1 {
        compensated_sum(values.iter().map(|v| (v - mean).powi(2))) / (n - 1.0)
    } else {
        0.0
    };
    let std_dev = variance.sqrt();
    let standard_error = std_dev / n.sqrt();
    let half_width = 1.96 * standard_error;

    SimulationStatistics {
        mean,
        std_dev,
        standard_error,
        confidence_interval_95: (mean - half_width, mean + half_width),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

fn aggregate(config: &SimulationConfig, outcomes: &[PathOutcome]) -> SimulationResult {
    let values: Vec<f64> = outcomes.iter().map(|o| o.value).collect();
    let statistics = compute_statistics(&values);
    let m = outcomes.len() as f64;
    let last_terminal = outcomes.last().map_or(1.0, |o| o.terminal_discount);

    let (present_value, present_value_standard_error, terminal_discount_factor) =
        if !config.is_cap {
            (statistics.mean, statistics.standard_error, None)
        } else {
            match config.terminal_discounting {
                TerminalDiscounting::LastPath => (
                    last_terminal * statistics.mean,
                    last_terminal * statistics.standard_error,
                    Some(last_terminal),
                ),
                TerminalDiscounting::PathAverage => {
                    let discounted: Vec<f64> = outcomes
                        .iter()
                        .map(|o| o.value * o.terminal_discount)
                        .collect();
                    let discounted_stats = compute_statistics(&discounted);
                    let mean_terminal =
                        compensated_sum(outcomes.iter().map(|o| o.terminal_discount)) / m;
                    (
                        discounted_stats.mean,
                        discounted_stats.standard_error,
                        Some(mean_terminal),
                    )
                }
            }
        };

    debug!(
        present_value,
        standard_error = present_value_standard_error,
        terminal_discount_factor = ?terminal_discount_factor,
        "paths aggregated"
    );

    SimulationResult {
        values,
        present_value,
        present_value_standard_error,
        terminal_discount_factor,
        statistics,
    }
}

fn run_paths(
    engine: &LiborEngine,
    config: &SimulationConfig,
    base_seed: u64,
) -> LiborResult<Vec<PathOutcome>> {
    #[cfg(feature = "parallel")]
    if config.parallel {
        use rayon::prelude::*;
        return (0..config.path_count)
            .into_par_iter()
            .map(|p| engine.simulate_path(base_seed, p))
            .collect();
    }

    (0..config.path_count)
        .map(|p| engine.simulate_path(base_seed, p))
        .collect()
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate pre-drawn path samples. Pure function of its inputs.
pub fn evaluate_paths(
    config: &SimulationConfig,
    samples: &[PathSample],
) -> LiborResult<SimulationResult> {
    config.validate()?;
    if samples.len() != config.path_count {
        return Err(LiborError::InvalidConfiguration {
            field: "path_samples".into(),
            reason: format!(
                "Expected {} path samples, got {}",
                config.path_count,
                samples.len()
            ),
        });
    }

    let engine = LiborEngine::new(config);
    let outcomes = samples
        .iter()
        .map(|s| engine.evaluate(s))
        .collect::<LiborResult<Vec<_>>>()?;
    Ok(aggregate(config, &outcomes))
}

/// Run `path_count` independent paths and aggregate them.
///
/// Path `p` draws from a polar Box-Muller sampler seeded with
/// `derive_path_seed(seed, p)`, so results are identical whether paths run
/// sequentially or on the rayon pool. Any failed path fails the run.
pub fn simulate(config: &SimulationConfig) -> LiborResult<SimulationResult> {
    config.validate()?;
    let base_seed = resolve_base_seed(config.seed);

    info!(
        paths = config.path_count,
        tenors = config.tenor_count,
        is_cap = config.is_cap,
        parallel = config.parallel,
        "starting LIBOR market model simulation"
    );

    let engine = LiborEngine::new(config);
    let outcomes = run_paths(&engine, config, base_seed)?;
    Ok(aggregate(config, &outcomes))
}

/// Run a LIBOR market model simulation wrapped in the standard output
/// envelope.
pub fn price_libor(
    config: &SimulationConfig,
) -> LiborResult<ComputationOutput<SimulationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if (config.accrual_fraction - config.time_step).abs() > f64::EPSILON {
        warnings.push(format!(
            "accrual_fraction ({}) differs from time_step ({})",
            config.accrual_fraction, config.time_step
        ));
    }
    if config.parallel && cfg!(not(feature = "parallel")) {
        warn!("parallel evaluation requested without the `parallel` feature");
        warnings.push(
            "parallel requested but the `parallel` feature is disabled; paths ran sequentially"
                .into(),
        );
    }

    let result = simulate(config)?;

    let elapsed = start.elapsed().as_micros() as u64;
    info!(
        present_value = result.present_value,
        elapsed_us = elapsed,
        "LIBOR market model simulation complete"
    );

    let instrument = if config.is_cap { "cap" } else { "swap" };
    Ok(with_metadata(
        "LIBOR Market Model Monte Carlo (single-factor, terminal measure, log-Euler)",
        &serde_json::json!({
            "instrument": instrument,
            "notional": config.notional,
            "strike": config.strike,
            "accrual_fraction": config.accrual_fraction,
            "volatility": config.volatility,
            "time_step": config.time_step,
            "tenor_count": config.tenor_count,
            "path_count": config.path_count,
            "spot_init": config.spot_init,
            "seed": config.seed,
            "terminal_discounting": config.terminal_discounting,
            "sampler": "polar_box_muller",
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// [`Pricer`] over a [`SimulationConfig`], returning the present value.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiborPricer;

impl Pricer for LiborPricer {
    type Params = SimulationConfig;

    fn price(&self, params: &SimulationConfig) -> LiborResult<f64> {
        simulate(params).map(|r| r.present_value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
