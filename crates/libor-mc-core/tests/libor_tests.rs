use libor_mc_core::libor::analytic::{black_cap_strip, deterministic_present_value};
use libor_mc_core::libor::discount::DiscountFactorBuilder;
use libor_mc_core::libor::forward_curve::ForwardCurveSimulator;
use libor_mc_core::libor::payoff::PayoffEngine;
use libor_mc_core::libor::{
    evaluate_paths, price_libor, simulate, PathSample, SimulationConfig, TerminalDiscounting,
};
use libor_mc_core::random::{derive_path_seed, PolarBoxMuller};
use libor_mc_core::{DomainQuantity, LiborError};
use pretty_assertions::assert_eq;

const SEED: u64 = 20_240_601;

/// Swap leg from the reference swap example.
fn scenario_a() -> SimulationConfig {
    SimulationConfig::swap(1e6, 0.04, 0.25, 0.15, 0.25, 3, 1000).with_seed(SEED)
}

/// Cap from the reference cap example.
fn scenario_b() -> SimulationConfig {
    SimulationConfig::cap(0.05, 0.5, 0.15, 0.5, 4, 1000).with_seed(SEED)
}

fn relative_close(actual: f64, expected: f64, tol: f64) -> bool {
    (actual - expected).abs() <= tol * expected.abs().max(1e-12)
}

// ===========================================================================
// Zero-volatility determinism
// ===========================================================================

#[test]
fn test_zero_vol_swap_matches_closed_form() {
    let mut config = scenario_a();
    config.volatility = 0.0;
    let result = simulate(&config).unwrap();
    let expected = deterministic_present_value(&config).unwrap();
    assert!(
        relative_close(result.present_value, expected, 1e-12),
        "pv={} expected={expected}",
        result.present_value
    );
    // Every path is identical when sigma = 0.
    assert!(result.values.iter().all(|&v| v == result.values[0]));
}

#[test]
fn test_zero_vol_cap_matches_closed_form() {
    let mut config = scenario_b();
    config.volatility = 0.0;
    config.strike = 0.03;
    let result = simulate(&config).unwrap();
    let expected = deterministic_present_value(&config).unwrap();
    assert!(
        relative_close(result.present_value, expected, 1e-12),
        "pv={} expected={expected}",
        result.present_value
    );
}

#[test]
fn test_zero_vol_value_independent_of_path_count() {
    let mut few = scenario_a();
    few.volatility = 0.0;
    few.path_count = 1;
    let mut many = few.clone();
    many.path_count = 500;
    let a = simulate(&few).unwrap().present_value;
    let b = simulate(&many).unwrap().present_value;
    assert!(relative_close(a, b, 1e-12), "{a} vs {b}");
}

#[test]
fn test_at_the_money_zero_vol_cap_is_worthless() {
    let mut config = scenario_b();
    config.volatility = 0.0;
    config.strike = config.spot_init;
    let result = simulate(&config).unwrap();
    assert_eq!(result.present_value, 0.0);
    assert!(result.values.iter().all(|&v| v == 0.0));
}

// ===========================================================================
// Reproducibility
// ===========================================================================

#[test]
fn test_fixed_seed_is_bit_identical() {
    let a = simulate(&scenario_a()).unwrap();
    let b = simulate(&scenario_a()).unwrap();
    assert_eq!(a.values, b.values);
    assert_eq!(a.present_value.to_bits(), b.present_value.to_bits());
}

#[test]
fn test_different_seeds_differ() {
    let a = simulate(&scenario_a()).unwrap();
    let b = simulate(&scenario_a().with_seed(SEED + 1)).unwrap();
    assert!(a.values != b.values);
}

#[test]
fn test_simulate_matches_explicit_samples() {
    // simulate() is evaluate_paths() over per-path seeded samples.
    let mut config = scenario_b();
    config.path_count = 50;
    let samples: Vec<PathSample> = (0..50)
        .map(|p| {
            let mut sampler = PolarBoxMuller::seeded(derive_path_seed(SEED, p));
            PathSample::draw(&mut sampler, config.tenor_count, config.time_step).unwrap()
        })
        .collect();
    let explicit = evaluate_paths(&config, &samples).unwrap();
    let drawn = simulate(&config).unwrap();
    assert_eq!(explicit, drawn);
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_matches_sequential() {
    let sequential = simulate(&scenario_b()).unwrap();
    let parallel = simulate(&scenario_b().with_parallel(true)).unwrap();
    assert_eq!(sequential.values, parallel.values);
    assert_eq!(
        sequential.present_value.to_bits(),
        parallel.present_value.to_bits()
    );
}

// ===========================================================================
// Convergence
// ===========================================================================

#[test]
fn test_standard_error_shrinks_with_sqrt_paths() {
    let mut small = scenario_b();
    small.path_count = 1_000;
    let mut large = scenario_b();
    large.path_count = 16_000;
    let se_small = simulate(&small).unwrap().present_value_standard_error;
    let se_large = simulate(&large).unwrap().present_value_standard_error;
    let ratio = se_large / se_small;
    // Expect 1/sqrt(16) = 0.25
    assert!((0.2..0.3).contains(&ratio), "ratio={ratio}");
}

#[test]
fn test_low_path_run_agrees_with_high_path_reference() {
    let mut reference = scenario_b().with_seed(1);
    reference.path_count = 40_000;
    let mut trial = scenario_b().with_seed(2);
    trial.path_count = 2_000;

    let r = simulate(&reference).unwrap();
    let t = simulate(&trial).unwrap();
    let combined_se = (r.present_value_standard_error.powi(2)
        + t.present_value_standard_error.powi(2))
    .sqrt();
    assert!(
        (r.present_value - t.present_value).abs() < 4.0 * combined_se,
        "reference={} trial={} se={combined_se}",
        r.present_value,
        t.present_value
    );
}

#[test]
fn test_cap_converges_to_black_strip() {
    let mut config = scenario_b();
    config.path_count = 20_000;
    let result = simulate(&config).unwrap();
    let black = black_cap_strip(&config).unwrap();
    let tolerance = 4.0 * result.present_value_standard_error + 0.02 * black;
    assert!(
        (result.present_value - black).abs() < tolerance,
        "mc={} black={black} tol={tolerance}",
        result.present_value
    );
}

// ===========================================================================
// End-to-end scenarios
// ===========================================================================

/// Forward-measure expectation of the scenario A swap leg,
/// `sum notional * alpha * (s - K) * (1 + alpha * s)^(N+1-2i)`.
const SCENARIO_A_REFERENCE_PV: f64 = 9_880.353_957_456_846;

#[test]
fn test_scenario_a_swap() {
    let result = simulate(&scenario_a()).unwrap();
    assert_eq!(result.values.len(), 1000);
    assert!(result.present_value.is_finite());

    let band = 5.0 * result.present_value_standard_error;
    assert!(
        (result.present_value - SCENARIO_A_REFERENCE_PV).abs() < band,
        "pv={} reference={SCENARIO_A_REFERENCE_PV} band={band}",
        result.present_value
    );
}

#[test]
fn test_scenario_b_cap_payoffs_non_negative() {
    let config = scenario_b();
    let simulator = ForwardCurveSimulator::from_config(&config);
    let builder = DiscountFactorBuilder::from_config(&config);
    let payoff = PayoffEngine::from_config(&config);

    for p in 0..200 {
        let mut sampler = PolarBoxMuller::seeded(derive_path_seed(SEED, p));
        let sample = PathSample::draw(&mut sampler, config.tenor_count, config.time_step).unwrap();
        let rates = simulator.simulate(&sample).unwrap();
        let discounts = builder.build(&rates).unwrap();
        let cashflows = payoff.cashflows(&rates, &discounts);
        assert!(cashflows.future_values.iter().all(|&fv| fv >= 0.0));
    }

    let result = simulate(&config).unwrap();
    assert_eq!(result.values.len(), 1000);
    assert!(result.values.iter().all(|&v| v >= 0.0));
    assert!(result.present_value >= 0.0);
}

#[test]
fn test_scenario_b_path_average_discounting() {
    let last = simulate(&scenario_b()).unwrap();
    let averaged = simulate(
        &scenario_b().with_terminal_discounting(TerminalDiscounting::PathAverage),
    )
    .unwrap();
    // The initial curve is flat, so D[N+1][0] is the same on every path.
    assert!(relative_close(
        averaged.present_value,
        last.present_value,
        1e-12
    ));
}

// ===========================================================================
// Error handling
// ===========================================================================

#[test]
fn test_invalid_configurations_rejected() {
    let cases: [(&str, fn(&mut SimulationConfig)); 4] = [
        ("tenor_count", |c: &mut SimulationConfig| c.tenor_count = 0),
        ("path_count", |c: &mut SimulationConfig| c.path_count = 0),
        ("volatility", |c: &mut SimulationConfig| c.volatility = -0.1),
        ("time_step", |c: &mut SimulationConfig| c.time_step = 0.0),
    ];
    for (expected, mutate) in cases {
        let mut config = scenario_a();
        mutate(&mut config);
        match simulate(&config) {
            Err(LiborError::InvalidConfiguration { field, .. }) => assert_eq!(field, expected),
            other => panic!("{expected}: expected invalid configuration, got {other:?}"),
        }
    }
}

#[test]
fn test_numerical_domain_error_fails_run() {
    // A negative initial curve with large volatility drives 1 + alpha * L below zero.
    let config = SimulationConfig {
        volatility: 2.0,
        accrual_fraction: 1.0,
        time_step: 1.0,
        spot_init: -0.9,
        tenor_count: 4,
        path_count: 500,
        ..scenario_a()
    };
    match simulate(&config) {
        Err(LiborError::NumericalDomain {
            quantity, value, ..
        }) => match quantity {
            DomainQuantity::DiscountDenominator => assert!(value <= 0.0, "{value}"),
            DomainQuantity::ForwardRate => assert!(!value.is_finite(), "{value}"),
            other => panic!("unexpected quantity {other:?}"),
        },
        other => panic!("expected numerical domain error, got {other:?}"),
    }
}

// ===========================================================================
// Output envelope
// ===========================================================================

#[test]
fn test_price_libor_from_json_config() {
    let json = r#"{
        "notional": 1000000.0,
        "strike": 0.04,
        "accrual_fraction": 0.25,
        "volatility": 0.15,
        "time_step": 0.25,
        "tenor_count": 3,
        "path_count": 1000,
        "seed": 20240601
    }"#;
    let config = SimulationConfig::from_json(json).unwrap();
    let out = price_libor(&config).unwrap();
    let direct = simulate(&scenario_a()).unwrap();
    assert_eq!(out.result.values, direct.values);

    let value = serde_json::to_value(&out).unwrap();
    assert_eq!(value["result"]["values"].as_array().unwrap().len(), 1000);
    assert!(value["result"]["present_value"].is_number());
    assert_eq!(value["assumptions"]["terminal_discounting"], "last_path");
}
