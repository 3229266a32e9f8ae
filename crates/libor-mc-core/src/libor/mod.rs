//! Discretized LIBOR market model: forward-curve evolution, discount-factor
//! bootstrap, cap/swap payoffs and Monte Carlo aggregation.

pub mod analytic;
pub mod config;
pub mod discount;
pub mod engine;
pub mod forward_curve;
pub mod payoff;
pub mod surface;

pub use config::{SimulationConfig, TerminalDiscounting};
pub use engine::{evaluate_paths, price_libor, simulate, LiborPricer, SimulationResult};
pub use surface::{DiscountFactorSurface, ForwardRateSurface, PathSample};
