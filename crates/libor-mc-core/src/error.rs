use std::fmt;

use thiserror::Error;

/// Quantity that left its numerical domain during a path evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainQuantity {
    /// A simulated forward rate overflowed or became NaN.
    ForwardRate,
    /// `1 + alpha * L` is not strictly positive.
    DiscountDenominator,
    /// A bootstrapped discount factor is not finite and positive.
    DiscountFactor,
    /// The accumulated payoff of a path is not finite.
    PathValue,
}

impl fmt::Display for DomainQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DomainQuantity::ForwardRate => "forward rate L is not finite",
            DomainQuantity::DiscountDenominator => "1 + alpha * L is not positive",
            DomainQuantity::DiscountFactor => "discount factor D is not finite and positive",
            DomainQuantity::PathValue => "path value V is not finite",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum LiborError {
    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Numerical domain error at tenor {tenor}, step {step}: {quantity} (got {value})")]
    NumericalDomain {
        tenor: usize,
        step: usize,
        quantity: DomainQuantity,
        value: f64,
    },

    #[error("Sampler degenerate draw: no acceptable point after {attempts} attempts")]
    SamplerDegenerateDraw { attempts: u32 },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LiborError {
    fn from(e: serde_json::Error) -> Self {
        LiborError::Serialization(e.to_string())
    }
}
