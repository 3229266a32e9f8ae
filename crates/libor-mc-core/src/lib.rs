pub mod error;
pub mod pricing;
pub mod random;
pub mod types;

#[cfg(feature = "libor")]
pub mod libor;

pub use error::{DomainQuantity, LiborError};
pub use types::*;

/// Standard result type for all libor-mc operations
pub type LiborResult<T> = Result<T, LiborError>;
