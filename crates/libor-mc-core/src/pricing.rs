//! The `price(params) -> value` contract shared by the Monte Carlo pricers
//! built on [`crate::random::NormalSampler`].

use crate::LiborResult;

pub trait Pricer {
    type Params;

    /// Present value of the instrument described by `params`.
    fn price(&self, params: &Self::Params) -> LiborResult<f64>;
}
