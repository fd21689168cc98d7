//! Black-Scholes pricer for European options

use crate::greeks::GreeksCalculator;
use crate::value_objects::{validate_inputs, PricingInput, PricingResult};

/// European pricer backed by the shared Black-Scholes formula.
///
/// Prices produced here are bit-identical to
/// [`GreeksCalculator::bs_price`] on the same parameters.
#[derive(Debug, Default)]
pub struct BlackScholesPricer {
    calculator: GreeksCalculator,
}

impl BlackScholesPricer {
    /// Pricer backed by the given calculator.
    #[must_use]
    pub fn new(calculator: GreeksCalculator) -> Self {
        Self { calculator }
    }

    /// Theoretical European price.
    #[must_use]
    pub fn price(&self, params: &PricingInput) -> PricingResult {
        if let Some(message) = validate_inputs(
            params.spot_price,
            params.strike_price,
            params.volatility,
            params.time_to_expiry,
        ) {
            return PricingResult::failure(message, "black_scholes");
        }

        let price = self.calculator.bs_price(&params.as_greeks_input());
        if !price.is_finite() {
            return PricingResult::failure(format!("计算溢出: price={price}"), "black_scholes");
        }
        PricingResult::priced(price, "black_scholes")
    }
}
