//! Unified pricing engine entry point
//!
//! Routes by exercise style: EUROPEAN goes to Black-Scholes, AMERICAN goes
//! to BAW or CRR depending on configuration. `model_used` always names the
//! pricer that actually ran; a validation failure before dispatch leaves it
//! empty.

use crate::config::PricingEngineConfig;
use crate::pricers::{BawPricer, BlackScholesPricer, CrrPricer};
use crate::value_objects::{
    validate_inputs, ExerciseStyle, PricingInput, PricingModel, PricingResult,
};
use crate::GreeksCalculator;

/// Pricing dispatcher over the closed pricer set.
#[derive(Debug)]
pub struct PricingEngine {
    bs_pricer: BlackScholesPricer,
    baw_pricer: BawPricer,
    crr_pricer: CrrPricer,
    american_model: PricingModel,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingEngineConfig::default())
    }
}

impl PricingEngine {
    /// Engine wired from configuration.
    #[must_use]
    pub fn new(config: PricingEngineConfig) -> Self {
        Self {
            bs_pricer: BlackScholesPricer::new(GreeksCalculator::new()),
            baw_pricer: BawPricer::new(),
            crr_pricer: CrrPricer::new(config.crr_steps),
            american_model: config.american_model,
        }
    }

    /// Price an option, routing by exercise style.
    #[must_use]
    pub fn price(&self, params: &PricingInput) -> PricingResult {
        if let Some(message) = validate_inputs(
            params.spot_price,
            params.strike_price,
            params.volatility,
            params.time_to_expiry,
        ) {
            return PricingResult::failure(message, "");
        }

        match params.exercise_style {
            ExerciseStyle::European => self.bs_pricer.price(params),
            ExerciseStyle::American => match self.american_model {
                PricingModel::Crr => self.crr_pricer.price(params),
                // BLACK_SCHOLES is not a valid American model; treat it as
                // the default BAW.
                PricingModel::Baw | PricingModel::BlackScholes => self.baw_pricer.price(params),
            },
        }
    }
}
