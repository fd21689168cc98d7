//! Pricing value objects
//!
//! Immutable numeric records exchanged with the pricing services. A failed
//! computation is reported in-band: `success = false`, all numeric fields
//! zeroed, and a non-empty error message.

use serde::{Deserialize, Serialize};

/// Call or put
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Right to buy the underlying at strike
    Call,
    /// Right to sell the underlying at strike
    Put,
}

/// Exercise style of an option contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseStyle {
    /// Exercisable only at expiry
    European,
    /// Exercisable at any time up to expiry
    American,
}

/// Pricing model selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    /// Barone-Adesi-Whaley analytic approximation
    Baw,
    /// Cox-Ross-Rubinstein binomial tree
    Crr,
    /// Black-Scholes closed form
    BlackScholes,
}

/// Inputs to the Greeks calculator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreeksInput {
    /// Underlying spot price
    pub spot_price: f64,
    /// Strike price
    pub strike_price: f64,
    /// Time to expiry in years
    pub time_to_expiry: f64,
    /// Annualised risk-free rate
    pub risk_free_rate: f64,
    /// Volatility (implied or historical)
    pub volatility: f64,
    /// Call or put
    pub option_type: OptionKind,
}

/// Greeks calculation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreeksResult {
    /// Sensitivity to spot
    pub delta: f64,
    /// Sensitivity of delta to spot
    pub gamma: f64,
    /// Time decay per calendar day
    pub theta: f64,
    /// Sensitivity to a 1% volatility move
    pub vega: f64,
    /// Whether the calculation succeeded
    pub success: bool,
    /// Failure description, empty on success
    pub error_message: String,
}

impl Default for GreeksResult {
    fn default() -> Self {
        Self {
            delta: 0.0,
            gamma: 0.0,
            theta: 0.0,
            vega: 0.0,
            success: true,
            error_message: String::new(),
        }
    }
}

impl GreeksResult {
    /// Failed result with all Greeks zeroed.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: message.into(),
            ..Self::default()
        }
    }
}

/// Implied volatility solver result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IVResult {
    /// Solved volatility
    pub implied_volatility: f64,
    /// Iterations consumed
    pub iterations: u32,
    /// Whether the solver converged
    pub success: bool,
    /// Failure description, empty on success
    pub error_message: String,
}

impl Default for IVResult {
    fn default() -> Self {
        Self {
            implied_volatility: 0.0,
            iterations: 0,
            success: true,
            error_message: String::new(),
        }
    }
}

impl IVResult {
    /// Converged result.
    #[must_use]
    pub fn converged(implied_volatility: f64, iterations: u32) -> Self {
        Self {
            implied_volatility,
            iterations,
            ..Self::default()
        }
    }

    /// Failed result.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: message.into(),
            ..Self::default()
        }
    }
}

/// One quote in a batch implied volatility request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IVQuote {
    /// Observed option price
    pub market_price: f64,
    /// Underlying spot price
    pub spot_price: f64,
    /// Strike price
    pub strike_price: f64,
    /// Time to expiry in years
    pub time_to_expiry: f64,
    /// Annualised risk-free rate
    pub risk_free_rate: f64,
    /// Call or put
    pub option_type: OptionKind,
}

/// Inputs to the pricing engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    /// Underlying spot price
    pub spot_price: f64,
    /// Strike price
    pub strike_price: f64,
    /// Time to expiry in years
    pub time_to_expiry: f64,
    /// Annualised risk-free rate
    pub risk_free_rate: f64,
    /// Volatility
    pub volatility: f64,
    /// Call or put
    pub option_type: OptionKind,
    /// European or American
    pub exercise_style: ExerciseStyle,
}

impl PricingInput {
    /// View of the same parameters as a Greeks input.
    #[must_use]
    pub fn as_greeks_input(&self) -> GreeksInput {
        GreeksInput {
            spot_price: self.spot_price,
            strike_price: self.strike_price,
            time_to_expiry: self.time_to_expiry,
            risk_free_rate: self.risk_free_rate,
            volatility: self.volatility,
            option_type: self.option_type,
        }
    }
}

/// Pricing result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Theoretical price
    pub price: f64,
    /// Name of the model that actually priced: `"black_scholes"`, `"baw"`,
    /// `"crr"`, or empty when validation failed before dispatch
    pub model_used: String,
    /// Whether pricing succeeded
    pub success: bool,
    /// Failure description, empty on success
    pub error_message: String,
}

impl PricingResult {
    /// Successful result from the named model.
    #[must_use]
    pub fn priced(price: f64, model_used: &str) -> Self {
        Self {
            price,
            model_used: model_used.to_string(),
            success: true,
            error_message: String::new(),
        }
    }

    /// Failed result attributed to the named model (empty before dispatch).
    #[must_use]
    pub fn failure(message: impl Into<String>, model_used: &str) -> Self {
        Self {
            price: 0.0,
            model_used: model_used.to_string(),
            success: false,
            error_message: message.into(),
        }
    }
}

/// Validate common pricing inputs; returns the offending-field message or
/// `None` when the inputs are usable.
#[must_use]
pub fn validate_inputs(
    spot_price: f64,
    strike_price: f64,
    volatility: f64,
    time_to_expiry: f64,
) -> Option<&'static str> {
    if spot_price <= 0.0 {
        return Some("spot_price 必须大于 0");
    }
    if strike_price <= 0.0 {
        return Some("strike_price 必须大于 0");
    }
    if volatility <= 0.0 {
        return Some("volatility 必须大于 0");
    }
    if time_to_expiry < 0.0 {
        return Some("time_to_expiry 不能为负数");
    }
    None
}

/// Intrinsic value at expiry.
#[must_use]
pub fn intrinsic_value(spot: f64, strike: f64, kind: OptionKind) -> f64 {
    match kind {
        OptionKind::Call => (spot - strike).max(0.0),
        OptionKind::Put => (strike - spot).max(0.0),
    }
}
