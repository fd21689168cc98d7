//! Option pricing core
//!
//! Pure numeric services for the strategy engine:
//! - Black-Scholes pricing and Greeks (Delta, Gamma, Theta, Vega)
//! - Barone-Adesi-Whaley approximation for American options
//! - Cox-Ross-Rubinstein binomial tree (European and American)
//! - Multi-algorithm implied volatility solver with batch mode
//! - Volatility surface built from solved quotes
//!
//! Every service reports failure through its result record
//! (`success` flag + error message) and never panics on bad input.

pub mod config;
pub mod engine;
pub mod greeks;
pub mod iv;
pub mod pricers;
pub mod value_objects;
pub mod volatility;

pub use config::PricingEngineConfig;
pub use engine::PricingEngine;
pub use greeks::GreeksCalculator;
pub use iv::{IvSolver, SolveMethod};
pub use pricers::{BawPricer, BlackScholesPricer, CrrPricer};
pub use value_objects::{
    ExerciseStyle, GreeksInput, GreeksResult, IVQuote, IVResult, OptionKind, PricingInput,
    PricingModel, PricingResult,
};
