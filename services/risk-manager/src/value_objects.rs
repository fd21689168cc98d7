//! Risk value objects

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-position and per-portfolio Greek limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Delta limit per position
    pub position_delta_limit: f64,
    /// Gamma limit per position
    pub position_gamma_limit: f64,
    /// Vega limit per position
    pub position_vega_limit: f64,
    /// Delta limit for the whole portfolio
    pub portfolio_delta_limit: f64,
    /// Gamma limit for the whole portfolio
    pub portfolio_gamma_limit: f64,
    /// Vega limit for the whole portfolio
    pub portfolio_vega_limit: f64,
}

/// Budget split dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationDimension {
    /// Split budgets per underlying contract
    Underlying,
    /// Split budgets per strategy signal
    Strategy,
}

/// Allocation configuration: how the portfolio budget is split.
///
/// When `allocation_ratios` is non-empty it must sum to 1.0 (within 0.01)
/// with every ratio non-negative; the allocator validates this at
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBudgetConfig {
    /// Split dimension
    pub allocation_dimension: AllocationDimension,
    /// Key (underlying or signal) to ratio
    pub allocation_ratios: FxHashMap<String, f64>,
}

impl Default for RiskBudgetConfig {
    fn default() -> Self {
        Self {
            allocation_dimension: AllocationDimension::Underlying,
            allocation_ratios: FxHashMap::default(),
        }
    }
}

/// Configuration validation failure.
#[derive(Debug, Error, PartialEq)]
pub enum RiskConfigError {
    /// A ratio below zero
    #[error("分配比例不能为负数: {key} = {ratio}")]
    NegativeRatio {
        /// Offending key
        key: String,
        /// Offending ratio
        ratio: f64,
    },
    /// Ratios not summing to one
    #[error("分配比例总和应为 1.0，当前为 {total:.4}")]
    RatioSumMismatch {
        /// Observed sum
        total: f64,
    },
}

/// Greek budget assigned to one allocation key.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GreeksBudget {
    /// Delta budget
    pub delta_budget: f64,
    /// Gamma budget
    pub gamma_budget: f64,
    /// Vega budget
    pub vega_budget: f64,
}

/// Accumulated Greek usage for one allocation key.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GreeksUsage {
    /// Absolute delta in use
    pub delta_used: f64,
    /// Absolute gamma in use
    pub gamma_used: f64,
    /// Absolute vega in use
    pub vega_used: f64,
    /// Number of positions that contributed
    pub position_count: u32,
}

/// Outcome of a budget limit check. Exceeding a budget is a reportable
/// state, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCheckResult {
    /// True when no dimension exceeds its budget
    pub passed: bool,
    /// Failing dimensions in fixed order delta, gamma, vega
    pub exceeded_dimensions: Vec<String>,
    /// Usage that was checked
    pub usage: GreeksUsage,
    /// Budget it was checked against
    pub budget: GreeksBudget,
    /// Human-readable summary
    pub message: String,
}
