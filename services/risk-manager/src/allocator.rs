//! Risk budget allocation
//!
//! Splits portfolio Greek limits by configured ratios, accumulates usage
//! from live positions and checks per-dimension limits.

use options_engine::GreeksResult;
use rustc_hash::FxHashMap;
use services_common::Position;

use crate::value_objects::{
    AllocationDimension, BudgetCheckResult, GreeksBudget, GreeksUsage, RiskBudgetConfig,
    RiskConfigError, RiskThresholds,
};

/// Standard Chinese equity-option contract multiplier. The allocator uses
/// this fixed value for every contract; mixing commodity options would need
/// a per-contract multiplier.
pub const CONTRACT_MULTIPLIER: f64 = 10_000.0;

/// Splits Greek budgets, accumulates usage, enforces limits.
#[derive(Debug, Clone)]
pub struct RiskBudgetAllocator {
    config: RiskBudgetConfig,
}

impl RiskBudgetAllocator {
    /// Build an allocator, validating the allocation ratios when they are
    /// non-empty: every ratio must be non-negative and the total must be
    /// 1.0 within 0.01.
    pub fn new(config: RiskBudgetConfig) -> Result<Self, RiskConfigError> {
        if !config.allocation_ratios.is_empty() {
            for (key, &ratio) in &config.allocation_ratios {
                if ratio < 0.0 {
                    return Err(RiskConfigError::NegativeRatio {
                        key: key.clone(),
                        ratio,
                    });
                }
            }
            let total: f64 = config.allocation_ratios.values().sum();
            if (total - 1.0).abs() > 0.01 {
                return Err(RiskConfigError::RatioSumMismatch { total });
            }
        }
        Ok(Self { config })
    }

    /// Configured split dimension.
    #[must_use]
    pub fn dimension(&self) -> AllocationDimension {
        self.config.allocation_dimension
    }

    /// Slice the portfolio limits by the configured ratios. Each key gets
    /// `total_limits x ratio` component-wise; empty ratios yield an empty
    /// map.
    #[must_use]
    pub fn allocate_budget_by_underlying(
        &self,
        total_limits: &RiskThresholds,
    ) -> FxHashMap<String, GreeksBudget> {
        self.config
            .allocation_ratios
            .iter()
            .map(|(key, &ratio)| {
                (
                    key.clone(),
                    GreeksBudget {
                        delta_budget: total_limits.portfolio_delta_limit * ratio,
                        gamma_budget: total_limits.portfolio_gamma_limit * ratio,
                        vega_budget: total_limits.portfolio_vega_limit * ratio,
                    },
                )
            })
            .collect()
    }

    /// Accumulate Greek usage per allocation key.
    ///
    /// Only active positions with positive volume contribute; positions
    /// whose Greeks are missing or failed are skipped. Usage is the
    /// absolute value of `greek x volume x multiplier`.
    #[must_use]
    pub fn calculate_usage(
        &self,
        positions: &[Position],
        greeks_map: &FxHashMap<String, GreeksResult>,
        dimension: AllocationDimension,
    ) -> FxHashMap<String, GreeksUsage> {
        let mut usage_map: FxHashMap<String, GreeksUsage> = FxHashMap::default();

        for position in positions {
            if !position.is_active || position.volume == 0 {
                continue;
            }

            let greeks = match greeks_map.get(&position.vt_symbol) {
                Some(g) if g.success => g,
                _ => continue,
            };

            let key = match dimension {
                AllocationDimension::Underlying => position.underlying_vt_symbol.clone(),
                AllocationDimension::Strategy => position.signal.clone(),
            };

            let scale = f64::from(position.volume) * CONTRACT_MULTIPLIER;
            let usage = usage_map.entry(key).or_default();
            usage.delta_used += (greeks.delta * scale).abs();
            usage.gamma_used += (greeks.gamma * scale).abs();
            usage.vega_used += (greeks.vega * scale).abs();
            usage.position_count += 1;
        }

        usage_map
    }

    /// Check usage against a budget. Boundary equality passes; the failing
    /// dimensions come back in fixed order delta, gamma, vega.
    #[must_use]
    pub fn check_budget_limit(
        &self,
        usage: &GreeksUsage,
        budget: &GreeksBudget,
    ) -> BudgetCheckResult {
        let mut exceeded_dimensions: Vec<String> = Vec::new();

        if usage.delta_used > budget.delta_budget {
            exceeded_dimensions.push("delta".to_string());
        }
        if usage.gamma_used > budget.gamma_budget {
            exceeded_dimensions.push("gamma".to_string());
        }
        if usage.vega_used > budget.vega_budget {
            exceeded_dimensions.push("vega".to_string());
        }

        let passed = exceeded_dimensions.is_empty();
        let message = if passed {
            "预算检查通过".to_string()
        } else {
            format!("预算超限: {}", exceeded_dimensions.join(", "))
        };

        BudgetCheckResult {
            passed,
            exceeded_dimensions,
            usage: *usage,
            budget: *budget,
            message,
        }
    }

    /// Budget headroom, floored at zero per dimension.
    #[must_use]
    pub fn remaining_budget(&self, usage: &GreeksUsage, budget: &GreeksBudget) -> GreeksBudget {
        GreeksBudget {
            delta_budget: (budget.delta_budget - usage.delta_used).max(0.0),
            gamma_budget: (budget.gamma_budget - usage.gamma_used).max(0.0),
            vega_budget: (budget.vega_budget - usage.vega_used).max(0.0),
        }
    }
}
