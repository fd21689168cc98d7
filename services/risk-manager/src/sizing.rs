//! Position sizing
//!
//! Intersects the margin, margin-usage and Greek-budget headroom into one
//! final volume. A zero final volume means the open is rejected.

use options_engine::GreeksResult;

use crate::config::PositionSizingConfig;
use crate::value_objects::{GreeksBudget, GreeksUsage};
use crate::CONTRACT_MULTIPLIER;

/// Combined sizing outcome across all dimensions.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SizingResult {
    /// Final volume in lots, zero when rejected
    pub final_volume: u32,
    /// Volume permitted by the margin dimension
    pub margin_volume: u32,
    /// Volume permitted by the margin-usage dimension
    pub usage_volume: u32,
    /// Volume permitted by the Greek-budget dimension
    pub greeks_volume: u32,
    /// Remaining delta headroom
    pub delta_budget: f64,
    /// Remaining gamma headroom
    pub gamma_budget: f64,
    /// Remaining vega headroom
    pub vega_budget: f64,
    /// Whether the open passes
    pub passed: bool,
    /// Rejection reason, empty when passed
    pub reject_reason: String,
}

/// Position sizer over the configured limits.
#[derive(Debug, Clone)]
pub struct PositionSizer {
    config: PositionSizingConfig,
}

impl PositionSizer {
    /// Sizer from configuration.
    #[must_use]
    pub fn new(config: PositionSizingConfig) -> Self {
        Self { config }
    }

    /// Size a prospective open.
    ///
    /// `available_capital` is free capital; `used_margin` is margin already
    /// committed; `remaining` is the Greek headroom of the target
    /// allocation key; `greeks` are the per-contract Greeks of the
    /// candidate.
    #[must_use]
    pub fn size_open(
        &self,
        price: f64,
        available_capital: f64,
        used_margin: f64,
        remaining: &GreeksBudget,
        greeks: &GreeksResult,
    ) -> SizingResult {
        if price <= 0.0 {
            return self.rejected("price 必须大于 0", remaining);
        }
        if !greeks.success {
            return self.rejected("Greeks 计算失败，无法估算额度", remaining);
        }

        let margin_ratio = self.config.margin_ratio.max(self.config.min_margin_ratio);
        let margin_per_lot = price * CONTRACT_MULTIPLIER * margin_ratio;

        let margin_volume = if margin_per_lot > 0.0 {
            (available_capital / margin_per_lot).floor().max(0.0) as u32
        } else {
            0
        };

        // Usage dimension: how much more margin may be committed before the
        // usage limit is hit.
        let total_capital = available_capital + used_margin;
        let usage_headroom =
            (total_capital * self.config.margin_usage_limit - used_margin).max(0.0);
        let usage_volume = if margin_per_lot > 0.0 {
            (usage_headroom / margin_per_lot).floor().max(0.0) as u32
        } else {
            0
        };

        let greeks_volume = self.greeks_volume(remaining, greeks);

        let final_volume = margin_volume
            .min(usage_volume)
            .min(greeks_volume)
            .min(self.config.max_volume_per_order);

        let (passed, reject_reason) = if final_volume == 0 {
            let reason = if margin_volume == 0 {
                "保证金不足"
            } else if usage_volume == 0 {
                "保证金使用率超限"
            } else if greeks_volume == 0 {
                "Greeks 预算不足"
            } else {
                "单笔手数限制为 0"
            };
            (false, reason.to_string())
        } else {
            (true, String::new())
        };

        SizingResult {
            final_volume,
            margin_volume,
            usage_volume,
            greeks_volume,
            delta_budget: remaining.delta_budget,
            gamma_budget: remaining.gamma_budget,
            vega_budget: remaining.vega_budget,
            passed,
            reject_reason,
        }
    }

    /// Volume allowed by the tightest Greek dimension.
    fn greeks_volume(&self, remaining: &GreeksBudget, greeks: &GreeksResult) -> u32 {
        let mut allowed = f64::from(self.config.max_volume_per_order);

        for (budget, greek) in [
            (remaining.delta_budget, greeks.delta),
            (remaining.gamma_budget, greeks.gamma),
            (remaining.vega_budget, greeks.vega),
        ] {
            let per_lot = (greek * CONTRACT_MULTIPLIER).abs();
            if per_lot > 0.0 {
                allowed = allowed.min((budget / per_lot).floor());
            }
        }

        allowed.max(0.0) as u32
    }

    fn rejected(&self, reason: &str, remaining: &GreeksBudget) -> SizingResult {
        SizingResult {
            final_volume: 0,
            margin_volume: 0,
            usage_volume: 0,
            greeks_volume: 0,
            delta_budget: remaining.delta_budget,
            gamma_budget: remaining.gamma_budget,
            vega_budget: remaining.vega_budget,
            passed: false,
            reject_reason: reason.to_string(),
        }
    }
}

/// Convenience: usage left after subtracting a check result, used by
/// callers that size several opens inside one tick.
#[must_use]
pub fn usage_after(usage: &GreeksUsage, greeks: &GreeksResult, volume: u32) -> GreeksUsage {
    let scale = f64::from(volume) * CONTRACT_MULTIPLIER;
    GreeksUsage {
        delta_used: usage.delta_used + (greeks.delta * scale).abs(),
        gamma_used: usage.gamma_used + (greeks.gamma * scale).abs(),
        vega_used: usage.vega_used + (greeks.vega * scale).abs(),
        position_count: usage.position_count + 1,
    }
}
