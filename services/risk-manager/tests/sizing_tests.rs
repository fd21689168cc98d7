//! Position sizer tests

use options_engine::GreeksResult;
use risk_manager::{GreeksBudget, PositionSizer, PositionSizingConfig};
use rstest::*;

fn greeks(delta: f64, gamma: f64, vega: f64) -> GreeksResult {
    GreeksResult {
        delta,
        gamma,
        vega,
        ..GreeksResult::default()
    }
}

fn wide_budget() -> GreeksBudget {
    GreeksBudget {
        delta_budget: 1e9,
        gamma_budget: 1e9,
        vega_budget: 1e9,
    }
}

#[rstest]
fn margin_dimension_caps_volume() {
    // Margin per lot: 100 * 10_000 * 0.15 = 150_000; 400_000 capital -> 2 lots.
    let sizer = PositionSizer::new(PositionSizingConfig::default());
    let result = sizer.size_open(100.0, 400_000.0, 0.0, &wide_budget(), &greeks(0.5, 0.0, 0.0));
    assert!(result.passed);
    assert_eq!(result.margin_volume, 2);
    assert_eq!(result.final_volume, 2);
}

#[rstest]
fn greeks_dimension_caps_volume() {
    // Delta budget 12_000 with 0.5 delta per lot (x 10_000) -> 2 lots.
    let sizer = PositionSizer::new(PositionSizingConfig::default());
    let budget = GreeksBudget {
        delta_budget: 12_000.0,
        gamma_budget: 1e9,
        vega_budget: 1e9,
    };
    let result = sizer.size_open(10.0, 1e9, 0.0, &budget, &greeks(0.5, 0.0, 0.0));
    assert_eq!(result.greeks_volume, 2);
    assert_eq!(result.final_volume, 2);
}

#[rstest]
fn per_order_cap_applies_last() {
    let config = PositionSizingConfig {
        max_volume_per_order: 3,
        ..PositionSizingConfig::default()
    };
    let sizer = PositionSizer::new(config);
    let result = sizer.size_open(10.0, 1e9, 0.0, &wide_budget(), &greeks(0.01, 0.0, 0.0));
    assert_eq!(result.final_volume, 3);
}

#[rstest]
fn exhausted_margin_rejects() {
    let sizer = PositionSizer::new(PositionSizingConfig::default());
    let result = sizer.size_open(100.0, 1_000.0, 0.0, &wide_budget(), &greeks(0.5, 0.0, 0.0));
    assert!(!result.passed);
    assert_eq!(result.final_volume, 0);
    assert!(result.reject_reason.contains("保证金"));
}

#[rstest]
fn failed_greeks_reject() {
    let sizer = PositionSizer::new(PositionSizingConfig::default());
    let result = sizer.size_open(
        100.0,
        1e9,
        0.0,
        &wide_budget(),
        &GreeksResult::failure("volatility 必须大于 0"),
    );
    assert!(!result.passed);
    assert_eq!(result.final_volume, 0);
}

#[rstest]
fn usage_limit_caps_additional_margin() {
    // All capital already committed as margin: usage headroom is exhausted.
    let sizer = PositionSizer::new(PositionSizingConfig::default());
    let result = sizer.size_open(
        100.0,
        200_000.0,
        800_000.0,
        &wide_budget(),
        &greeks(0.5, 0.0, 0.0),
    );
    assert!(!result.passed);
    assert_eq!(result.usage_volume, 0);
    assert!(result.reject_reason.contains("使用率"));
}
