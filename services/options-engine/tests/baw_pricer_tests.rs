//! Barone-Adesi-Whaley pricer tests

use approx::assert_abs_diff_eq;
use options_engine::greeks::bs_price;
use options_engine::{
    BawPricer, ExerciseStyle, OptionKind, PricingInput,
};
use proptest::prelude::*;
use rstest::*;

fn american_input(
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    vol: f64,
    kind: OptionKind,
) -> PricingInput {
    PricingInput {
        spot_price: spot,
        strike_price: strike,
        time_to_expiry: time,
        risk_free_rate: rate,
        volatility: vol,
        option_type: kind,
        exercise_style: ExerciseStyle::American,
    }
}

#[rstest]
fn deep_itm_put_exercised_immediately() {
    // S=80, K=100: intrinsic 20 dominates the European value of ~18.14.
    let pricer = BawPricer::new();
    let result = pricer.price(&american_input(80.0, 100.0, 0.5, 0.05, 0.2, OptionKind::Put));
    assert!(result.success);
    assert_eq!(result.model_used, "baw");

    let european = bs_price(80.0, 100.0, 0.5, 0.05, 0.2, OptionKind::Put);
    assert_abs_diff_eq!(european, 18.0, epsilon = 0.2);
    assert!(result.price >= 20.0 - 1e-10);
    assert!(result.price >= european - 1e-10);
}

#[rstest]
fn zero_rate_collapses_to_european() {
    let pricer = BawPricer::new();
    let input = american_input(100.0, 100.0, 0.5, 0.0, 0.2, OptionKind::Call);
    let result = pricer.price(&input);
    assert!(result.success);

    let european = bs_price(100.0, 100.0, 0.5, 0.0, 0.2, OptionKind::Call);
    assert_abs_diff_eq!(result.price, european, epsilon = 1e-12);
}

#[rstest]
fn expiry_returns_intrinsic() {
    let pricer = BawPricer::new();
    let result = pricer.price(&american_input(95.0, 100.0, 0.0, 0.05, 0.2, OptionKind::Put));
    assert!(result.success);
    assert_abs_diff_eq!(result.price, 5.0, epsilon = 1e-12);
}

#[rstest]
#[case(0.0, 100.0)]
#[case(100.0, -5.0)]
fn invalid_inputs_fail(#[case] spot: f64, #[case] strike: f64) {
    let pricer = BawPricer::new();
    let result = pricer.price(&american_input(spot, strike, 0.5, 0.05, 0.2, OptionKind::Call));
    assert!(!result.success);
    assert!(!result.error_message.is_empty());
    assert_eq!(result.model_used, "baw");
}

proptest! {
    /// American price dominates the European price and the intrinsic value.
    #[test]
    fn american_dominates_european(
        spot in 20.0..300.0f64,
        strike in 20.0..300.0f64,
        time in 0.02..2.0f64,
        rate in 0.0..0.12f64,
        vol in 0.08..1.0f64,
        is_call in any::<bool>(),
    ) {
        let kind = if is_call { OptionKind::Call } else { OptionKind::Put };
        let pricer = BawPricer::new();
        let result = pricer.price(&american_input(spot, strike, time, rate, vol, kind));
        prop_assert!(result.success);

        let european = bs_price(spot, strike, time, rate, vol, kind);
        prop_assert!(result.price >= european - 1e-10);

        let intrinsic = match kind {
            OptionKind::Call => (spot - strike).max(0.0),
            OptionKind::Put => (strike - spot).max(0.0),
        };
        prop_assert!(result.price >= intrinsic - 1e-6);
    }
}
