//! Implied volatility solver tests

use approx::assert_abs_diff_eq;
use options_engine::greeks::bs_price;
use options_engine::{IVQuote, IvSolver, OptionKind, SolveMethod};
use proptest::prelude::*;
use rstest::*;

const MAX_ITER: u32 = 100;
const PRICE_TOL: f64 = 1e-6;

#[fixture]
fn solver() -> IvSolver {
    IvSolver::new()
}

#[rstest]
#[case(SolveMethod::Newton)]
#[case(SolveMethod::Bisection)]
#[case(SolveMethod::Brent)]
fn recovers_reference_volatility(solver: IvSolver, #[case] method: SolveMethod) {
    // E1: the 6.8887 ATM call price inverts back to 20% vol.
    let market_price = bs_price(100.0, 100.0, 0.5, 0.05, 0.2, OptionKind::Call);
    let result = solver.solve(
        market_price,
        100.0,
        100.0,
        0.5,
        0.05,
        OptionKind::Call,
        method,
        MAX_ITER,
        PRICE_TOL,
    );
    assert!(result.success, "{}", result.error_message);
    assert!(result.iterations >= 1);
    assert_abs_diff_eq!(result.implied_volatility, 0.2, epsilon = 0.01);
}

#[rstest]
fn rejects_non_positive_market_price(solver: IvSolver) {
    let result = solver.solve(
        0.0,
        100.0,
        100.0,
        0.5,
        0.05,
        OptionKind::Call,
        SolveMethod::Newton,
        MAX_ITER,
        0.01,
    );
    assert!(!result.success);
    assert!(result.error_message.contains("市场价格"));
}

#[rstest]
fn rejects_price_below_intrinsic(solver: IvSolver) {
    // Deep ITM call: discounted intrinsic is ~22.47, market offered at 15.
    let result = solver.solve(
        15.0,
        120.0,
        100.0,
        0.5,
        0.05,
        OptionKind::Call,
        SolveMethod::Newton,
        MAX_ITER,
        0.01,
    );
    assert!(!result.success);
    assert!(result.error_message.contains("内在价值"));
}

#[rstest]
#[case(SolveMethod::Bisection)]
#[case(SolveMethod::Brent)]
fn exhausted_iterations_report_non_convergence(solver: IvSolver, #[case] method: SolveMethod) {
    let market_price = bs_price(100.0, 100.0, 0.5, 0.05, 0.2, OptionKind::Call);
    let result = solver.solve(
        market_price,
        100.0,
        100.0,
        0.5,
        0.05,
        OptionKind::Call,
        method,
        1,
        1e-14,
    );
    assert!(!result.success);
    assert!(result.error_message.contains("未收敛"));
    assert_eq!(result.iterations, 1);
}

#[rstest]
fn batch_preserves_order_and_isolates_failures(solver: IvSolver) {
    let valid = IVQuote {
        market_price: bs_price(100.0, 100.0, 0.5, 0.05, 0.3, OptionKind::Call),
        spot_price: 100.0,
        strike_price: 100.0,
        time_to_expiry: 0.5,
        risk_free_rate: 0.05,
        option_type: OptionKind::Call,
    };
    let invalid = IVQuote {
        market_price: -1.0,
        ..valid
    };

    let mixed = solver.solve_batch(
        &[valid, invalid, valid],
        SolveMethod::Newton,
        MAX_ITER,
        PRICE_TOL,
    );
    assert_eq!(mixed.len(), 3);
    assert!(mixed[0].success);
    assert!(!mixed[1].success);
    assert!(mixed[2].success);

    // The valid quote's answer is unchanged by its failing neighbour.
    let alone = solver.solve_batch(&[valid], SolveMethod::Newton, MAX_ITER, PRICE_TOL);
    assert_eq!(mixed[0], alone[0]);
    assert_eq!(mixed[2], alone[0]);
}

proptest! {
    /// Round trip: IV(BS(sigma)) recovers sigma under all three methods.
    #[test]
    fn round_trip_recovers_sigma(
        spot in 50.0..150.0f64,
        moneyness in 0.9..1.1f64,
        time in 0.25..2.0f64,
        rate in 0.0..0.1f64,
        sigma in 0.15..1.5f64,
        is_call in any::<bool>(),
    ) {
        let kind = if is_call { OptionKind::Call } else { OptionKind::Put };
        let strike = spot * moneyness;
        let market_price = bs_price(spot, strike, time, rate, sigma, kind);
        prop_assume!(market_price > 1e-4);

        let solver = IvSolver::new();
        for method in [SolveMethod::Newton, SolveMethod::Bisection, SolveMethod::Brent] {
            let result = solver.solve(
                market_price, spot, strike, time, rate, kind, method, MAX_ITER, PRICE_TOL,
            );
            prop_assert!(result.success, "method {:?}: {}", method, result.error_message);
            prop_assert!(
                (result.implied_volatility - sigma).abs() <= 0.01,
                "method {:?}: recovered {} for true {}",
                method,
                result.implied_volatility,
                sigma
            );
        }
    }
}
