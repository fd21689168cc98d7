//! Implied volatility solver
//!
//! Inverts Black-Scholes from a market price. Three algorithms: Newton with
//! a maintained bisection bracket, pure bisection, and Brent. The default
//! entry point uses Newton and falls back to bisection when it does not
//! converge; an explicitly requested method is honoured without fallback
//! (except Brent's same-sign-endpoint case, which degrades to bisection
//! rather than propagating NaN).

use serde::{Deserialize, Serialize};

use crate::greeks::{bs_price, bs_vega_raw};
use crate::value_objects::{IVQuote, IVResult, OptionKind};

const SIGMA_LOW: f64 = 0.001;
const SIGMA_HIGH: f64 = 10.0;
const INITIAL_GUESS: f64 = 0.5;

/// Root-finding algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveMethod {
    /// Newton-Raphson with bisection safeguard
    Newton,
    /// Pure interval bisection
    Bisection,
    /// Brent's method (inverse quadratic / secant / bisection)
    Brent,
}

/// Implied volatility solver over the domain `[0.001, 10.0]`.
#[derive(Debug, Default)]
pub struct IvSolver;

impl IvSolver {
    /// New solver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Solve a single quote.
    ///
    /// Validation: the market price must be positive and not materially
    /// below the discounted intrinsic value. With `method = Newton` a
    /// non-converged Newton run is retried with bisection under the same
    /// iteration budget.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn solve(
        &self,
        market_price: f64,
        spot_price: f64,
        strike_price: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        option_type: OptionKind,
        method: SolveMethod,
        max_iterations: u32,
        tolerance: f64,
    ) -> IVResult {
        if market_price <= 0.0 {
            return IVResult::failure("市场价格必须大于 0");
        }

        let discount = (-risk_free_rate * time_to_expiry).exp();
        let intrinsic = match option_type {
            OptionKind::Call => (spot_price - strike_price * discount).max(0.0),
            OptionKind::Put => (strike_price * discount - spot_price).max(0.0),
        };
        if market_price < intrinsic - tolerance {
            return IVResult::failure("市场价格低于期权内在价值");
        }

        let quote = Quote {
            market_price,
            spot_price,
            strike_price,
            time_to_expiry,
            risk_free_rate,
            option_type,
        };

        match method {
            SolveMethod::Newton => {
                let result = self.solve_newton(&quote, max_iterations, tolerance);
                if result.success {
                    result
                } else {
                    self.solve_bisection(&quote, max_iterations, tolerance)
                }
            }
            SolveMethod::Bisection => self.solve_bisection(&quote, max_iterations, tolerance),
            SolveMethod::Brent => self.solve_brent(&quote, max_iterations, tolerance),
        }
    }

    /// Solve a batch of quotes independently.
    ///
    /// The output has the same length and order as the input; one quote
    /// failing never contaminates its neighbours.
    #[must_use]
    pub fn solve_batch(
        &self,
        quotes: &[IVQuote],
        method: SolveMethod,
        max_iterations: u32,
        tolerance: f64,
    ) -> Vec<IVResult> {
        quotes
            .iter()
            .map(|quote| {
                self.solve(
                    quote.market_price,
                    quote.spot_price,
                    quote.strike_price,
                    quote.time_to_expiry,
                    quote.risk_free_rate,
                    quote.option_type,
                    method,
                    max_iterations,
                    tolerance,
                )
            })
            .collect()
    }

    /// Newton iteration with a maintained bracket: endpoints are tightened
    /// from the residual sign each step, and any Newton step leaving the
    /// open bracket (or a vanishing vega) is replaced by the midpoint.
    fn solve_newton(&self, quote: &Quote, max_iterations: u32, tolerance: f64) -> IVResult {
        let mut sigma = INITIAL_GUESS;
        let mut sigma_low = SIGMA_LOW;
        let mut sigma_high = SIGMA_HIGH;

        for i in 0..max_iterations {
            let price = quote.price_at(sigma);
            let diff = price - quote.market_price;

            if diff.abs() < tolerance {
                return IVResult::converged(sigma, i + 1);
            }

            if diff > 0.0 {
                sigma_high = sigma;
            } else {
                sigma_low = sigma;
            }

            let vega_raw = bs_vega_raw(
                quote.spot_price,
                quote.strike_price,
                quote.time_to_expiry,
                quote.risk_free_rate,
                sigma,
            );
            if vega_raw.abs() > 1e-10 {
                let new_sigma = sigma - diff / vega_raw;
                if sigma_low < new_sigma && new_sigma < sigma_high {
                    sigma = new_sigma;
                } else {
                    sigma = (sigma_low + sigma_high) / 2.0;
                }
            } else {
                sigma = (sigma_low + sigma_high) / 2.0;
            }
        }

        not_converged(max_iterations)
    }

    fn solve_bisection(&self, quote: &Quote, max_iterations: u32, tolerance: f64) -> IVResult {
        let mut sigma_low = SIGMA_LOW;
        let mut sigma_high = SIGMA_HIGH;

        for i in 0..max_iterations {
            let sigma_mid = (sigma_low + sigma_high) / 2.0;
            let diff = quote.price_at(sigma_mid) - quote.market_price;

            if diff.abs() < tolerance {
                return IVResult::converged(sigma_mid, i + 1);
            }

            if diff > 0.0 {
                sigma_high = sigma_mid;
            } else {
                sigma_low = sigma_mid;
            }
        }

        not_converged(max_iterations)
    }

    /// Brent's method with the standard `mflag` bookkeeping. Endpoints are
    /// swapped to keep `|f(a)| >= |f(b)|`; same-sign endpoints fall back to
    /// bisection.
    fn solve_brent(&self, quote: &Quote, max_iterations: u32, tolerance: f64) -> IVResult {
        let f = |sigma: f64| quote.price_at(sigma) - quote.market_price;

        let mut a = SIGMA_LOW;
        let mut b = SIGMA_HIGH;
        let mut fa = f(a);
        let mut fb = f(b);

        if fa * fb > 0.0 {
            // No sign change in the bracket: degrade to bisection.
            return self.solve_bisection(quote, max_iterations, tolerance);
        }

        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }

        let mut c = a;
        let mut fc = fa;
        let mut mflag = true;
        let mut d = 0.0;

        for i in 0..max_iterations {
            if fb.abs() < tolerance {
                return IVResult::converged(b, i + 1);
            }
            if (b - a).abs() < 1e-15 {
                return IVResult::converged(b, i + 1);
            }

            let mut s = if (fa - fc).abs() > 1e-15 && (fb - fc).abs() > 1e-15 {
                // Inverse quadratic interpolation.
                a * fb * fc / ((fa - fb) * (fa - fc))
                    + b * fa * fc / ((fb - fa) * (fb - fc))
                    + c * fa * fb / ((fc - fa) * (fc - fb))
            } else if (fa - fb).abs() < 1e-15 {
                b
            } else {
                // Secant step.
                b - fb * (b - a) / (fb - fa)
            };

            let mid = (a + b) / 2.0;
            let bound_lo = ((3.0 * a + b) / 4.0).min(b);
            let bound_hi = ((3.0 * a + b) / 4.0).max(b);

            let bisect = !(bound_lo..=bound_hi).contains(&s)
                || (mflag && (s - b).abs() >= (b - c).abs() / 2.0)
                || (!mflag && (s - b).abs() >= (c - d).abs() / 2.0)
                || (mflag && (b - c).abs() < 1e-15)
                || (!mflag && (c - d).abs() < 1e-15);

            if bisect {
                s = mid;
                mflag = true;
            } else {
                mflag = false;
            }

            let fs = f(s);
            d = c;
            c = b;
            fc = fb;

            if fa * fs < 0.0 {
                b = s;
                fb = fs;
            } else {
                a = s;
                fa = fs;
            }

            if fa.abs() < fb.abs() {
                std::mem::swap(&mut a, &mut b);
                std::mem::swap(&mut fa, &mut fb);
            }
        }

        not_converged(max_iterations)
    }
}

fn not_converged(max_iterations: u32) -> IVResult {
    IVResult {
        success: false,
        error_message: format!("在 {max_iterations} 次迭代内未收敛"),
        iterations: max_iterations,
        ..IVResult::default()
    }
}

struct Quote {
    market_price: f64,
    spot_price: f64,
    strike_price: f64,
    time_to_expiry: f64,
    risk_free_rate: f64,
    option_type: OptionKind,
}

impl Quote {
    fn price_at(&self, sigma: f64) -> f64 {
        bs_price(
            self.spot_price,
            self.strike_price,
            self.time_to_expiry,
            self.risk_free_rate,
            sigma,
            self.option_type,
        )
    }
}
