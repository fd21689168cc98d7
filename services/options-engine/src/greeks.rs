//! Black-Scholes pricing and Greeks

use crate::iv::{IvSolver, SolveMethod};
use crate::value_objects::{
    intrinsic_value, GreeksInput, GreeksResult, IVResult, OptionKind,
};

const SQRT_2PI: f64 = 2.5066282746310007;

/// Standard normal cumulative distribution function.
#[must_use]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x / std::f64::consts::SQRT_2))
}

/// Standard normal probability density function.
#[must_use]
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / SQRT_2PI
}

/// d1 parameter of the Black-Scholes formula.
#[must_use]
pub fn d1(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> f64 {
    ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt())
}

/// Black-Scholes Greeks calculator.
///
/// Implied volatility inversion is delegated to [`IvSolver`].
#[derive(Debug, Default)]
pub struct GreeksCalculator {
    iv_solver: IvSolver,
}

impl GreeksCalculator {
    /// Calculator with the default IV solver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Black-Scholes theoretical price. At `T = 0` this is the intrinsic
    /// value.
    #[must_use]
    pub fn bs_price(&self, params: &GreeksInput) -> f64 {
        bs_price(
            params.spot_price,
            params.strike_price,
            params.time_to_expiry,
            params.risk_free_rate,
            params.volatility,
            params.option_type,
        )
    }

    /// Delta, gamma, theta and vega under Black-Scholes.
    ///
    /// Invalid inputs fail in-band with the offending field named in the
    /// message; at expiry delta collapses to its ITM indicator and the
    /// remaining Greeks are zero.
    #[must_use]
    pub fn calculate_greeks(&self, params: &GreeksInput) -> GreeksResult {
        let s = params.spot_price;
        let k = params.strike_price;
        let t = params.time_to_expiry;
        let r = params.risk_free_rate;
        let sigma = params.volatility;

        if s <= 0.0 || k <= 0.0 {
            return GreeksResult::failure("spot_price 和 strike_price 必须大于 0");
        }
        if t < 0.0 {
            return GreeksResult::failure("time_to_expiry 不能为负数");
        }
        if sigma <= 0.0 {
            return GreeksResult::failure("volatility 必须大于 0");
        }

        if t == 0.0 {
            let delta = match params.option_type {
                OptionKind::Call => {
                    if s > k {
                        1.0
                    } else {
                        0.0
                    }
                }
                OptionKind::Put => {
                    if s < k {
                        -1.0
                    } else {
                        0.0
                    }
                }
            };
            return GreeksResult {
                delta,
                ..GreeksResult::default()
            };
        }

        let sqrt_t = t.sqrt();
        let d1 = d1(s, k, t, r, sigma);
        let d2 = d1 - sigma * sqrt_t;

        let pdf_d1 = norm_pdf(d1);
        let cdf_d1 = norm_cdf(d1);
        let cdf_d2 = norm_cdf(d2);

        // Gamma and vega are identical for calls and puts.
        let gamma = pdf_d1 / (s * sigma * sqrt_t);
        // Divided by 100: units are price change per 1% volatility move.
        let vega = s * pdf_d1 * sqrt_t / 100.0;

        let (delta, theta) = match params.option_type {
            OptionKind::Call => {
                let theta = (-s * pdf_d1 * sigma / (2.0 * sqrt_t)
                    - r * k * (-r * t).exp() * cdf_d2)
                    / 365.0;
                (cdf_d1, theta)
            }
            OptionKind::Put => {
                let theta = (-s * pdf_d1 * sigma / (2.0 * sqrt_t)
                    + r * k * (-r * t).exp() * norm_cdf(-d2))
                    / 365.0;
                (cdf_d1 - 1.0, theta)
            }
        };

        if !(delta.is_finite() && gamma.is_finite() && theta.is_finite() && vega.is_finite()) {
            return GreeksResult::failure(format!(
                "计算溢出: delta={delta}, gamma={gamma}, theta={theta}, vega={vega}"
            ));
        }

        GreeksResult {
            delta,
            gamma,
            theta,
            vega,
            success: true,
            error_message: String::new(),
        }
    }

    /// Solve implied volatility from a market price. Delegates to the
    /// solver with its default Newton-then-bisection policy.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn calculate_implied_volatility(
        &self,
        market_price: f64,
        spot_price: f64,
        strike_price: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        option_type: OptionKind,
        max_iterations: u32,
        tolerance: f64,
    ) -> IVResult {
        self.iv_solver.solve(
            market_price,
            spot_price,
            strike_price,
            time_to_expiry,
            risk_free_rate,
            option_type,
            SolveMethod::Newton,
            max_iterations,
            tolerance,
        )
    }
}

/// Black-Scholes theoretical price, free-function form shared by the
/// pricers and the IV solver so delegation stays bit-exact.
#[must_use]
pub fn bs_price(s: f64, k: f64, t: f64, r: f64, sigma: f64, kind: OptionKind) -> f64 {
    if t == 0.0 {
        return intrinsic_value(s, k, kind);
    }
    let sqrt_t = t.sqrt();
    let d1 = d1(s, k, t, r, sigma);
    let d2 = d1 - sigma * sqrt_t;

    match kind {
        OptionKind::Call => s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2),
        OptionKind::Put => k * (-r * t).exp() * norm_cdf(-d2) - s * norm_cdf(-d1),
    }
}

/// Raw Black-Scholes vega, dPrice/dSigma without the 1% scaling.
#[must_use]
pub fn bs_vega_raw(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    s * norm_pdf(d1(s, k, t, r, sigma)) * t.sqrt()
}
