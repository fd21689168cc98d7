//! Barone-Adesi-Whaley approximation for American options
//!
//! American price = European Black-Scholes price + early-exercise premium.
//! The critical spot S* is solved by Newton iteration; the result is floored
//! at both the European price and the intrinsic value.

use crate::greeks::{bs_price, d1, norm_cdf};
use crate::value_objects::{
    intrinsic_value, validate_inputs, OptionKind, PricingInput, PricingResult,
};

const CRITICAL_MAX_ITER: u32 = 500;
const CRITICAL_TOL: f64 = 1e-8;

/// Barone-Adesi-Whaley (1987) American option pricer.
#[derive(Debug, Default)]
pub struct BawPricer;

impl BawPricer {
    /// New pricer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// BAW approximate American price.
    #[must_use]
    pub fn price(&self, params: &PricingInput) -> PricingResult {
        if let Some(message) = validate_inputs(
            params.spot_price,
            params.strike_price,
            params.volatility,
            params.time_to_expiry,
        ) {
            return PricingResult::failure(message, "baw");
        }

        if params.time_to_expiry == 0.0 {
            let intrinsic = intrinsic_value(
                params.spot_price,
                params.strike_price,
                params.option_type,
            );
            return PricingResult::priced(intrinsic, "baw");
        }

        let price = self.baw_price(
            params.spot_price,
            params.strike_price,
            params.time_to_expiry,
            params.risk_free_rate,
            params.volatility,
            params.option_type,
        );
        if !price.is_finite() {
            return PricingResult::failure(format!("计算溢出: price={price}"), "baw");
        }
        PricingResult::priced(price, "baw")
    }

    fn baw_price(&self, s: f64, k: f64, t: f64, r: f64, sigma: f64, kind: OptionKind) -> f64 {
        let sigma_sq = sigma * sigma;
        // Zero dividend yield: M = N = 2r / sigma^2.
        let m = 2.0 * r / sigma_sq;
        let n = 2.0 * r / sigma_sq;
        let k_factor = 1.0 - (-r * t).exp();

        // Rate essentially zero: no early-exercise value, American = European.
        if k_factor < 1e-15 {
            return bs_price(s, k, t, r, sigma, kind);
        }

        match kind {
            OptionKind::Call => self.baw_call(s, k, t, r, sigma, m, n, k_factor),
            OptionKind::Put => self.baw_put(s, k, t, r, sigma, m, n, k_factor),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn baw_call(
        &self,
        s: f64,
        k: f64,
        t: f64,
        r: f64,
        sigma: f64,
        m: f64,
        n: f64,
        k_factor: f64,
    ) -> f64 {
        let bs = bs_price(s, k, t, r, sigma, OptionKind::Call);

        let discriminant = (n - 1.0) * (n - 1.0) + 4.0 * m / k_factor;
        let q2 = (-(n - 1.0) + discriminant.sqrt()) / 2.0;

        let s_star = self.find_critical_price_call(k, t, r, sigma, q2);

        if s >= s_star {
            // Immediate exercise is optimal; never below the European price.
            (s - k).max(bs)
        } else {
            let a2 = (s_star / q2) * (1.0 - norm_cdf(d1(s_star, k, t, r, sigma)));
            let premium = a2 * (s / s_star).powf(q2);
            (bs + premium).max(bs)
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn baw_put(
        &self,
        s: f64,
        k: f64,
        t: f64,
        r: f64,
        sigma: f64,
        m: f64,
        n: f64,
        k_factor: f64,
    ) -> f64 {
        let bs = bs_price(s, k, t, r, sigma, OptionKind::Put);

        let discriminant = (n - 1.0) * (n - 1.0) + 4.0 * m / k_factor;
        let q1 = (-(n - 1.0) - discriminant.sqrt()) / 2.0;

        let s_star = self.find_critical_price_put(k, t, r, sigma, q1);

        if s <= s_star {
            (k - s).max(bs)
        } else {
            let a1 = -(s_star / q1) * (1.0 - norm_cdf(-d1(s_star, k, t, r, sigma)));
            let premium = a1 * (s / s_star).powf(q1);
            (bs + premium).max(bs)
        }
    }

    /// Newton solve of the call critical price. Starts at K, reflects a
    /// non-positive step back to S/2, and floors the result at K.
    fn find_critical_price_call(&self, k: f64, t: f64, r: f64, sigma: f64, q2: f64) -> f64 {
        let mut s_star = k;
        for _ in 0..CRITICAL_MAX_ITER {
            let bs = bs_price(s_star, k, t, r, sigma, OptionKind::Call);
            let nd1 = norm_cdf(d1(s_star, k, t, r, sigma));

            let lhs = bs + (s_star / q2) * (1.0 - nd1) - (s_star - k);

            let d_bs = nd1;
            let d_a = (1.0 / q2) * (1.0 - nd1);
            let d_lhs = d_bs + d_a - 1.0;

            if d_lhs.abs() < 1e-15 {
                break;
            }

            let s_new = s_star - lhs / d_lhs;
            if s_new <= 0.0 {
                s_star /= 2.0;
                continue;
            }

            if (s_new - s_star).abs() < CRITICAL_TOL {
                s_star = s_new;
                break;
            }
            s_star = s_new;
        }
        s_star.max(k)
    }

    /// Newton solve of the put critical price, floored at a small positive
    /// spot.
    fn find_critical_price_put(&self, k: f64, t: f64, r: f64, sigma: f64, q1: f64) -> f64 {
        let mut s_star = k;
        for _ in 0..CRITICAL_MAX_ITER {
            let bs = bs_price(s_star, k, t, r, sigma, OptionKind::Put);
            let d1_val = d1(s_star, k, t, r, sigma);
            let nd1_neg = norm_cdf(-d1_val);

            let lhs = bs - (s_star / q1) * (1.0 - nd1_neg) - (k - s_star);

            let d_bs = norm_cdf(d1_val) - 1.0;
            let d_a = -(1.0 / q1) * (1.0 - nd1_neg);
            let d_lhs = d_bs + d_a + 1.0;

            if d_lhs.abs() < 1e-15 {
                break;
            }

            let s_new = s_star - lhs / d_lhs;
            if s_new <= 0.0 {
                s_star /= 2.0;
                continue;
            }

            if (s_new - s_star).abs() < CRITICAL_TOL {
                s_star = s_new;
                break;
            }
            s_star = s_new;
        }
        s_star.max(1e-10)
    }
}
