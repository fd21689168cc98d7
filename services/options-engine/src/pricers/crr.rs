//! Cox-Ross-Rubinstein binomial tree pricer
//!
//! Handles both exercise styles: European rollback discounts only, American
//! rollback takes the max against early exercise at every internal node.

use crate::value_objects::{
    intrinsic_value, validate_inputs, ExerciseStyle, OptionKind, PricingInput, PricingResult,
};

/// CRR binomial tree pricer with a configurable step count.
#[derive(Debug)]
pub struct CrrPricer {
    steps: usize,
}

impl Default for CrrPricer {
    fn default() -> Self {
        Self::new(100)
    }
}

impl CrrPricer {
    /// Pricer with the given number of tree steps (at least 1).
    #[must_use]
    pub fn new(steps: usize) -> Self {
        Self {
            steps: steps.max(1),
        }
    }

    /// Tree step count.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Binomial tree price.
    #[must_use]
    pub fn price(&self, params: &PricingInput) -> PricingResult {
        if let Some(message) = validate_inputs(
            params.spot_price,
            params.strike_price,
            params.volatility,
            params.time_to_expiry,
        ) {
            return PricingResult::failure(message, "crr");
        }

        if params.time_to_expiry == 0.0 {
            let intrinsic = intrinsic_value(
                params.spot_price,
                params.strike_price,
                params.option_type,
            );
            return PricingResult::priced(intrinsic, "crr");
        }

        match self.crr_price(params) {
            Ok(price) if price.is_finite() => PricingResult::priced(price, "crr"),
            Ok(price) => PricingResult::failure(format!("计算溢出: price={price}"), "crr"),
            Err(message) => PricingResult::failure(message, "crr"),
        }
    }

    fn crr_price(&self, params: &PricingInput) -> Result<f64, String> {
        let s = params.spot_price;
        let k = params.strike_price;
        let t = params.time_to_expiry;
        let r = params.risk_free_rate;
        let sigma = params.volatility;
        let n = self.steps;

        let dt = t / n as f64;
        let u = (sigma * dt.sqrt()).exp();
        let d = 1.0 / u;
        let disc = (-r * dt).exp();
        let p = ((r * dt).exp() - d) / (u - d);
        let q = 1.0 - p;

        if !(0.0..=1.0).contains(&p) {
            return Err(format!(
                "CRR 参数无效: 概率 p={p:.6} 超出 [0,1] 范围 (r={r}, sigma={sigma}, dt={dt:.6})"
            ));
        }

        let is_call = params.option_type == OptionKind::Call;
        let is_american = params.exercise_style == ExerciseStyle::American;

        // Terminal payoffs: spot at node j is S * u^j * d^(n-j).
        let mut values: Vec<f64> = (0..=n)
            .map(|j| {
                let spot_at_node = s * u.powi(j as i32) * d.powi((n - j) as i32);
                if is_call {
                    (spot_at_node - k).max(0.0)
                } else {
                    (k - spot_at_node).max(0.0)
                }
            })
            .collect();

        // Roll back to the root.
        for i in (0..n).rev() {
            for j in 0..=i {
                values[j] = disc * (p * values[j + 1] + q * values[j]);

                if is_american {
                    let spot_at_node = s * u.powi(j as i32) * d.powi((i - j) as i32);
                    let exercise = if is_call {
                        (spot_at_node - k).max(0.0)
                    } else {
                        (k - spot_at_node).max(0.0)
                    };
                    values[j] = values[j].max(exercise);
                }
            }
        }

        Ok(values[0])
    }
}
