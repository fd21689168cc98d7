//! Score components
//!
//! Each sub-score lives in (0, 1] and is monotone in its dimension; the
//! total is the exact weighted sum of the three components with no
//! renormalization.

use serde::{Deserialize, Serialize};

use crate::config::OptionSelectorConfig;

/// Per-candidate score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionScore {
    /// Scored contract
    pub vt_symbol: String,
    /// Liquidity dimension score
    pub liquidity_score: f64,
    /// Moneyness dimension score
    pub otm_score: f64,
    /// Time-to-expiry dimension score
    pub expiry_score: f64,
    /// `liquidity*w_l + otm*w_o + expiry*w_e`
    pub total_score: f64,
}

/// Liquidity score: strictly decreasing in the bid-ask spread, strictly
/// increasing in the bid volume, combined by the configured internal
/// weights.
#[must_use]
pub fn liquidity_score(config: &OptionSelectorConfig, spread: f64, bid_volume: u32) -> f64 {
    let spread_score = 1.0 / (1.0 + spread.max(0.0));
    let volume = f64::from(bid_volume);
    let volume_score = volume / (volume + 100.0);
    config.liq_spread_weight * spread_score + config.liq_volume_weight * volume_score
}

/// Moneyness score: strictly decreasing in the distance from the target
/// OTM strike.
#[must_use]
pub fn otm_score(strike: f64, target_strike: f64) -> f64 {
    1.0 / (1.0 + (strike - target_strike).abs())
}

/// Expiry score: triangular peak at the midpoint of the allowed
/// trading-day window, decreasing in the absolute deviation from it.
#[must_use]
pub fn expiry_score(config: &OptionSelectorConfig, days_to_expiry: u32) -> f64 {
    let min = f64::from(config.min_trading_days);
    let max = f64::from(config.max_trading_days);
    let mid = (min + max) / 2.0;
    let half = (max - min) / 2.0;

    if half <= 0.0 {
        return if (f64::from(days_to_expiry) - mid).abs() < 0.5 {
            1.0
        } else {
            0.0
        };
    }
    (1.0 - (f64::from(days_to_expiry) - mid).abs() / half).max(0.0)
}

/// Exact weighted combination of the three components.
#[must_use]
pub fn total_score(
    config: &OptionSelectorConfig,
    liquidity: f64,
    otm: f64,
    expiry: f64,
) -> f64 {
    liquidity * config.score_liquidity_weight
        + otm * config.score_otm_weight
        + expiry * config.score_expiry_weight
}
