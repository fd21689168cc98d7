//! Selector configuration
//!
//! Loaded from `config/domain_service/selection/*.toml` with the layering
//! rule `runtime overrides > file > defaults`.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use services_common::config::{get_f64, get_i64, read_toml};

/// Option selection thresholds and score weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionSelectorConfig {
    /// Target OTM strike step
    pub strike_level: u32,
    /// Minimum acceptable best bid price
    pub min_bid_price: f64,
    /// Minimum acceptable best bid volume
    pub min_bid_volume: u32,
    /// Minimum remaining trading days
    pub min_trading_days: u32,
    /// Maximum remaining trading days
    pub max_trading_days: u32,

    /// Open-time gate: minimum session volume
    pub liquidity_min_volume: u32,
    /// Open-time gate: minimum best bid volume
    pub liquidity_min_bid_volume: u32,
    /// Open-time gate: maximum bid-ask spread in ticks
    pub liquidity_max_spread_ticks: u32,

    /// Weight of the liquidity dimension in the total score
    pub score_liquidity_weight: f64,
    /// Weight of the moneyness dimension in the total score
    pub score_otm_weight: f64,
    /// Weight of the expiry dimension in the total score
    pub score_expiry_weight: f64,

    /// Spread share inside the liquidity score
    pub liq_spread_weight: f64,
    /// Volume share inside the liquidity score
    pub liq_volume_weight: f64,

    /// Tolerance for nearest-delta matching
    pub delta_tolerance: f64,
    /// Strike steps between the legs of a vertical spread
    pub default_spread_width: u32,
}

impl Default for OptionSelectorConfig {
    fn default() -> Self {
        Self {
            strike_level: 3,
            min_bid_price: 10.0,
            min_bid_volume: 10,
            min_trading_days: 1,
            max_trading_days: 50,
            liquidity_min_volume: 100,
            liquidity_min_bid_volume: 1,
            liquidity_max_spread_ticks: 3,
            score_liquidity_weight: 0.4,
            score_otm_weight: 0.3,
            score_expiry_weight: 0.3,
            liq_spread_weight: 0.6,
            liq_volume_weight: 0.4,
            delta_tolerance: 0.05,
            default_spread_width: 1,
        }
    }
}

/// Runtime overrides; `None` preserves the underlying layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionSelectorOverrides {
    /// Override for `strike_level`
    pub strike_level: Option<u32>,
    /// Override for `min_bid_price`
    pub min_bid_price: Option<f64>,
    /// Override for `min_bid_volume`
    pub min_bid_volume: Option<u32>,
    /// Override for `min_trading_days`
    pub min_trading_days: Option<u32>,
    /// Override for `max_trading_days`
    pub max_trading_days: Option<u32>,
    /// Override for `liquidity_min_volume`
    pub liquidity_min_volume: Option<u32>,
    /// Override for `liquidity_min_bid_volume`
    pub liquidity_min_bid_volume: Option<u32>,
    /// Override for `liquidity_max_spread_ticks`
    pub liquidity_max_spread_ticks: Option<u32>,
    /// Override for `score_liquidity_weight`
    pub score_liquidity_weight: Option<f64>,
    /// Override for `score_otm_weight`
    pub score_otm_weight: Option<f64>,
    /// Override for `score_expiry_weight`
    pub score_expiry_weight: Option<f64>,
    /// Override for `liq_spread_weight`
    pub liq_spread_weight: Option<f64>,
    /// Override for `liq_volume_weight`
    pub liq_volume_weight: Option<f64>,
    /// Override for `delta_tolerance`
    pub delta_tolerance: Option<f64>,
    /// Override for `default_spread_width`
    pub default_spread_width: Option<u32>,
}

impl OptionSelectorConfig {
    /// Load from `<config_dir>/selection/option_selector.toml`.
    pub fn load(config_dir: &Path, overrides: &OptionSelectorOverrides) -> Result<Self> {
        let doc = read_toml(&config_dir.join("selection").join("option_selector.toml"))?;
        let mut config = Self::default();

        let set_u32 = |value: Option<i64>, target: &mut u32| {
            if let Some(v) = value {
                *target = v.max(0) as u32;
            }
        };

        set_u32(get_i64(&doc, "filter", "strike_level"), &mut config.strike_level);
        if let Some(v) = get_f64(&doc, "filter", "min_bid_price") {
            config.min_bid_price = v;
        }
        set_u32(get_i64(&doc, "filter", "min_bid_volume"), &mut config.min_bid_volume);
        set_u32(get_i64(&doc, "filter", "min_trading_days"), &mut config.min_trading_days);
        set_u32(get_i64(&doc, "filter", "max_trading_days"), &mut config.max_trading_days);

        set_u32(get_i64(&doc, "liquidity", "min_volume"), &mut config.liquidity_min_volume);
        set_u32(
            get_i64(&doc, "liquidity", "min_bid_volume"),
            &mut config.liquidity_min_bid_volume,
        );
        set_u32(
            get_i64(&doc, "liquidity", "max_spread_ticks"),
            &mut config.liquidity_max_spread_ticks,
        );

        if let Some(v) = get_f64(&doc, "score_weight", "liquidity_weight") {
            config.score_liquidity_weight = v;
        }
        if let Some(v) = get_f64(&doc, "score_weight", "otm_weight") {
            config.score_otm_weight = v;
        }
        if let Some(v) = get_f64(&doc, "score_weight", "expiry_weight") {
            config.score_expiry_weight = v;
        }

        // Nested [score_weight.liquidity_detail] table.
        if let Some(detail) = doc.get("score_weight").and_then(|s| s.get("liquidity_detail")) {
            if let Some(v) = detail.get("spread_weight").and_then(toml::Value::as_float) {
                config.liq_spread_weight = v;
            }
            if let Some(v) = detail.get("volume_weight").and_then(toml::Value::as_float) {
                config.liq_volume_weight = v;
            }
        }

        if let Some(v) = get_f64(&doc, "delta", "tolerance") {
            config.delta_tolerance = v;
        }
        set_u32(get_i64(&doc, "spread", "default_width"), &mut config.default_spread_width);

        apply_overrides(&mut config, overrides);
        Ok(config)
    }
}

fn apply_overrides(config: &mut OptionSelectorConfig, overrides: &OptionSelectorOverrides) {
    if let Some(v) = overrides.strike_level {
        config.strike_level = v;
    }
    if let Some(v) = overrides.min_bid_price {
        config.min_bid_price = v;
    }
    if let Some(v) = overrides.min_bid_volume {
        config.min_bid_volume = v;
    }
    if let Some(v) = overrides.min_trading_days {
        config.min_trading_days = v;
    }
    if let Some(v) = overrides.max_trading_days {
        config.max_trading_days = v;
    }
    if let Some(v) = overrides.liquidity_min_volume {
        config.liquidity_min_volume = v;
    }
    if let Some(v) = overrides.liquidity_min_bid_volume {
        config.liquidity_min_bid_volume = v;
    }
    if let Some(v) = overrides.liquidity_max_spread_ticks {
        config.liquidity_max_spread_ticks = v;
    }
    if let Some(v) = overrides.score_liquidity_weight {
        config.score_liquidity_weight = v;
    }
    if let Some(v) = overrides.score_otm_weight {
        config.score_otm_weight = v;
    }
    if let Some(v) = overrides.score_expiry_weight {
        config.score_expiry_weight = v;
    }
    if let Some(v) = overrides.liq_spread_weight {
        config.liq_spread_weight = v;
    }
    if let Some(v) = overrides.liq_volume_weight {
        config.liq_volume_weight = v;
    }
    if let Some(v) = overrides.delta_tolerance {
        config.delta_tolerance = v;
    }
    if let Some(v) = overrides.default_spread_width {
        config.default_spread_width = v;
    }
}

/// Dominant-contract selection weights for the future leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FutureSelectorConfig {
    /// Session-volume weight in the dominant score
    pub volume_weight: f64,
    /// Open-interest weight in the dominant score
    pub oi_weight: f64,
    /// Days before expiry at which positions roll
    pub rollover_days: u32,
}

impl Default for FutureSelectorConfig {
    fn default() -> Self {
        Self {
            volume_weight: 0.6,
            oi_weight: 0.4,
            rollover_days: 5,
        }
    }
}

/// Runtime overrides for [`FutureSelectorConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FutureSelectorOverrides {
    /// Override for `volume_weight`
    pub volume_weight: Option<f64>,
    /// Override for `oi_weight`
    pub oi_weight: Option<f64>,
    /// Override for `rollover_days`
    pub rollover_days: Option<u32>,
}

impl FutureSelectorConfig {
    /// Load from `<config_dir>/selection/future_selector.toml`.
    pub fn load(config_dir: &Path, overrides: &FutureSelectorOverrides) -> Result<Self> {
        let doc = read_toml(&config_dir.join("selection").join("future_selector.toml"))?;
        let mut config = Self::default();

        if let Some(v) = get_f64(&doc, "dominant", "volume_weight") {
            config.volume_weight = v;
        }
        if let Some(v) = get_f64(&doc, "dominant", "oi_weight") {
            config.oi_weight = v;
        }
        if let Some(v) = get_i64(&doc, "rollover", "days") {
            config.rollover_days = v.max(0) as u32;
        }

        if let Some(v) = overrides.volume_weight {
            config.volume_weight = v;
        }
        if let Some(v) = overrides.oi_weight {
            config.oi_weight = v;
        }
        if let Some(v) = overrides.rollover_days {
            config.rollover_days = v;
        }

        Ok(config)
    }
}
