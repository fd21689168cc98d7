//! Position sizing configuration
//!
//! Loaded from `config/domain_service/risk/position_sizing.toml` with the
//! layering rule `runtime overrides > file > defaults`.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use services_common::config::{get_f64, get_i64, read_toml};

/// Position sizing limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSizingConfig {
    /// Maximum concurrently open positions
    pub max_positions: u32,
    /// Maximum opens per day across all contracts
    pub global_daily_limit: u32,
    /// Maximum opens per day per contract
    pub contract_daily_limit: u32,
    /// Margin rate applied to notional
    pub margin_ratio: f64,
    /// Floor for the margin rate
    pub min_margin_ratio: f64,
    /// Maximum share of capital committed as margin
    pub margin_usage_limit: f64,
    /// Maximum volume on a single order
    pub max_volume_per_order: u32,
}

impl Default for PositionSizingConfig {
    fn default() -> Self {
        Self {
            max_positions: 10,
            global_daily_limit: 20,
            contract_daily_limit: 5,
            margin_ratio: 0.15,
            min_margin_ratio: 0.1,
            margin_usage_limit: 0.8,
            max_volume_per_order: 10,
        }
    }
}

/// Runtime overrides; `None` preserves the underlying layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionSizingOverrides {
    /// Override for `max_positions`
    pub max_positions: Option<u32>,
    /// Override for `global_daily_limit`
    pub global_daily_limit: Option<u32>,
    /// Override for `contract_daily_limit`
    pub contract_daily_limit: Option<u32>,
    /// Override for `margin_ratio`
    pub margin_ratio: Option<f64>,
    /// Override for `min_margin_ratio`
    pub min_margin_ratio: Option<f64>,
    /// Override for `margin_usage_limit`
    pub margin_usage_limit: Option<f64>,
    /// Override for `max_volume_per_order`
    pub max_volume_per_order: Option<u32>,
}

impl PositionSizingConfig {
    /// Load from `<config_dir>/risk/position_sizing.toml`.
    pub fn load(config_dir: &Path, overrides: &PositionSizingOverrides) -> Result<Self> {
        let doc = read_toml(&config_dir.join("risk").join("position_sizing.toml"))?;
        let mut config = Self::default();

        if let Some(v) = get_i64(&doc, "position_limit", "max_positions") {
            config.max_positions = v.max(0) as u32;
        }
        if let Some(v) = get_i64(&doc, "position_limit", "global_daily_limit") {
            config.global_daily_limit = v.max(0) as u32;
        }
        if let Some(v) = get_i64(&doc, "position_limit", "contract_daily_limit") {
            config.contract_daily_limit = v.max(0) as u32;
        }
        if let Some(v) = get_f64(&doc, "margin", "ratio") {
            config.margin_ratio = v;
        }
        if let Some(v) = get_f64(&doc, "margin", "min_ratio") {
            config.min_margin_ratio = v;
        }
        if let Some(v) = get_f64(&doc, "margin", "usage_limit") {
            config.margin_usage_limit = v;
        }
        if let Some(v) = get_i64(&doc, "order", "max_volume_per_order") {
            config.max_volume_per_order = v.max(0) as u32;
        }

        if let Some(v) = overrides.max_positions {
            config.max_positions = v;
        }
        if let Some(v) = overrides.global_daily_limit {
            config.global_daily_limit = v;
        }
        if let Some(v) = overrides.contract_daily_limit {
            config.contract_daily_limit = v;
        }
        if let Some(v) = overrides.margin_ratio {
            config.margin_ratio = v;
        }
        if let Some(v) = overrides.min_margin_ratio {
            config.min_margin_ratio = v;
        }
        if let Some(v) = overrides.margin_usage_limit {
            config.margin_usage_limit = v;
        }
        if let Some(v) = overrides.max_volume_per_order {
            config.max_volume_per_order = v;
        }

        Ok(config)
    }
}
