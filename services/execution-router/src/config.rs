//! Execution configuration loaders
//!
//! Files live under `config/domain_service/execution/`; layering is
//! `runtime overrides > file > defaults`.

use std::path::Path;

use anyhow::Result;
use services_common::config::{get_f64, get_i64, read_toml};

use crate::orders::{AdvancedSchedulerConfig, OrderExecutionConfig};

/// Runtime overrides for [`OrderExecutionConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderExecutionOverrides {
    /// Override for `timeout_seconds`
    pub timeout_seconds: Option<i64>,
    /// Override for `max_retries`
    pub max_retries: Option<u32>,
    /// Override for `slippage_ticks`
    pub slippage_ticks: Option<i64>,
    /// Override for `price_tick`
    pub price_tick: Option<f64>,
}

impl OrderExecutionConfig {
    /// Load from `<config_dir>/execution/order_execution.toml`.
    pub fn load(config_dir: &Path, overrides: &OrderExecutionOverrides) -> Result<Self> {
        let doc = read_toml(&config_dir.join("execution").join("order_execution.toml"))?;
        let mut config = Self::default();

        if let Some(v) = get_i64(&doc, "timeout", "seconds") {
            config.timeout_seconds = v;
        }
        if let Some(v) = get_i64(&doc, "retry", "max_retries") {
            config.max_retries = v.max(0) as u32;
        }
        if let Some(v) = get_i64(&doc, "slippage", "ticks") {
            config.slippage_ticks = v;
        }
        if let Some(v) = get_f64(&doc, "price", "tick") {
            config.price_tick = v;
        }

        if let Some(v) = overrides.timeout_seconds {
            config.timeout_seconds = v;
        }
        if let Some(v) = overrides.max_retries {
            config.max_retries = v;
        }
        if let Some(v) = overrides.slippage_ticks {
            config.slippage_ticks = v;
        }
        if let Some(v) = overrides.price_tick {
            config.price_tick = v;
        }

        Ok(config)
    }
}

/// Runtime overrides for [`AdvancedSchedulerConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvancedSchedulerOverrides {
    /// Override for `default_batch_size`
    pub default_batch_size: Option<u32>,
    /// Override for `default_interval_seconds`
    pub default_interval_seconds: Option<i64>,
    /// Override for `default_num_slices`
    pub default_num_slices: Option<u32>,
    /// Override for `default_volume_randomize_ratio`
    pub default_volume_randomize_ratio: Option<f64>,
    /// Override for `default_price_offset_ticks`
    pub default_price_offset_ticks: Option<i64>,
    /// Override for `default_price_tick`
    pub default_price_tick: Option<f64>,
}

impl AdvancedSchedulerConfig {
    /// Load from `<config_dir>/execution/advanced_scheduler.toml`.
    pub fn load(config_dir: &Path, overrides: &AdvancedSchedulerOverrides) -> Result<Self> {
        let doc = read_toml(&config_dir.join("execution").join("advanced_scheduler.toml"))?;
        let mut config = Self::default();

        if let Some(v) = get_i64(&doc, "defaults", "batch_size") {
            config.default_batch_size = v.max(0) as u32;
        }
        if let Some(v) = get_i64(&doc, "defaults", "interval_seconds") {
            config.default_interval_seconds = v;
        }
        if let Some(v) = get_i64(&doc, "defaults", "num_slices") {
            config.default_num_slices = v.max(0) as u32;
        }
        if let Some(v) = get_f64(&doc, "defaults", "volume_randomize_ratio") {
            config.default_volume_randomize_ratio = v;
        }
        if let Some(v) = get_i64(&doc, "defaults", "price_offset_ticks") {
            config.default_price_offset_ticks = v;
        }
        if let Some(v) = get_f64(&doc, "defaults", "price_tick") {
            config.default_price_tick = v;
        }

        if let Some(v) = overrides.default_batch_size {
            config.default_batch_size = v;
        }
        if let Some(v) = overrides.default_interval_seconds {
            config.default_interval_seconds = v;
        }
        if let Some(v) = overrides.default_num_slices {
            config.default_num_slices = v;
        }
        if let Some(v) = overrides.default_volume_randomize_ratio {
            config.default_volume_randomize_ratio = v;
        }
        if let Some(v) = overrides.default_price_offset_ticks {
            config.default_price_offset_ticks = v;
        }
        if let Some(v) = overrides.default_price_tick {
            config.default_price_tick = v;
        }

        Ok(config)
    }
}
