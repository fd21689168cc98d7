//! Pricing engine configuration
//!
//! Loaded from `config/domain_service/pricing/pricing_engine.toml` with the
//! layering rule `runtime overrides > file > defaults`.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use services_common::config::{get_i64, get_str, read_toml};

use crate::value_objects::PricingModel;

/// Pricing engine configuration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingEngineConfig {
    /// Model used for American exercise
    pub american_model: PricingModel,
    /// Binomial tree step count for the CRR pricer
    pub crr_steps: usize,
}

impl Default for PricingEngineConfig {
    fn default() -> Self {
        Self {
            american_model: PricingModel::Baw,
            crr_steps: 100,
        }
    }
}

/// Runtime overrides; `None` preserves the underlying layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngineOverrides {
    /// Override for the American model
    pub american_model: Option<PricingModel>,
    /// Override for the CRR step count
    pub crr_steps: Option<usize>,
}

impl PricingEngineConfig {
    /// Load from `<config_dir>/pricing/pricing_engine.toml`, applying
    /// overrides on top of the file values on top of the defaults.
    pub fn load(config_dir: &Path, overrides: &PricingEngineOverrides) -> Result<Self> {
        let doc = read_toml(&config_dir.join("pricing").join("pricing_engine.toml"))?;
        let mut config = Self::default();

        if let Some(model) = get_str(&doc, "american", "model") {
            config.american_model = match model.to_ascii_lowercase().as_str() {
                "crr" => PricingModel::Crr,
                "black_scholes" => PricingModel::BlackScholes,
                _ => PricingModel::Baw,
            };
        }
        if let Some(steps) = get_i64(&doc, "crr", "steps") {
            config.crr_steps = steps.max(1) as usize;
        }

        if let Some(model) = overrides.american_model {
            config.american_model = model;
        }
        if let Some(steps) = overrides.crr_steps {
            config.crr_steps = steps;
        }

        Ok(config)
    }
}
