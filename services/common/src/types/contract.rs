//! Contract descriptors shared with the backtest layer

use serde::{Deserialize, Serialize};

/// Instrument category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    /// Futures contract
    Futures,
    /// Option contract
    Option,
}

/// Call/put flag on an option contract descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractOptionType {
    /// Call option
    Call,
    /// Put option
    Put,
}

/// Static contract metadata registered for a backtest session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractData {
    /// Exchange symbol, e.g. `rb2505` or `IO2501-C-4000`
    pub symbol: String,
    /// Exchange code, e.g. `SHFE`
    pub exchange: String,
    /// Display name
    pub name: String,
    /// Futures or option
    pub product: Product,
    /// Contract multiplier
    pub size: f64,
    /// Minimum price increment
    pub pricetick: f64,
    /// Minimum order volume
    pub min_volume: u32,
    /// Strike price, options only
    #[serde(default)]
    pub option_strike: Option<f64>,
    /// Underlying vt_symbol, options only
    #[serde(default)]
    pub option_underlying: Option<String>,
    /// Call/put flag, options only
    #[serde(default)]
    pub option_type: Option<ContractOptionType>,
    /// Expiry tag `YYMM`, options only
    #[serde(default)]
    pub option_expiry: Option<String>,
    /// Originating gateway name
    pub gateway_name: String,
}

impl ContractData {
    /// Globally unique contract identifier, `"{symbol}.{exchange}"`.
    #[must_use]
    pub fn vt_symbol(&self) -> String {
        format!("{}.{}", self.symbol, self.exchange)
    }
}
