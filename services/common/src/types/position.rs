//! Position record consumed by the risk layer

use serde::{Deserialize, Serialize};

use crate::types::trading::Direction;

/// A single open position snapshot.
///
/// Input to the risk budget allocator; never mutated by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Contract identifier, `"{symbol}.{exchange}"`
    pub vt_symbol: String,
    /// Underlying contract identifier
    pub underlying_vt_symbol: String,
    /// Strategy signal tag that opened the position
    #[serde(default)]
    pub signal: String,
    /// Position volume in lots, non-negative
    pub volume: u32,
    /// Long or short
    pub direction: Direction,
    /// Average open price
    pub open_price: f64,
    /// Position is still live
    pub is_active: bool,
    /// Position has been fully closed
    pub is_closed: bool,
}
