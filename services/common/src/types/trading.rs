//! Trading value objects
//!
//! The order instruction is the contract between the strategy layer and the
//! execution layer: immutable once built, a new instance is produced for any
//! change.

use serde::{Deserialize, Serialize};

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Buy side
    Long,
    /// Sell side
    Short,
}

impl Direction {
    /// Opposite direction. Total involution: `d.reverse().reverse() == d`.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }
}

/// Position effect of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Offset {
    /// Open a new position
    Open,
    /// Close an existing position
    Close,
}

/// Order price type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Limit order
    Limit,
    /// Market order
    Market,
    /// Fill-and-kill
    Fak,
    /// Fill-or-kill
    Fok,
}

impl Default for OrderType {
    fn default() -> Self {
        OrderType::Limit
    }
}

/// Immutable trade instruction handed between strategy and execution layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInstruction {
    /// Contract identifier, `"{symbol}.{exchange}"`
    pub vt_symbol: String,
    /// Long or short
    pub direction: Direction,
    /// Open or close
    pub offset: Offset,
    /// Order volume in lots, positive
    pub volume: u32,
    /// Limit price, non-negative
    pub price: f64,
    /// Free-form signal tag from the strategy layer
    #[serde(default)]
    pub signal: String,
    /// Price type
    #[serde(default)]
    pub order_type: OrderType,
}

impl OrderInstruction {
    /// Copy of this instruction with a different volume.
    #[must_use]
    pub fn with_volume(&self, volume: u32) -> Self {
        Self {
            volume,
            ..self.clone()
        }
    }

    /// Copy of this instruction with a different price.
    #[must_use]
    pub fn with_price(&self, price: f64) -> Self {
        Self {
            price,
            ..self.clone()
        }
    }

    /// True when the instruction takes liquidity on the buy side
    /// (long open or short close).
    #[must_use]
    pub const fn is_buying(&self) -> bool {
        matches!(
            (self.direction, self.offset),
            (Direction::Long, Offset::Open) | (Direction::Short, Offset::Close)
        )
    }
}
