//! Order execution value objects
//!
//! `ManagedOrder` and `AdvancedOrder` are the persisted state of the
//! execution layer: serde round trips are identities on every field, with
//! the enum string values fixed by the external schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use services_common::OrderInstruction;

/// Smart order executor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderExecutionConfig {
    /// Seconds an order may stay unfilled before it times out
    pub timeout_seconds: i64,
    /// Maximum resubmissions after timeouts
    pub max_retries: u32,
    /// Slippage allowance in ticks for limit orders
    pub slippage_ticks: i64,
    /// Minimum price increment
    pub price_tick: f64,
}

impl Default for OrderExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_retries: 3,
            slippage_ticks: 2,
            price_tick: 0.2,
        }
    }
}

/// Scheduler defaults applied when a request leaves a parameter at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvancedSchedulerConfig {
    /// Default iceberg batch volume
    pub default_batch_size: u32,
    /// Default spacing between slices
    pub default_interval_seconds: i64,
    /// Default slice count
    pub default_num_slices: u32,
    /// Default volume perturbation ratio
    pub default_volume_randomize_ratio: f64,
    /// Default child price offset in ticks
    pub default_price_offset_ticks: i64,
    /// Default minimum price increment
    pub default_price_tick: f64,
}

impl Default for AdvancedSchedulerConfig {
    fn default() -> Self {
        Self {
            default_batch_size: 10,
            default_interval_seconds: 60,
            default_num_slices: 5,
            default_volume_randomize_ratio: 0.1,
            default_price_offset_ticks: 1,
            default_price_tick: 0.01,
        }
    }
}

/// An order under timeout/retry management.
///
/// Lifecycle: created on submission (active, zero retries); a timeout
/// deactivates it and may spawn a successor; filled/cancelled or exhausted
/// retries are terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagedOrder {
    /// Gateway order identifier
    pub vt_orderid: String,
    /// Original instruction this order carries
    pub instruction: OrderInstruction,
    /// Submission time
    pub submit_time: DateTime<Utc>,
    /// Retries consumed so far
    #[serde(default)]
    pub retry_count: u32,
    /// Still live on the exchange
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Algorithmic order flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancedOrderType {
    /// Fixed-batch slicing, all children pending immediately
    Iceberg,
    /// Even slices over a time grid
    Twap,
    /// Profile-weighted slices over a time grid
    Vwap,
    /// Evenly timed split
    TimedSplit,
    /// Iceberg with randomized child volumes and price offsets
    ClassicIceberg,
    /// TWAP with randomized child volumes and price offsets
    EnhancedTwap,
}

/// Parent order state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancedOrderStatus {
    /// Accepted, no child emitted yet
    Pending,
    /// At least one child emitted
    Executing,
    /// All volume filled; absorbing
    Completed,
    /// Externally cancelled; absorbing
    Cancelled,
}

impl AdvancedOrderStatus {
    /// True for the absorbing states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// One pre-computed slice of the parent volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceEntry {
    /// Earliest time the slice may be submitted
    pub scheduled_time: DateTime<Utc>,
    /// Slice volume
    pub volume: u32,
}

/// A child order split off a parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildOrder {
    /// Child identifier
    pub child_id: String,
    /// Owning parent identifier
    pub parent_id: String,
    /// Child volume
    pub volume: u32,
    /// Earliest submission time
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Handed to the gateway
    #[serde(default)]
    pub is_submitted: bool,
    /// Filled; monotonic once set
    #[serde(default)]
    pub is_filled: bool,
    /// Additive price offset, already signed per direction
    #[serde(default)]
    pub price_offset: f64,
}

/// Request to run an algorithmic order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedOrderRequest {
    /// Algorithm flavour
    pub order_type: AdvancedOrderType,
    /// The full-volume instruction to split
    pub instruction: OrderInstruction,
    /// Iceberg batch volume
    #[serde(default)]
    pub batch_size: u32,
    /// Total execution window
    #[serde(default)]
    pub time_window_seconds: i64,
    /// Number of slices
    #[serde(default)]
    pub num_slices: u32,
    /// Relative volume weights for VWAP
    #[serde(default)]
    pub volume_profile: Vec<f64>,
    /// Spacing between slices
    #[serde(default)]
    pub interval_seconds: i64,
    /// Baseline child volume for randomized variants
    #[serde(default)]
    pub per_order_volume: u32,
    /// Child volume perturbation ratio in `[0, 1]`
    #[serde(default)]
    pub volume_randomize_ratio: f64,
    /// Child price offset in ticks
    #[serde(default)]
    pub price_offset_ticks: i64,
    /// Minimum price increment for the offset
    #[serde(default)]
    pub price_tick: f64,
}

/// Live state of an algorithmic order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedOrder {
    /// Parent identifier
    pub order_id: String,
    /// Originating request
    pub request: AdvancedOrderRequest,
    /// State machine position
    pub status: AdvancedOrderStatus,
    /// Volume filled across all children
    #[serde(default)]
    pub filled_volume: u32,
    /// Children split off this parent
    #[serde(default)]
    pub child_orders: Vec<ChildOrder>,
    /// Submission time
    pub created_time: DateTime<Utc>,
    /// Pre-computed slice schedule
    #[serde(default)]
    pub slice_schedule: Vec<SliceEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_wire_values() {
        let json = serde_json::to_string(&AdvancedOrderType::TimedSplit).unwrap();
        assert_eq!(json, "\"timed_split\"");
        let json = serde_json::to_string(&AdvancedOrderType::ClassicIceberg).unwrap();
        assert_eq!(json, "\"classic_iceberg\"");
        let json = serde_json::to_string(&AdvancedOrderStatus::Executing).unwrap();
        assert_eq!(json, "\"executing\"");
    }

    #[test]
    fn terminal_states() {
        assert!(AdvancedOrderStatus::Completed.is_terminal());
        assert!(AdvancedOrderStatus::Cancelled.is_terminal());
        assert!(!AdvancedOrderStatus::Pending.is_terminal());
        assert!(!AdvancedOrderStatus::Executing.is_terminal());
    }
}
