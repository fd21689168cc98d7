//! Risk budget layer
//!
//! Splits portfolio-level Greek limits (delta, gamma, vega) across
//! underlyings or named strategies, accumulates usage from live positions,
//! and enforces per-dimension limits. Pure map/reduce over snapshots; no
//! I/O and no gateway calls.

pub mod allocator;
pub mod config;
pub mod sizing;
pub mod value_objects;

pub use allocator::{RiskBudgetAllocator, CONTRACT_MULTIPLIER};
pub use config::PositionSizingConfig;
pub use sizing::{PositionSizer, SizingResult};
pub use value_objects::{
    AllocationDimension, BudgetCheckResult, GreeksBudget, GreeksUsage, RiskBudgetConfig,
    RiskConfigError, RiskThresholds,
};
