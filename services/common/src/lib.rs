//! Shared domain types for the option strategy engine
//!
//! - Trading value objects (instructions, direction, offset)
//! - Position records consumed by the risk layer
//! - Contract descriptors shared with the backtest layer
//! - Domain events emitted by the execution layer
//! - TOML configuration plumbing (overrides > file > defaults)

pub mod config;
pub mod events;
pub mod types;

pub use events::DomainEvent;
pub use types::contract::{ContractData, Product};
pub use types::position::Position;
pub use types::trading::{Direction, Offset, OrderInstruction, OrderType};
