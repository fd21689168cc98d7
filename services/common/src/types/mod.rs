//! Shared value objects

pub mod contract;
pub mod position;
pub mod trading;
