//! Execution error types

use thiserror::Error;

/// Errors raised by the scheduler and coordinator seams.
///
/// Numeric and lookup paths inside the tick loop never raise: a missing
/// entry is ignored per the local recovery policy. Errors are reserved for
/// malformed requests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecutionError {
    /// Request rejected before scheduling
    #[error("Invalid order parameters: {reason}")]
    InvalidOrderParameters {
        /// Why the request is unusable
        reason: String,
    },

    /// Parent order not found
    #[error("Order not found: {order_id}")]
    OrderNotFound {
        /// The order id that missed
        order_id: String,
    },

    /// Operation on an order already in a terminal state
    #[error("Order already terminal: {order_id}")]
    OrderAlreadyTerminal {
        /// The terminal order id
        order_id: String,
    },
}

/// Result type for execution operations
pub type ExecutionResult<T> = Result<T, ExecutionError>;
