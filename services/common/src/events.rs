//! Domain events emitted by the execution layer
//!
//! Events are the only feedback channel from the execution core to the
//! strategy layer; the core itself never talks to a gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tagged union of everything the execution layer can report upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// An active order exceeded its timeout and should be cancelled
    OrderTimeout {
        /// Order identifier assigned at submission
        vt_orderid: String,
        /// Sweep time that detected the timeout
        timestamp: DateTime<Utc>,
    },
    /// An order ran out of retries and is now terminal
    OrderRetryExhausted {
        /// Order identifier of the last attempt
        vt_orderid: String,
        /// Number of retries consumed
        retry_count: u32,
        /// Time the exhaustion was detected
        timestamp: DateTime<Utc>,
    },
    /// An iceberg parent order is fully filled
    IcebergComplete {
        /// Parent order identifier
        order_id: String,
        /// Completion time
        timestamp: DateTime<Utc>,
    },
    /// A TWAP parent order is fully filled
    TwapComplete {
        /// Parent order identifier
        order_id: String,
        /// Completion time
        timestamp: DateTime<Utc>,
    },
    /// A VWAP parent order is fully filled
    VwapComplete {
        /// Parent order identifier
        order_id: String,
        /// Completion time
        timestamp: DateTime<Utc>,
    },
    /// A timed-split parent order is fully filled
    TimedSplitComplete {
        /// Parent order identifier
        order_id: String,
        /// Completion time
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Event timestamp, whichever variant.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::OrderTimeout { timestamp, .. }
            | DomainEvent::OrderRetryExhausted { timestamp, .. }
            | DomainEvent::IcebergComplete { timestamp, .. }
            | DomainEvent::TwapComplete { timestamp, .. }
            | DomainEvent::VwapComplete { timestamp, .. }
            | DomainEvent::TimedSplitComplete { timestamp, .. } => *timestamp,
        }
    }
}
