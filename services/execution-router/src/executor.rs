//! Smart order executor
//!
//! Owns the map of managed orders. Computes adaptive limit prices, sweeps
//! for timeouts, and prepares retries until the retry budget is exhausted.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use services_common::{DomainEvent, OrderInstruction, OrderType};
use tracing::{debug, info};

use crate::orders::{ManagedOrder, OrderExecutionConfig};

/// Timeout/retry state machine over submitted orders.
#[derive(Debug, Default)]
pub struct SmartOrderExecutor {
    config: OrderExecutionConfig,
    orders: FxHashMap<String, ManagedOrder>,
}

impl SmartOrderExecutor {
    /// Executor from configuration.
    #[must_use]
    pub fn new(config: OrderExecutionConfig) -> Self {
        Self {
            config,
            orders: FxHashMap::default(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &OrderExecutionConfig {
        &self.config
    }

    /// Adaptive limit price for an instruction against the current quote.
    ///
    /// Buying (long open / short close) crosses to the ask plus slippage;
    /// selling crosses to the bid minus slippage. Market-style order types
    /// (market, FAK, FOK) bypass the slippage allowance.
    #[must_use]
    pub fn calculate_adaptive_price(
        &self,
        instruction: &OrderInstruction,
        bid_price: f64,
        ask_price: f64,
        price_tick: f64,
    ) -> f64 {
        let slippage_ticks = match instruction.order_type {
            OrderType::Limit => self.config.slippage_ticks,
            OrderType::Market | OrderType::Fak | OrderType::Fok => 0,
        };
        let slippage = slippage_ticks as f64 * price_tick;

        if instruction.is_buying() {
            ask_price + slippage
        } else {
            bid_price - slippage
        }
    }

    /// Round to the nearest tick multiple, half away from the book
    /// (half-up for the non-negative price domain).
    #[must_use]
    pub fn round_price_to_tick(&self, price: f64, price_tick: f64) -> f64 {
        if price_tick <= 0.0 {
            return price;
        }
        (price / price_tick).round() * price_tick
    }

    /// Record a freshly submitted order for timeout tracking.
    pub fn register_order(
        &mut self,
        vt_orderid: &str,
        instruction: OrderInstruction,
        now: DateTime<Utc>,
    ) {
        debug!(vt_orderid, "registering order for timeout tracking");
        self.orders.insert(
            vt_orderid.to_string(),
            ManagedOrder {
                vt_orderid: vt_orderid.to_string(),
                instruction,
                submit_time: now,
                retry_count: 0,
                is_active: true,
            },
        );
    }

    /// Managed order lookup.
    #[must_use]
    pub fn managed_order(&self, vt_orderid: &str) -> Option<&ManagedOrder> {
        self.orders.get(vt_orderid)
    }

    /// Number of still-active orders.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.orders.values().filter(|o| o.is_active).count()
    }

    /// Mark an order as no longer live (filled or cancelled externally).
    pub fn deactivate_order(&mut self, vt_orderid: &str) {
        if let Some(order) = self.orders.get_mut(vt_orderid) {
            order.is_active = false;
        }
    }

    /// Sweep for timed-out orders.
    ///
    /// An order is a timeout candidate iff it is active and
    /// `now - submit_time >= timeout_seconds`. Candidates are deactivated
    /// and returned (oldest first) together with their timeout events.
    pub fn check_timeouts(&mut self, now: DateTime<Utc>) -> (Vec<String>, Vec<DomainEvent>) {
        let mut timed_out: Vec<(DateTime<Utc>, String)> = self
            .orders
            .values()
            .filter(|order| {
                order.is_active
                    && (now - order.submit_time).num_seconds() >= self.config.timeout_seconds
            })
            .map(|order| (order.submit_time, order.vt_orderid.clone()))
            .collect();
        timed_out.sort();

        let mut cancel_ids = Vec::with_capacity(timed_out.len());
        let mut events = Vec::with_capacity(timed_out.len());
        for (_, vt_orderid) in timed_out {
            if let Some(order) = self.orders.get_mut(&vt_orderid) {
                order.is_active = false;
            }
            info!(vt_orderid = %vt_orderid, "order timed out");
            events.push(DomainEvent::OrderTimeout {
                vt_orderid: vt_orderid.clone(),
                timestamp: now,
            });
            cancel_ids.push(vt_orderid);
        }
        (cancel_ids, events)
    }

    /// Prepare the resubmission of a timed-out order.
    ///
    /// Increments the retry count; past `max_retries` the order becomes
    /// terminal and only an exhaustion event comes back. Otherwise a fresh
    /// instruction with the same fields (price re-aligned to the tick) is
    /// returned.
    pub fn prepare_retry(
        &mut self,
        vt_orderid: &str,
        price_tick: f64,
        now: DateTime<Utc>,
    ) -> (Option<OrderInstruction>, Vec<DomainEvent>) {
        let Some(order) = self.orders.get_mut(vt_orderid) else {
            return (None, Vec::new());
        };

        order.retry_count += 1;
        if order.retry_count > self.config.max_retries {
            info!(vt_orderid, retries = order.retry_count, "retries exhausted");
            return (
                None,
                vec![DomainEvent::OrderRetryExhausted {
                    vt_orderid: vt_orderid.to_string(),
                    retry_count: order.retry_count,
                    timestamp: now,
                }],
            );
        }

        let price = if price_tick > 0.0 {
            (order.instruction.price / price_tick).round() * price_tick
        } else {
            order.instruction.price
        };
        (Some(order.instruction.with_price(price)), Vec::new())
    }

    /// Register the successor of a timed-out order under its new id.
    ///
    /// The retry count carries over from the prior generation so the retry
    /// budget spans the whole chain of resubmissions.
    pub fn register_retry(
        &mut self,
        prior_vt_orderid: &str,
        new_vt_orderid: &str,
        instruction: OrderInstruction,
        now: DateTime<Utc>,
    ) {
        let retry_count = self
            .orders
            .get(prior_vt_orderid)
            .map_or(0, |order| order.retry_count);
        self.orders.insert(
            new_vt_orderid.to_string(),
            ManagedOrder {
                vt_orderid: new_vt_orderid.to_string(),
                instruction,
                submit_time: now,
                retry_count,
                is_active: true,
            },
        );
    }
}
