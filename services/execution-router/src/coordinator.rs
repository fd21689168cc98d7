//! Execution coordinator
//!
//! Stitches the smart order executor and the advanced order scheduler
//! together. Produces zero gateway calls: every operation returns the
//! instructions and domain events for the strategy layer to act on.

use chrono::{DateTime, Utc};
use services_common::{DomainEvent, OrderInstruction};

use crate::executor::SmartOrderExecutor;
use crate::scheduler::AdvancedOrderScheduler;

/// Coordinates slicing, adaptive pricing and timeout handling.
#[derive(Debug, Default)]
pub struct ExecutionCoordinator {
    /// Timeout/retry state machine
    pub executor: SmartOrderExecutor,
    /// Parent/child scheduler
    pub scheduler: AdvancedOrderScheduler,
}

impl ExecutionCoordinator {
    /// Coordinator over an executor and a scheduler.
    #[must_use]
    pub fn new(executor: SmartOrderExecutor, scheduler: AdvancedOrderScheduler) -> Self {
        Self {
            executor,
            scheduler,
        }
    }

    /// Emit instructions for every child due at `now`.
    ///
    /// Each child gets a child-volume copy of its parent's instruction,
    /// priced adaptively against the quote and rounded to the tick —
    /// identical to calling `calculate_adaptive_price` followed by
    /// `round_price_to_tick` on the same inputs.
    pub fn process_pending_children(
        &mut self,
        now: DateTime<Utc>,
        bid_price: f64,
        ask_price: f64,
        price_tick: f64,
    ) -> (Vec<OrderInstruction>, Vec<DomainEvent>) {
        let mut instructions = Vec::new();
        let events = Vec::new();

        for child in self.scheduler.get_pending_children(now) {
            let Some(parent) = self.scheduler.get_order(&child.parent_id) else {
                continue;
            };

            let child_instruction = parent.request.instruction.with_volume(child.volume);
            let adaptive_price = self.executor.calculate_adaptive_price(
                &child_instruction,
                bid_price,
                ask_price,
                price_tick,
            );
            let rounded_price = self
                .executor
                .round_price_to_tick(adaptive_price, price_tick);

            instructions.push(child_instruction.with_price(rounded_price));
        }

        (instructions, events)
    }

    /// A child was handed to the gateway: register it for timeout
    /// tracking and mark it submitted in the scheduler.
    pub fn on_child_order_submitted(
        &mut self,
        child_id: &str,
        vt_orderid: &str,
        instruction: OrderInstruction,
        now: DateTime<Utc>,
    ) {
        self.scheduler.mark_child_submitted(child_id);
        self.executor.register_order(vt_orderid, instruction, now);
    }

    /// Timeout sweep plus retry preparation.
    ///
    /// Returns `(cancel_ids, retry_instructions, events)`. Events preserve
    /// causal order: every timeout precedes the retry/exhaustion outcome
    /// derived from it.
    pub fn check_timeouts_and_retry(
        &mut self,
        now: DateTime<Utc>,
        price_tick: f64,
    ) -> (Vec<String>, Vec<OrderInstruction>, Vec<DomainEvent>) {
        let (cancel_ids, timeout_events) = self.executor.check_timeouts(now);

        let mut retry_instructions = Vec::new();
        let mut all_events = timeout_events;

        for vt_orderid in &cancel_ids {
            let (retry_instruction, retry_events) =
                self.executor.prepare_retry(vt_orderid, price_tick, now);
            all_events.extend(retry_events);
            if let Some(instruction) = retry_instruction {
                retry_instructions.push(instruction);
            }
        }

        (cancel_ids, retry_instructions, all_events)
    }

    /// Fill report for a child; delegates to the scheduler.
    pub fn on_child_filled(&mut self, child_id: &str, now: DateTime<Utc>) -> Vec<DomainEvent> {
        self.scheduler.on_child_filled(child_id, now)
    }
}
