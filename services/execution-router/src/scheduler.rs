//! Advanced order scheduler
//!
//! Splits a parent instruction into a pre-computed slice schedule and
//! tracks the resulting children. Pending children are served from a
//! binary heap keyed `(scheduled_time, seq)` so same-instant slices keep
//! their insertion order; entries are lazily discarded once submitted or
//! once their parent reaches a terminal state.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use services_common::DomainEvent;
use tracing::info;

use crate::error::{ExecutionError, ExecutionResult};
use crate::orders::{
    AdvancedOrder, AdvancedOrderRequest, AdvancedOrderStatus, AdvancedOrderType,
    AdvancedSchedulerConfig, ChildOrder, SliceEntry,
};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PendingKey {
    scheduled_time: DateTime<Utc>,
    seq: u64,
    child_id: String,
}

/// Parent/child lifecycle manager for algorithmic orders.
#[derive(Debug)]
pub struct AdvancedOrderScheduler {
    config: AdvancedSchedulerConfig,
    orders: FxHashMap<String, AdvancedOrder>,
    child_parent: FxHashMap<String, String>,
    pending: BinaryHeap<Reverse<PendingKey>>,
    next_order_seq: u64,
    next_child_seq: u64,
    rng: StdRng,
}

impl Default for AdvancedOrderScheduler {
    fn default() -> Self {
        Self::new(AdvancedSchedulerConfig::default())
    }
}

impl AdvancedOrderScheduler {
    /// Scheduler with an entropy-seeded random source.
    #[must_use]
    pub fn new(config: AdvancedSchedulerConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Scheduler with a fixed seed; randomized variants replay
    /// deterministically.
    #[must_use]
    pub fn with_seed(config: AdvancedSchedulerConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: AdvancedSchedulerConfig, rng: StdRng) -> Self {
        Self {
            config,
            orders: FxHashMap::default(),
            child_parent: FxHashMap::default(),
            pending: BinaryHeap::new(),
            next_order_seq: 1,
            next_child_seq: 1,
            rng,
        }
    }

    /// Accept an algorithmic order: compute its slice schedule, create the
    /// children and queue them. Returns the parent order id.
    pub fn submit(
        &mut self,
        request: AdvancedOrderRequest,
        now: DateTime<Utc>,
    ) -> ExecutionResult<String> {
        if request.instruction.volume == 0 {
            return Err(ExecutionError::InvalidOrderParameters {
                reason: "volume 必须大于 0".to_string(),
            });
        }

        let slice_schedule = self.build_slice_schedule(&request, now)?;
        debug_assert_eq!(
            slice_schedule.iter().map(|s| s.volume).sum::<u32>(),
            request.instruction.volume
        );

        let order_id = format!("adv_{}", self.next_order_seq);
        self.next_order_seq += 1;

        let price_offset = self.child_price_offset(&request);
        let mut child_orders = Vec::with_capacity(slice_schedule.len());
        for slice in &slice_schedule {
            let child_id = format!("{}_child_{}", order_id, child_orders.len());
            child_orders.push(ChildOrder {
                child_id: child_id.clone(),
                parent_id: order_id.clone(),
                volume: slice.volume,
                scheduled_time: Some(slice.scheduled_time),
                is_submitted: false,
                is_filled: false,
                price_offset,
            });
            self.child_parent.insert(child_id.clone(), order_id.clone());
            self.pending.push(Reverse(PendingKey {
                scheduled_time: slice.scheduled_time,
                seq: self.next_child_seq,
                child_id,
            }));
            self.next_child_seq += 1;
        }

        info!(
            order_id = %order_id,
            order_type = ?request.order_type,
            children = child_orders.len(),
            volume = request.instruction.volume,
            "advanced order scheduled"
        );

        self.orders.insert(
            order_id.clone(),
            AdvancedOrder {
                order_id: order_id.clone(),
                request,
                status: AdvancedOrderStatus::Pending,
                filled_volume: 0,
                child_orders,
                created_time: now,
                slice_schedule,
            },
        );

        Ok(order_id)
    }

    /// Parent order lookup.
    #[must_use]
    pub fn get_order(&self, order_id: &str) -> Option<&AdvancedOrder> {
        self.orders.get(order_id)
    }

    /// All live parent orders.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Children due at `now`: unsubmitted, scheduled at or before `now`,
    /// with a non-terminal parent, in `(scheduled_time, insertion)` order.
    /// Parents seeing their first child emitted move PENDING -> EXECUTING.
    pub fn get_pending_children(&mut self, now: DateTime<Utc>) -> Vec<ChildOrder> {
        let mut due: Vec<PendingKey> = Vec::new();
        let mut result: Vec<ChildOrder> = Vec::new();

        while let Some(Reverse(key)) = self.pending.peek() {
            if key.scheduled_time > now {
                break;
            }
            let Some(Reverse(key)) = self.pending.pop() else {
                break;
            };

            let Some(parent_id) = self.child_parent.get(&key.child_id) else {
                continue;
            };
            let Some(parent) = self.orders.get_mut(parent_id) else {
                continue;
            };
            if parent.status.is_terminal() {
                continue;
            }
            let Some(child) = parent
                .child_orders
                .iter()
                .find(|c| c.child_id == key.child_id)
            else {
                continue;
            };
            if child.is_submitted {
                // Lazily dropped: submission happened since queueing.
                continue;
            }

            if parent.status == AdvancedOrderStatus::Pending {
                parent.status = AdvancedOrderStatus::Executing;
            }
            result.push(child.clone());
            due.push(key);
        }

        // The children stay queued until they are marked submitted.
        for key in due {
            self.pending.push(Reverse(key));
        }
        result
    }

    /// Mark a child as handed to the gateway. Returns false on a miss.
    pub fn mark_child_submitted(&mut self, child_id: &str) -> bool {
        let Some(parent_id) = self.child_parent.get(child_id) else {
            return false;
        };
        let Some(parent) = self.orders.get_mut(parent_id) else {
            return false;
        };
        match parent
            .child_orders
            .iter_mut()
            .find(|c| c.child_id == child_id)
        {
            Some(child) => {
                child.is_submitted = true;
                true
            }
            None => false,
        }
    }

    /// Process a child fill.
    ///
    /// The fill flag is monotonic; the parent accumulates the child volume
    /// and completes (with its per-algorithm event) once the full volume is
    /// filled. Fills on terminal parents are ignored.
    pub fn on_child_filled(&mut self, child_id: &str, now: DateTime<Utc>) -> Vec<DomainEvent> {
        let Some(parent_id) = self.child_parent.get(child_id).cloned() else {
            return Vec::new();
        };
        let Some(parent) = self.orders.get_mut(&parent_id) else {
            return Vec::new();
        };
        if parent.status.is_terminal() {
            return Vec::new();
        }
        let Some(child) = parent
            .child_orders
            .iter_mut()
            .find(|c| c.child_id == child_id)
        else {
            return Vec::new();
        };
        if child.is_filled {
            return Vec::new();
        }

        child.is_filled = true;
        child.is_submitted = true;
        parent.filled_volume += child.volume;

        if parent.filled_volume >= parent.request.instruction.volume {
            parent.status = AdvancedOrderStatus::Completed;
            info!(order_id = %parent.order_id, "advanced order completed");
            let order_id = parent.order_id.clone();
            let event = match parent.request.order_type {
                AdvancedOrderType::Iceberg | AdvancedOrderType::ClassicIceberg => {
                    DomainEvent::IcebergComplete {
                        order_id,
                        timestamp: now,
                    }
                }
                AdvancedOrderType::Twap | AdvancedOrderType::EnhancedTwap => {
                    DomainEvent::TwapComplete {
                        order_id,
                        timestamp: now,
                    }
                }
                AdvancedOrderType::Vwap => DomainEvent::VwapComplete {
                    order_id,
                    timestamp: now,
                },
                AdvancedOrderType::TimedSplit => DomainEvent::TimedSplitComplete {
                    order_id,
                    timestamp: now,
                },
            };
            return vec![event];
        }
        Vec::new()
    }

    /// External cancellation. Terminal states are absorbing.
    pub fn cancel(&mut self, order_id: &str) -> ExecutionResult<()> {
        let Some(parent) = self.orders.get_mut(order_id) else {
            return Err(ExecutionError::OrderNotFound {
                order_id: order_id.to_string(),
            });
        };
        if parent.status.is_terminal() {
            return Err(ExecutionError::OrderAlreadyTerminal {
                order_id: order_id.to_string(),
            });
        }
        parent.status = AdvancedOrderStatus::Cancelled;
        info!(order_id, "advanced order cancelled");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Slice schedules
    // ------------------------------------------------------------------

    fn build_slice_schedule(
        &mut self,
        request: &AdvancedOrderRequest,
        now: DateTime<Utc>,
    ) -> ExecutionResult<Vec<SliceEntry>> {
        let total = request.instruction.volume;
        match request.order_type {
            AdvancedOrderType::Iceberg => Ok(self.iceberg_schedule(request, total, now)),
            AdvancedOrderType::Twap | AdvancedOrderType::TimedSplit => {
                Ok(self.timed_schedule(request, total, now, 0.0))
            }
            AdvancedOrderType::Vwap => self.vwap_schedule(request, total, now),
            AdvancedOrderType::ClassicIceberg => {
                Ok(self.randomized_iceberg_schedule(request, total, now))
            }
            AdvancedOrderType::EnhancedTwap => {
                let ratio = request.volume_randomize_ratio.clamp(0.0, 1.0);
                Ok(self.timed_schedule(request, total, now, ratio))
            }
        }
    }

    /// Fixed batches, all pending immediately.
    fn iceberg_schedule(
        &self,
        request: &AdvancedOrderRequest,
        total: u32,
        now: DateTime<Utc>,
    ) -> Vec<SliceEntry> {
        let batch = if request.batch_size > 0 {
            request.batch_size
        } else {
            self.config.default_batch_size
        };
        let batch = batch.max(1);

        let mut slices = Vec::new();
        let mut remaining = total;
        while remaining > 0 {
            let volume = batch.min(remaining);
            slices.push(SliceEntry {
                scheduled_time: now,
                volume,
            });
            remaining -= volume;
        }
        slices
    }

    /// Even split over the time grid; the division remainder lands on the
    /// last slices so the total is preserved. A non-zero ratio perturbs
    /// each slice (last absorbs the drift).
    fn timed_schedule(
        &mut self,
        request: &AdvancedOrderRequest,
        total: u32,
        now: DateTime<Utc>,
        randomize_ratio: f64,
    ) -> Vec<SliceEntry> {
        let interval = if request.interval_seconds > 0 {
            request.interval_seconds
        } else {
            self.config.default_interval_seconds
        };
        let num_slices = if request.num_slices > 0 {
            request.num_slices
        } else if request.time_window_seconds > 0 && interval > 0 {
            ((request.time_window_seconds / interval).max(1)) as u32
        } else {
            self.config.default_num_slices
        };
        let n = num_slices.max(1).min(total);

        let base = total / n;
        let remainder = total % n;
        let mut volumes: Vec<u32> = (0..n)
            .map(|i| if i >= n - remainder { base + 1 } else { base })
            .collect();

        if randomize_ratio > 0.0 {
            self.randomize_volumes(&mut volumes, randomize_ratio);
        }

        volumes
            .into_iter()
            .enumerate()
            .map(|(i, volume)| SliceEntry {
                scheduled_time: now + Duration::seconds(interval * i as i64),
                volume,
            })
            .collect()
    }

    /// Profile-proportional volumes on the TWAP time grid.
    fn vwap_schedule(
        &self,
        request: &AdvancedOrderRequest,
        total: u32,
        now: DateTime<Utc>,
    ) -> ExecutionResult<Vec<SliceEntry>> {
        let profile = &request.volume_profile;
        if profile.is_empty() {
            return Err(ExecutionError::InvalidOrderParameters {
                reason: "volume_profile 不能为空".to_string(),
            });
        }
        if profile.iter().any(|&w| w < 0.0) {
            return Err(ExecutionError::InvalidOrderParameters {
                reason: "volume_profile 权重不能为负数".to_string(),
            });
        }
        let weight_sum: f64 = profile.iter().sum();
        if weight_sum <= 0.0 {
            return Err(ExecutionError::InvalidOrderParameters {
                reason: "volume_profile 权重总和必须大于 0".to_string(),
            });
        }

        let interval = if request.interval_seconds > 0 {
            request.interval_seconds
        } else {
            self.config.default_interval_seconds
        };

        // Floor the proportional volumes, then push the remainder onto the
        // last slices, matching the TWAP rounding rule.
        let mut volumes: Vec<u32> = profile
            .iter()
            .map(|&w| (f64::from(total) * w / weight_sum).floor() as u32)
            .collect();
        let assigned: u32 = volumes.iter().sum();
        let remainder = total - assigned;
        let n = volumes.len();
        for i in 0..(remainder as usize) {
            volumes[n - 1 - (i % n)] += 1;
        }

        Ok(volumes
            .into_iter()
            .enumerate()
            .map(|(i, volume)| SliceEntry {
                scheduled_time: now + Duration::seconds(interval * i as i64),
                volume,
            })
            .collect())
    }

    /// Iceberg batches perturbed around the baseline; the running remainder
    /// keeps the total exact.
    fn randomized_iceberg_schedule(
        &mut self,
        request: &AdvancedOrderRequest,
        total: u32,
        now: DateTime<Utc>,
    ) -> Vec<SliceEntry> {
        let baseline = if request.per_order_volume > 0 {
            request.per_order_volume
        } else if request.batch_size > 0 {
            request.batch_size
        } else {
            self.config.default_batch_size
        };
        let baseline = baseline.max(1);
        let ratio = request.volume_randomize_ratio.clamp(0.0, 1.0);

        let mut slices = Vec::new();
        let mut remaining = total;
        while remaining > 0 {
            let volume = if ratio > 0.0 && remaining > baseline {
                let spread = (f64::from(baseline) * ratio).round() as i64;
                let jitter = if spread > 0 {
                    self.rng.gen_range(-spread..=spread)
                } else {
                    0
                };
                let perturbed = (i64::from(baseline) + jitter).max(1) as u32;
                perturbed.min(remaining)
            } else {
                baseline.min(remaining)
            };
            slices.push(SliceEntry {
                scheduled_time: now,
                volume,
            });
            remaining -= volume;
        }
        slices
    }

    /// Perturb slice volumes by up to `ratio` of each baseline, preserving
    /// the total: every slice but the last is jittered and clamped, the
    /// last absorbs the drift.
    fn randomize_volumes(&mut self, volumes: &mut [u32], ratio: f64) {
        let n = volumes.len();
        if n < 2 {
            return;
        }
        let total: u32 = volumes.iter().sum();
        let mut assigned: u32 = 0;

        for i in 0..n - 1 {
            let baseline = volumes[i];
            let spread = (f64::from(baseline) * ratio).round() as i64;
            let jitter = if spread > 0 {
                self.rng.gen_range(-spread..=spread)
            } else {
                0
            };
            let remaining_slices = (n - 1 - i) as u32;
            // Leave at least one lot per remaining slice.
            let available = total - assigned;
            let ceiling = available.saturating_sub(remaining_slices).max(1);
            let perturbed = (i64::from(baseline) + jitter).clamp(1, i64::from(ceiling)) as u32;
            volumes[i] = perturbed;
            assigned += perturbed;
        }
        volumes[n - 1] = total - assigned;
    }

    /// Signed child price offset: positive when the parent buys, negative
    /// when it sells, matching the adaptive pricing sign convention.
    fn child_price_offset(&self, request: &AdvancedOrderRequest) -> f64 {
        match request.order_type {
            AdvancedOrderType::ClassicIceberg | AdvancedOrderType::EnhancedTwap => {
                let ticks = if request.price_offset_ticks != 0 {
                    request.price_offset_ticks
                } else {
                    self.config.default_price_offset_ticks
                };
                let tick = if request.price_tick > 0.0 {
                    request.price_tick
                } else {
                    self.config.default_price_tick
                };
                let magnitude = ticks as f64 * tick;
                if request.instruction.is_buying() {
                    magnitude
                } else {
                    -magnitude
                }
            }
            _ => 0.0,
        }
    }
}
