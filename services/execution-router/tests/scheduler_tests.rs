//! Advanced order scheduler tests

use chrono::{DateTime, Duration, TimeZone, Utc};
use execution_router::{
    AdvancedOrderRequest, AdvancedOrderScheduler, AdvancedOrderStatus, AdvancedOrderType,
    AdvancedSchedulerConfig, ExecutionError,
};
use proptest::prelude::*;
use rstest::*;
use services_common::{Direction, DomainEvent, Offset, OrderInstruction, OrderType};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap()
}

fn instruction(volume: u32) -> OrderInstruction {
    OrderInstruction {
        vt_symbol: "rb2510.SHFE".to_string(),
        direction: Direction::Long,
        offset: Offset::Open,
        volume,
        price: 3500.0,
        signal: "unit".to_string(),
        order_type: OrderType::Limit,
    }
}

fn request(order_type: AdvancedOrderType, volume: u32) -> AdvancedOrderRequest {
    AdvancedOrderRequest {
        order_type,
        instruction: instruction(volume),
        batch_size: 0,
        time_window_seconds: 0,
        num_slices: 0,
        volume_profile: Vec::new(),
        interval_seconds: 0,
        per_order_volume: 0,
        volume_randomize_ratio: 0.0,
        price_offset_ticks: 0,
        price_tick: 0.0,
    }
}

#[fixture]
fn scheduler() -> AdvancedOrderScheduler {
    AdvancedOrderScheduler::with_seed(AdvancedSchedulerConfig::default(), 42)
}

#[rstest]
fn iceberg_splits_into_batches(mut scheduler: AdvancedOrderScheduler) {
    // E5: volume 25 with batch 10 -> children [10, 10, 5], all at t0.
    let mut req = request(AdvancedOrderType::Iceberg, 25);
    req.batch_size = 10;
    let order_id = scheduler.submit(req, t0()).unwrap();

    let order = scheduler.get_order(&order_id).unwrap();
    assert_eq!(order.status, AdvancedOrderStatus::Pending);
    let volumes: Vec<u32> = order.child_orders.iter().map(|c| c.volume).collect();
    assert_eq!(volumes, vec![10, 10, 5]);
    for child in &order.child_orders {
        assert_eq!(child.scheduled_time, Some(t0()));
        assert_eq!(child.parent_id, order_id);
    }

    // Every child is pending immediately.
    let pending = scheduler.get_pending_children(t0());
    assert_eq!(pending.len(), 3);
    assert_eq!(
        scheduler.get_order(&order_id).unwrap().status,
        AdvancedOrderStatus::Executing
    );
}

#[rstest]
fn iceberg_completion_emits_event(mut scheduler: AdvancedOrderScheduler) {
    let mut req = request(AdvancedOrderType::Iceberg, 25);
    req.batch_size = 10;
    let order_id = scheduler.submit(req, t0()).unwrap();

    let children: Vec<String> = scheduler
        .get_pending_children(t0())
        .iter()
        .map(|c| c.child_id.clone())
        .collect();

    let mut events = Vec::new();
    for child_id in &children {
        scheduler.mark_child_submitted(child_id);
        events.extend(scheduler.on_child_filled(child_id, t0() + Duration::seconds(5)));
    }

    assert_eq!(
        events,
        vec![DomainEvent::IcebergComplete {
            order_id: order_id.clone(),
            timestamp: t0() + Duration::seconds(5),
        }]
    );
    let order = scheduler.get_order(&order_id).unwrap();
    assert_eq!(order.status, AdvancedOrderStatus::Completed);
    assert_eq!(order.filled_volume, 25);
}

#[rstest]
fn twap_distributes_remainder_on_last_slices(mut scheduler: AdvancedOrderScheduler) {
    let mut req = request(AdvancedOrderType::Twap, 25);
    req.num_slices = 4;
    req.interval_seconds = 60;
    let order_id = scheduler.submit(req, t0()).unwrap();

    let order = scheduler.get_order(&order_id).unwrap();
    let volumes: Vec<u32> = order.slice_schedule.iter().map(|s| s.volume).collect();
    assert_eq!(volumes, vec![6, 6, 6, 7]);

    for (i, slice) in order.slice_schedule.iter().enumerate() {
        assert_eq!(
            slice.scheduled_time,
            t0() + Duration::seconds(60 * i as i64)
        );
    }
}

#[rstest]
fn twap_slice_count_from_time_window(mut scheduler: AdvancedOrderScheduler) {
    let mut req = request(AdvancedOrderType::TimedSplit, 30);
    req.time_window_seconds = 300;
    req.interval_seconds = 60;
    let order_id = scheduler.submit(req, t0()).unwrap();

    let order = scheduler.get_order(&order_id).unwrap();
    assert_eq!(order.slice_schedule.len(), 5);
    assert_eq!(order.slice_schedule.iter().map(|s| s.volume).sum::<u32>(), 30);
}

#[rstest]
fn pending_children_follow_the_time_grid(mut scheduler: AdvancedOrderScheduler) {
    let mut req = request(AdvancedOrderType::Twap, 9);
    req.num_slices = 3;
    req.interval_seconds = 60;
    scheduler.submit(req, t0()).unwrap();

    assert_eq!(scheduler.get_pending_children(t0()).len(), 1);
    assert_eq!(
        scheduler.get_pending_children(t0() + Duration::seconds(60)).len(),
        2
    );
    assert_eq!(
        scheduler.get_pending_children(t0() + Duration::seconds(180)).len(),
        3
    );

    // Unsubmitted children keep coming back; submitted ones drop out.
    let pending = scheduler.get_pending_children(t0() + Duration::seconds(180));
    scheduler.mark_child_submitted(&pending[0].child_id);
    assert_eq!(
        scheduler.get_pending_children(t0() + Duration::seconds(180)).len(),
        2
    );
}

#[rstest]
fn vwap_volumes_follow_profile(mut scheduler: AdvancedOrderScheduler) {
    let mut req = request(AdvancedOrderType::Vwap, 100);
    req.volume_profile = vec![1.0, 2.0, 1.0];
    req.interval_seconds = 30;
    let order_id = scheduler.submit(req, t0()).unwrap();

    let order = scheduler.get_order(&order_id).unwrap();
    let volumes: Vec<u32> = order.slice_schedule.iter().map(|s| s.volume).collect();
    assert_eq!(volumes, vec![25, 50, 25]);
}

#[rstest]
fn vwap_empty_profile_is_rejected(mut scheduler: AdvancedOrderScheduler) {
    let req = request(AdvancedOrderType::Vwap, 100);
    let error = scheduler.submit(req, t0()).unwrap_err();
    assert!(matches!(error, ExecutionError::InvalidOrderParameters { .. }));
}

#[rstest]
fn zero_volume_is_rejected(mut scheduler: AdvancedOrderScheduler) {
    let req = request(AdvancedOrderType::Iceberg, 0);
    assert!(scheduler.submit(req, t0()).is_err());
}

#[rstest]
fn classic_iceberg_randomizes_but_preserves_total(mut scheduler: AdvancedOrderScheduler) {
    let mut req = request(AdvancedOrderType::ClassicIceberg, 100);
    req.per_order_volume = 10;
    req.volume_randomize_ratio = 0.3;
    req.price_offset_ticks = 2;
    req.price_tick = 0.5;
    let order_id = scheduler.submit(req, t0()).unwrap();

    let order = scheduler.get_order(&order_id).unwrap();
    let total: u32 = order.child_orders.iter().map(|c| c.volume).sum();
    assert_eq!(total, 100);
    // Buying parent: the child offset is positive two ticks.
    for child in &order.child_orders {
        assert!((child.price_offset - 1.0).abs() < 1e-12);
    }
}

#[rstest]
fn enhanced_twap_randomizes_on_the_grid(mut scheduler: AdvancedOrderScheduler) {
    let mut req = request(AdvancedOrderType::EnhancedTwap, 60);
    req.num_slices = 6;
    req.interval_seconds = 30;
    req.volume_randomize_ratio = 0.5;
    let order_id = scheduler.submit(req, t0()).unwrap();

    let order = scheduler.get_order(&order_id).unwrap();
    assert_eq!(order.slice_schedule.len(), 6);
    assert_eq!(order.slice_schedule.iter().map(|s| s.volume).sum::<u32>(), 60);
    for pair in order.slice_schedule.windows(2) {
        assert!(pair[0].scheduled_time <= pair[1].scheduled_time);
    }
}

#[rstest]
fn seeded_schedulers_replay_identically() {
    let build = || {
        let mut scheduler =
            AdvancedOrderScheduler::with_seed(AdvancedSchedulerConfig::default(), 7);
        let mut req = request(AdvancedOrderType::EnhancedTwap, 80);
        req.num_slices = 8;
        req.interval_seconds = 30;
        req.volume_randomize_ratio = 0.4;
        let order_id = scheduler.submit(req, t0()).unwrap();
        scheduler
            .get_order(&order_id)
            .unwrap()
            .slice_schedule
            .iter()
            .map(|s| s.volume)
            .collect::<Vec<u32>>()
    };

    assert_eq!(build(), build());
}

#[rstest]
fn cancel_is_absorbing(mut scheduler: AdvancedOrderScheduler) {
    let mut req = request(AdvancedOrderType::Iceberg, 20);
    req.batch_size = 10;
    let order_id = scheduler.submit(req, t0()).unwrap();

    scheduler.cancel(&order_id).unwrap();
    assert_eq!(
        scheduler.get_order(&order_id).unwrap().status,
        AdvancedOrderStatus::Cancelled
    );

    // Cancelled parents emit no more children and ignore fills.
    assert!(scheduler.get_pending_children(t0()).is_empty());
    let child_id = scheduler.get_order(&order_id).unwrap().child_orders[0]
        .child_id
        .clone();
    assert!(scheduler.on_child_filled(&child_id, t0()).is_empty());

    // A second cancel reports the terminal state.
    assert!(matches!(
        scheduler.cancel(&order_id),
        Err(ExecutionError::OrderAlreadyTerminal { .. })
    ));
}

proptest! {
    /// Child volumes always sum to the parent volume and scheduled times
    /// are non-decreasing, randomization included.
    #[test]
    fn volume_conservation(
        volume in 1u32..500,
        batch in 1u32..40,
        slices in 1u32..12,
        ratio in 0.0..1.0f64,
        seed in any::<u64>(),
        flavour in 0usize..5,
    ) {
        let order_type = [
            AdvancedOrderType::Iceberg,
            AdvancedOrderType::Twap,
            AdvancedOrderType::TimedSplit,
            AdvancedOrderType::ClassicIceberg,
            AdvancedOrderType::EnhancedTwap,
        ][flavour];

        let mut scheduler =
            AdvancedOrderScheduler::with_seed(AdvancedSchedulerConfig::default(), seed);
        let mut req = request(order_type, volume);
        req.batch_size = batch;
        req.per_order_volume = batch;
        req.num_slices = slices;
        req.interval_seconds = 15;
        req.volume_randomize_ratio = ratio;

        let order_id = scheduler.submit(req, t0()).unwrap();
        let order = scheduler.get_order(&order_id).unwrap();

        let schedule_total: u32 = order.slice_schedule.iter().map(|s| s.volume).sum();
        prop_assert_eq!(schedule_total, volume);
        let child_total: u32 = order.child_orders.iter().map(|c| c.volume).sum();
        prop_assert_eq!(child_total, volume);

        for pair in order.slice_schedule.windows(2) {
            prop_assert!(pair[0].scheduled_time <= pair[1].scheduled_time);
        }
        for child in &order.child_orders {
            prop_assert_eq!(child.parent_id.as_str(), order_id.as_str());
        }
    }
}
