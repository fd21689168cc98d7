//! Domain event serialization tests

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rstest::*;
use services_common::{Direction, DomainEvent};

#[rstest]
fn events_serialize_with_type_tag() {
    let timestamp = Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap();
    let event = DomainEvent::OrderTimeout {
        vt_orderid: "gw_1".to_string(),
        timestamp,
    };

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "order_timeout");
    assert_eq!(json["vt_orderid"], "gw_1");

    let back: DomainEvent = serde_json::from_value(json).unwrap();
    assert_eq!(back, event);
    assert_eq!(back.timestamp(), timestamp);
}

#[rstest]
fn completion_events_round_trip() {
    let timestamp = Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap();
    let events = [
        DomainEvent::IcebergComplete {
            order_id: "adv_1".to_string(),
            timestamp,
        },
        DomainEvent::TwapComplete {
            order_id: "adv_2".to_string(),
            timestamp,
        },
        DomainEvent::VwapComplete {
            order_id: "adv_3".to_string(),
            timestamp,
        },
        DomainEvent::TimedSplitComplete {
            order_id: "adv_4".to_string(),
            timestamp,
        },
        DomainEvent::OrderRetryExhausted {
            vt_orderid: "gw_9".to_string(),
            retry_count: 4,
            timestamp,
        },
    ];

    for event in events {
        let back: DomainEvent =
            serde_json::from_value(serde_json::to_value(&event).unwrap()).unwrap();
        assert_eq!(back, event);
    }
}

proptest! {
    /// Direction reversal is a fixed-point-free involution.
    #[test]
    fn direction_reverse_involution(long in any::<bool>()) {
        let d = if long { Direction::Long } else { Direction::Short };
        prop_assert_eq!(d.reverse().reverse(), d);
        prop_assert_ne!(d.reverse(), d);
    }
}
