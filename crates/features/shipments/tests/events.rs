use cflux_shipments::*;
use tokio::sync::broadcast::error::TryRecvError;

#[test]
fn committed_mutations_are_published_in_order() {
    let registry = ShipmentRegistry::with_admin("A");
    let mut rx = registry.subscribe();

    let id = registry.create_shipment(&"S".into(), "R", "h").unwrap();
    registry.assign_carrier(&"A".into(), id, "C").unwrap();
    registry.assign_carrier(&"A".into(), id, "C2").unwrap();
    registry.update_status(&"C2".into(), id, 1).unwrap();
    registry.transfer_admin(&"A".into(), "B").unwrap();

    let events: Vec<ShipmentEvent> =
        std::iter::from_fn(|| rx.try_recv().ok()).map(|e| (*e).clone()).collect();

    assert_eq!(
        events,
        [
            ShipmentEvent::ShipmentCreated { id, shipper: "S".into(), recipient: "R".into() },
            ShipmentEvent::CarrierAssigned { id, carrier: "C".into(), replaced: None },
            ShipmentEvent::CarrierAssigned { id, carrier: "C2".into(), replaced: Some("C".into()) },
            ShipmentEvent::StatusChanged {
                id,
                by: "C2".into(),
                previous: ShipmentStatus::Created,
                current: ShipmentStatus::InTransit,
            },
            ShipmentEvent::AdminTransferred { previous: "A".into(), current: "B".into() },
        ]
    );
}

#[test]
fn rejected_calls_publish_nothing() {
    let registry = ShipmentRegistry::with_admin("A");
    let id = registry.create_shipment(&"S".into(), "R", "h").unwrap();
    let mut rx = registry.subscribe();

    assert!(registry.transfer_admin(&"X".into(), "X").is_err());
    assert!(registry.assign_carrier(&"X".into(), id, "C").is_err());
    assert!(registry.update_status(&"S".into(), id, 1).is_err());
    assert!(registry.update_status(&"S".into(), id, 0).is_err());
    assert!(registry.update_status(&"S".into(), ShipmentId::new(42), 3).is_err());

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn slow_subscriber_lags_without_blocking_the_registry() {
    let registry = ShipmentRegistry::with_capacity("A", 2);
    let mut rx = registry.subscribe();

    for _ in 0..5 {
        registry.create_shipment(&"S".into(), "R", "h").unwrap();
    }

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(3))));
    let next = rx.try_recv().unwrap();
    assert_eq!(next.shipment_id(), Some(ShipmentId::new(4)));
}

#[tokio::test]
async fn subscribers_receive_events_asynchronously() {
    let registry = ShipmentRegistry::with_admin("A");
    let mut rx = registry.subscribe();

    let writer = registry.clone();
    let handle = tokio::spawn(async move { writer.create_shipment(&"S".into(), "R", "h").unwrap() });

    let event = rx.recv().await.unwrap();
    let id = handle.await.unwrap();
    assert_eq!(event.shipment_id(), Some(id));
}
