use cflux_shipments::*;

fn p(id: &str) -> Principal {
    Principal::from(id)
}

#[test]
fn full_delivery_lifecycle() {
    let registry = ShipmentRegistry::with_admin("A");

    let id = registry.create_shipment(&p("S"), "R", "hash-1").unwrap();
    assert_eq!(id, ShipmentId::FIRST);
    assert_eq!(registry.get_status(id), Some(ShipmentStatus::Created));

    assert!(registry.assign_carrier(&p("A"), id, "C").unwrap());
    assert!(registry.update_status(&p("C"), id, 1).unwrap());
    assert!(registry.update_status(&p("R"), id, 2).unwrap());

    let shipment = registry.get_shipment(id).unwrap();
    assert_eq!(shipment.status, ShipmentStatus::Delivered);
    assert_eq!(shipment.carrier, Some(p("C")));
    assert_eq!(shipment.shipper, p("S"));
    assert_eq!(shipment.recipient, p("R"));
    assert_eq!(shipment.metadata_hash, "hash-1");

    let err = registry.update_status(&p("C"), id, 2).unwrap_err();
    assert!(matches!(err, ShipmentError::Unauthorized { .. }));
    assert_eq!(err.code(), 100);
    assert_eq!(registry.get_status(id), Some(ShipmentStatus::Delivered));
}

#[test]
fn transferred_admin_replaces_previous_one() {
    let registry = ShipmentRegistry::with_admin("A");
    let id = registry.create_shipment(&p("S"), "R", "h").unwrap();

    assert!(registry.transfer_admin(&p("A"), "B").unwrap());
    assert_eq!(registry.admin(), p("B"));

    let err = registry.assign_carrier(&p("A"), id, "C").unwrap_err();
    assert_eq!(err.code(), 100);
    assert_eq!(registry.get_shipment(id).unwrap().carrier, None);

    let err = registry.transfer_admin(&p("A"), "A").unwrap_err();
    assert_eq!(err.code(), 100);

    assert!(registry.assign_carrier(&p("B"), id, "C").unwrap());
}

#[test]
fn transfer_admin_accepts_any_value() {
    let registry = ShipmentRegistry::with_admin("A");

    assert!(registry.transfer_admin(&p("A"), "A").unwrap());
    assert!(registry.transfer_admin(&p("A"), "").unwrap());
    assert!(registry.is_admin(&p("")));
    assert!(registry.transfer_admin(&p(""), "Z").unwrap());
    assert_eq!(registry.admin(), p("Z"));
}

#[test]
fn ids_are_sequential_and_independent_of_caller() {
    let registry = ShipmentRegistry::with_admin("A");
    let ids: Vec<u64> = ["S", "A", "", "S"]
        .into_iter()
        .map(|caller| registry.create_shipment(&p(caller), "R", "h").unwrap().get())
        .collect();

    assert_eq!(ids, [1, 2, 3, 4]);
    assert_eq!(registry.len(), 4);
    assert_eq!(registry.get_shipment(ShipmentId::new(3)).unwrap().shipper, p(""));
}

#[test]
fn carrier_may_be_reassigned_at_any_status() {
    let registry = ShipmentRegistry::with_admin("A");
    let id = registry.create_shipment(&p("S"), "R", "h").unwrap();

    registry.assign_carrier(&p("A"), id, "C1").unwrap();
    registry.transition(&p("C1"), id, ShipmentStatus::InTransit).unwrap();
    registry.transition(&p("S"), id, ShipmentStatus::Cancelled).unwrap();
    registry.assign_carrier(&p("A"), id, "C2").unwrap();

    assert_eq!(registry.get_status(id), Some(ShipmentStatus::Cancelled));
    assert_eq!(registry.update_status(&p("C1"), id, 1).unwrap_err().code(), 104);
    assert!(registry.update_status(&p("C2"), id, 1).unwrap());
}

#[test]
fn transitions_are_not_ordered() {
    let registry = ShipmentRegistry::with_admin("A");
    let id = registry.create_shipment(&p("S"), "R", "h").unwrap();

    registry.transition(&p("R"), id, ShipmentStatus::Delivered).unwrap();
    registry.transition(&p("S"), id, ShipmentStatus::Disputed).unwrap();
    registry.transition(&p("R"), id, ShipmentStatus::Delivered).unwrap();
    registry.transition(&p("S"), id, ShipmentStatus::Cancelled).unwrap();
    registry.transition(&p("R"), id, ShipmentStatus::Delivered).unwrap();

    assert_eq!(registry.get_status(id), Some(ShipmentStatus::Delivered));
}

#[test]
fn in_transit_requires_an_assigned_carrier() {
    let registry = ShipmentRegistry::with_admin("A");
    let id = registry.create_shipment(&p("S"), "R", "h").unwrap();

    for caller in ["A", "S", "R", ""] {
        let err = registry.update_status(&p(caller), id, 1).unwrap_err();
        assert!(matches!(err, ShipmentError::NotCarrier { .. }));
    }
    assert_eq!(registry.get_status(id), Some(ShipmentStatus::Created));
}

#[test]
fn invalid_status_is_rejected_for_every_caller() {
    let registry = ShipmentRegistry::with_admin("A");
    let id = registry.create_shipment(&p("S"), "R", "h").unwrap();
    registry.assign_carrier(&p("A"), id, "C").unwrap();

    for caller in ["A", "S", "R", "C", "X"] {
        for code in [0, 5, 200] {
            let err = registry.update_status(&p(caller), id, code).unwrap_err();
            assert_eq!(err.code(), 102, "caller {caller} code {code}");
        }
    }
    assert_eq!(registry.get_status(id), Some(ShipmentStatus::Created));
}

#[test]
fn unknown_ids() {
    let registry = ShipmentRegistry::with_admin("A");
    let missing = ShipmentId::new(1);

    assert_eq!(registry.update_status(&p("S"), missing, 9).unwrap_err().code(), 101);
    assert_eq!(registry.assign_carrier(&p("A"), missing, "C").unwrap_err().code(), 101);
    assert_eq!(registry.get_shipment(missing), None);
    assert_eq!(registry.get_status(missing), None);
    assert_eq!(registry.roles(&p("A"), missing), None);
    assert!(registry.is_empty());
}

#[test]
fn shipper_role_gates_dispute_and_cancel() {
    let registry = ShipmentRegistry::with_admin("A");
    let id = registry.create_shipment(&p("S"), "R", "h").unwrap();
    registry.assign_carrier(&p("A"), id, "C").unwrap();

    for caller in ["A", "R", "C"] {
        for target in [ShipmentStatus::Disputed, ShipmentStatus::Cancelled] {
            let err = registry.transition(&p(caller), id, target).unwrap_err();
            assert!(matches!(err, ShipmentError::NotShipper { .. }));
        }
    }

    assert!(registry.transition(&p("S"), id, ShipmentStatus::Disputed).unwrap());
}

#[test]
fn error_messages_carry_context() {
    let registry = ShipmentRegistry::with_admin("A");
    let id = registry.create_shipment(&p("S"), "R", "h").unwrap();

    let err = registry.update_status(&p("X"), id, 3).unwrap_err();
    assert_eq!(err.to_string(), "Caller is not the shipper (shipment 1 -> Disputed): X is not the shipper");

    let err = registry.get_shipment(ShipmentId::new(7)).ok_or(ShipmentError::NotFound {
        message: "shipment 7".into(),
        context: None,
    });
    let err = err.context("lookup").unwrap_err();
    assert_eq!(err.to_string(), "Shipment not found (lookup): shipment 7");
}
