use cflux_domain::{Principal, Roles, Shipment, ShipmentId, ShipmentStatus};
use serde_json::json;

#[test]
fn status_codes_are_stable() {
    let codes: Vec<u8> = ShipmentStatus::ALL.iter().map(|s| s.code()).collect();
    assert_eq!(codes, vec![0, 1, 2, 3, 4]);

    assert_eq!(ShipmentStatus::try_from(1), Ok(ShipmentStatus::InTransit));
    assert_eq!(ShipmentStatus::try_from(4), Ok(ShipmentStatus::Cancelled));
    assert_eq!(ShipmentStatus::try_from(5), Err(5));
    assert_eq!(ShipmentStatus::Disputed.to_string(), "Disputed");
}

#[test]
fn status_serializes_as_wire_code() {
    assert_eq!(serde_json::to_value(ShipmentStatus::Delivered).unwrap(), json!(2));
    assert_eq!(
        serde_json::from_value::<ShipmentStatus>(json!(3)).unwrap(),
        ShipmentStatus::Disputed
    );
    assert!(serde_json::from_value::<ShipmentStatus>(json!(9)).is_err());
}

#[test]
fn shipment_json_shape() {
    let shipment = Shipment::new(ShipmentId::FIRST, "ST1SHIPPER".into(), "ST1RECIPIENT".into(), "0x1234");

    let value = serde_json::to_value(&shipment).unwrap();
    assert_eq!(
        value,
        json!({
            "id": 1,
            "shipper": "ST1SHIPPER",
            "carrier": null,
            "recipient": "ST1RECIPIENT",
            "status": 0,
            "metadataHash": "0x1234"
        })
    );
}

#[test]
fn unassigned_carrier_matches_nobody() {
    let mut shipment = Shipment::new(ShipmentId::new(7), "S".into(), "R".into(), "h");
    assert!(!shipment.is_carrier(&Principal::from("")));
    assert!(!shipment.is_carrier(&Principal::from("C")));

    shipment.carrier = Some("C".into());
    assert!(shipment.is_carrier(&Principal::from("C")));
}

#[test]
fn roles_cover_every_party_a_principal_plays() {
    let shipment = Shipment {
        carrier: Some("S".into()),
        ..Shipment::new(ShipmentId::new(2), "S".into(), "R".into(), "h")
    };

    assert_eq!(shipment.roles_of(&"S".into()), Roles::SHIPPER | Roles::CARRIER);
    assert_eq!(shipment.roles_of(&"R".into()), Roles::RECIPIENT);
    assert!(shipment.roles_of(&"X".into()).is_empty());
}

#[test]
fn id_successor_stops_below_ceiling() {
    assert_eq!(ShipmentId::FIRST.successor(), Some(ShipmentId::new(2)));
    assert_eq!(ShipmentId::new(u64::MAX - 2).successor(), Some(ShipmentId::new(u64::MAX - 1)));
    assert_eq!(ShipmentId::new(u64::MAX - 1).successor(), None);
    assert_eq!(ShipmentId::CEILING.successor(), None);
}
