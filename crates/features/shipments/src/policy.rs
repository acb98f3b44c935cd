//! Authorization table for status transitions.
//!
//! Transitions are gated by role only. The current status of a shipment never
//! restricts which target may be requested.

use crate::error::ShipmentError;
use cflux_domain::{Principal, Shipment, ShipmentStatus};

/// The party allowed to move a shipment into a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Carrier,
    Recipient,
    Shipper,
}

impl Gate {
    /// `None` for statuses no caller may request (`Created`).
    #[must_use]
    pub const fn for_target(target: ShipmentStatus) -> Option<Self> {
        match target {
            ShipmentStatus::InTransit => Some(Self::Carrier),
            ShipmentStatus::Delivered => Some(Self::Recipient),
            ShipmentStatus::Disputed | ShipmentStatus::Cancelled => Some(Self::Shipper),
            ShipmentStatus::Created => None,
        }
    }

    #[must_use]
    pub fn admits(self, shipment: &Shipment, caller: &Principal) -> bool {
        match self {
            Self::Carrier => shipment.is_carrier(caller),
            Self::Recipient => shipment.is_recipient(caller),
            Self::Shipper => shipment.is_shipper(caller),
        }
    }

    fn rejection(self, shipment: &Shipment, caller: &Principal, target: ShipmentStatus) -> ShipmentError {
        let context = Some(format!("shipment {} -> {target}", shipment.id).into());
        match self {
            Self::Carrier => ShipmentError::NotCarrier {
                message: format!("{caller} is not the assigned carrier").into(),
                context,
            },
            // Delivery by anyone but the recipient reports the generic code.
            Self::Recipient => ShipmentError::Unauthorized {
                message: format!("{caller} is not the recipient").into(),
                context,
            },
            Self::Shipper => ShipmentError::NotShipper {
                message: format!("{caller} is not the shipper").into(),
                context,
            },
        }
    }
}

/// Resolves a raw status code into a status a caller may request.
///
/// Any integer is accepted. Only codes `1..=4` name a requestable status.
///
/// # Errors
/// Returns [`ShipmentError::InvalidStatus`] for unknown codes and for `Created`.
pub fn requested_target(code: i64) -> Result<(ShipmentStatus, Gate), ShipmentError> {
    let invalid = || ShipmentError::InvalidStatus {
        message: format!("status code {code} cannot be requested").into(),
        context: None,
    };

    let target = u8::try_from(code).ok().and_then(ShipmentStatus::from_code).ok_or_else(invalid)?;
    let gate = Gate::for_target(target).ok_or_else(invalid)?;
    Ok((target, gate))
}

/// Decides whether `caller` may move `shipment` to the status encoded by `code`.
///
/// The status code is validated before the caller's role.
///
/// # Errors
/// * [`ShipmentError::InvalidStatus`] when `code` is not a requestable status.
/// * [`ShipmentError::NotCarrier`], [`ShipmentError::Unauthorized`] or
///   [`ShipmentError::NotShipper`] when the caller does not hold the gating role.
pub fn authorize(
    shipment: &Shipment,
    caller: &Principal,
    code: i64,
) -> Result<ShipmentStatus, ShipmentError> {
    let (target, gate) = requested_target(code)?;

    if gate.admits(shipment, caller) {
        Ok(target)
    } else {
        Err(gate.rejection(shipment, caller, target))
    }
}
