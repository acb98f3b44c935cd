use cflux_domain::{Principal, ShipmentId, ShipmentStatus};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

const MIN_CAPACITY: usize = 1;

/// A state change committed by the registry.
///
/// Events are published in commit order; rejected operations publish nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ShipmentEvent {
    #[serde(rename_all = "camelCase")]
    AdminTransferred { previous: Principal, current: Principal },

    #[serde(rename_all = "camelCase")]
    ShipmentCreated { id: ShipmentId, shipper: Principal, recipient: Principal },

    #[serde(rename_all = "camelCase")]
    CarrierAssigned { id: ShipmentId, carrier: Principal, replaced: Option<Principal> },

    #[serde(rename_all = "camelCase")]
    StatusChanged { id: ShipmentId, by: Principal, previous: ShipmentStatus, current: ShipmentStatus },
}

impl ShipmentEvent {
    /// The shipment this event refers to, if any.
    #[must_use]
    pub const fn shipment_id(&self) -> Option<ShipmentId> {
        match self {
            Self::AdminTransferred { .. } => None,
            Self::ShipmentCreated { id, .. }
            | Self::CarrierAssigned { id, .. }
            | Self::StatusChanged { id, .. } => Some(*id),
        }
    }
}

/// Fan-out journal of committed [`ShipmentEvent`]s.
///
/// Slow subscribers observe `RecvError::Lagged` once they fall `capacity` events behind.
#[derive(Debug)]
pub(crate) struct EventJournal {
    sender: broadcast::Sender<Arc<ShipmentEvent>>,
}

impl EventJournal {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(MIN_CAPACITY));
        Self { sender }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<Arc<ShipmentEvent>> {
        self.sender.subscribe()
    }

    /// Returns the number of subscribers that received the event.
    pub(crate) fn publish(&self, event: ShipmentEvent) -> usize {
        if let Ok(receivers) = self.sender.send(Arc::new(event)) {
            receivers
        } else {
            trace!("Shipment event dropped: no subscribers");
            0
        }
    }
}
