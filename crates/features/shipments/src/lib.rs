//! # Shipments
//!
//! The shipment registry: records, the administrator identity and the
//! role-gated status state machine.
//!
//! | target status | allowed caller | rejection |
//! |---|---|---|
//! | `InTransit` | assigned carrier | `NotCarrier` (104) |
//! | `Delivered` | recipient | `Unauthorized` (100) |
//! | `Disputed`, `Cancelled` | shipper | `NotShipper` (103) |
//! | `Created`, unknown codes | nobody | `InvalidStatus` (102) |
//!
//! Transitions are not ordered: an authorized caller may request any target from
//! any current status.
//!
//! ## Example
//!
//! ```rust
//! use cflux_shipments::{ShipmentRegistry, ShipmentStatus};
//!
//! let registry = ShipmentRegistry::with_admin("admin");
//! let id = registry.create_shipment(&"shipper".into(), "recipient", "doc-hash").unwrap();
//!
//! registry.assign_carrier(&"admin".into(), id, "carrier").unwrap();
//! registry.transition(&"carrier".into(), id, ShipmentStatus::InTransit).unwrap();
//! assert_eq!(registry.get_status(id), Some(ShipmentStatus::InTransit));
//! ```

mod error;
mod events;
pub mod policy;
mod registry;
pub mod snapshot;

pub use crate::error::{ShipmentError, ShipmentErrorExt};
pub use crate::events::ShipmentEvent;
pub use crate::registry::{DEFAULT_EVENT_CAPACITY, ShipmentRegistry, ShipmentRegistryInner};
pub use crate::snapshot::{RegistrySnapshot, SnapshotError, SnapshotErrorExt, SnapshotFormat};
pub use cflux_domain::{Principal, Roles, Shipment, ShipmentId, ShipmentStatus};

use cflux_domain::config::RegistryConfig;
use tracing::info;

/// Builds the registry described by the `[registry]` configuration section.
///
/// An existing snapshot file takes precedence over the configured administrator;
/// otherwise the registry starts empty.
///
/// # Errors
/// Returns a [`SnapshotError`] when the configured snapshot exists but cannot be
/// read, decoded or validated.
pub fn init(config: &RegistryConfig) -> Result<ShipmentRegistry, SnapshotError> {
    if let Some(path) = config.snapshot.as_deref().filter(|p| p.exists()) {
        let snapshot = RegistrySnapshot::load(path)?;
        return ShipmentRegistry::restore(snapshot, config.event_capacity)
            .context(format!("Snapshot {}", path.display()));
    }

    info!(admin = %config.admin, "Starting with an empty registry");
    Ok(ShipmentRegistry::with_capacity(config.admin.as_str(), config.event_capacity))
}
