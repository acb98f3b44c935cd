use crate::error::ShipmentError;
use crate::events::{EventJournal, ShipmentEvent};
use crate::policy;
use crate::snapshot::{RegistrySnapshot, SnapshotError};
use cflux_domain::{Principal, Roles, Shipment, ShipmentId, ShipmentStatus};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Default buffer of the event journal.
pub const DEFAULT_EVENT_CAPACITY: usize = 128;

#[derive(Debug)]
struct RegistryState {
    admin: Principal,
    shipments: FxHashMap<ShipmentId, Shipment>,
    next_id: ShipmentId,
}

impl RegistryState {
    fn lookup_mut(&mut self, id: ShipmentId) -> Result<&mut Shipment, ShipmentError> {
        self.shipments.get_mut(&id).ok_or_else(|| not_found(id))
    }

    fn ensure_admin(&self, caller: &Principal) -> Result<(), ShipmentError> {
        if &self.admin == caller {
            Ok(())
        } else {
            Err(ShipmentError::Unauthorized {
                message: format!("{caller} is not the administrator").into(),
                context: None,
            })
        }
    }
}

/// Owner of every shipment record and of the administrator identity.
///
/// Clones are cheap and share state. Mutations hold the write lock across their
/// checks, the change itself and the event publication, so each call is atomic
/// and a rejected call leaves the registry untouched.
#[cflux_derive::cflux_slice]
pub struct ShipmentRegistry {
    state: RwLock<RegistryState>,
    journal: EventJournal,
}

impl ShipmentRegistry {
    /// An empty registry administered by `admin`.
    pub fn with_admin(admin: impl Into<Principal>) -> Self {
        Self::with_capacity(admin, DEFAULT_EVENT_CAPACITY)
    }

    /// An empty registry whose event journal buffers `capacity` events (at least one).
    pub fn with_capacity(admin: impl Into<Principal>, capacity: usize) -> Self {
        let state = RegistryState {
            admin: admin.into(),
            shipments: FxHashMap::default(),
            next_id: ShipmentId::FIRST,
        };
        Self::from_state(state, capacity)
    }

    fn from_state(state: RegistryState, capacity: usize) -> Self {
        Self::new(ShipmentRegistryInner {
            state: RwLock::new(state),
            journal: EventJournal::new(capacity),
        })
    }

    /// Rebuilds a registry from a snapshot after checking its invariants.
    ///
    /// # Errors
    /// Returns [`SnapshotError::Invalid`] if the snapshot violates an id invariant.
    pub fn restore(snapshot: RegistrySnapshot, capacity: usize) -> Result<Self, SnapshotError> {
        snapshot.validate()?;

        let RegistrySnapshot { admin, next_id, shipments } = snapshot;
        let shipments: FxHashMap<_, _> = shipments.into_iter().map(|s| (s.id, s)).collect();

        info!(admin = %admin, next_id = %next_id, shipments = shipments.len(), "Registry restored");
        Ok(Self::from_state(RegistryState { admin, shipments, next_id }, capacity))
    }

    /// Exports the current state with shipments ordered by id.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.read();
        let mut shipments: Vec<Shipment> = state.shipments.values().cloned().collect();
        shipments.sort_unstable_by_key(|s| s.id);

        RegistrySnapshot { admin: state.admin.clone(), next_id: state.next_id, shipments }
    }

    /// Receives every event committed after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ShipmentEvent>> {
        self.journal.subscribe()
    }

    #[must_use]
    pub fn admin(&self) -> Principal {
        self.state.read().admin.clone()
    }

    #[must_use]
    pub fn is_admin(&self, principal: &Principal) -> bool {
        &self.state.read().admin == principal
    }

    /// Number of stored shipments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().shipments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().shipments.is_empty()
    }

    /// Hands administration to `new_admin`. Any value is accepted, including the
    /// current administrator.
    ///
    /// # Errors
    /// Returns [`ShipmentError::Unauthorized`] when `caller` is not the administrator.
    pub fn transfer_admin(
        &self,
        caller: &Principal,
        new_admin: impl Into<Principal>,
    ) -> Result<bool, ShipmentError> {
        let new_admin = new_admin.into();
        let mut state = self.state.write();

        state.ensure_admin(caller).map_err(|e| rejected("transfer_admin", caller, e))?;

        let previous = std::mem::replace(&mut state.admin, new_admin.clone());
        info!(previous = %previous, current = %new_admin, "Administration transferred");

        self.journal.publish(ShipmentEvent::AdminTransferred { previous, current: new_admin });
        Ok(true)
    }

    /// Registers a shipment sent by `caller`. Anyone may create shipments.
    ///
    /// Ids are issued sequentially starting at [`ShipmentId::FIRST`] and never reused.
    ///
    /// # Errors
    /// Returns [`ShipmentError::IdsExhausted`] once the counter is one step below
    /// [`ShipmentId::CEILING`]. Only a restored snapshot can get there.
    pub fn create_shipment(
        &self,
        caller: &Principal,
        recipient: impl Into<Principal>,
        metadata_hash: impl Into<String>,
    ) -> Result<ShipmentId, ShipmentError> {
        let recipient = recipient.into();
        let mut state = self.state.write();

        let id = state.next_id;
        let next = id.successor().ok_or_else(|| {
            rejected("create_shipment", caller, ShipmentError::IdsExhausted {
                message: format!("no id left after {id}").into(),
                context: None,
            })
        })?;

        state.next_id = next;
        state.shipments.insert(id, Shipment::new(id, caller.clone(), recipient.clone(), metadata_hash));

        info!(shipment_id = %id, caller = %caller, recipient = %recipient, "Shipment created");

        self.journal.publish(ShipmentEvent::ShipmentCreated { id, shipper: caller.clone(), recipient });
        Ok(id)
    }

    /// Sets or replaces the carrier of a shipment, whatever its status.
    ///
    /// # Errors
    /// * [`ShipmentError::Unauthorized`] when `caller` is not the administrator.
    /// * [`ShipmentError::NotFound`] when `id` is unknown.
    pub fn assign_carrier(
        &self,
        caller: &Principal,
        id: ShipmentId,
        carrier: impl Into<Principal>,
    ) -> Result<bool, ShipmentError> {
        let carrier = carrier.into();
        let mut state = self.state.write();

        state.ensure_admin(caller).map_err(|e| rejected("assign_carrier", caller, e))?;
        let shipment = state.lookup_mut(id).map_err(|e| rejected("assign_carrier", caller, e))?;

        let replaced = shipment.carrier.replace(carrier.clone());
        info!(shipment_id = %id, carrier = %carrier, reassigned = replaced.is_some(), "Carrier assigned");

        self.journal.publish(ShipmentEvent::CarrierAssigned { id, carrier, replaced });
        Ok(true)
    }

    /// Moves a shipment to the status with wire code `code`.
    ///
    /// The shipment must exist; then the code must name a requestable status;
    /// then `caller` must hold the role gating that status.
    ///
    /// # Errors
    /// * [`ShipmentError::NotFound`] when `id` is unknown.
    /// * [`ShipmentError::InvalidStatus`] for `Created` and unknown codes.
    /// * [`ShipmentError::NotCarrier`], [`ShipmentError::Unauthorized`] or
    ///   [`ShipmentError::NotShipper`] when the caller lacks the gating role.
    pub fn update_status(
        &self,
        caller: &Principal,
        id: ShipmentId,
        code: i64,
    ) -> Result<bool, ShipmentError> {
        let mut state = self.state.write();

        let shipment = state.lookup_mut(id).map_err(|e| rejected("update_status", caller, e))?;
        let target = policy::authorize(shipment, caller, code)
            .map_err(|e| rejected("update_status", caller, e))?;

        let previous = std::mem::replace(&mut shipment.status, target);
        info!(shipment_id = %id, caller = %caller, from = %previous, status = %target, "Status changed");

        self.journal.publish(ShipmentEvent::StatusChanged {
            id,
            by: caller.clone(),
            previous,
            current: target,
        });
        Ok(true)
    }

    /// Typed form of [`ShipmentRegistry::update_status`].
    ///
    /// # Errors
    /// Same as [`ShipmentRegistry::update_status`].
    pub fn transition(
        &self,
        caller: &Principal,
        id: ShipmentId,
        target: ShipmentStatus,
    ) -> Result<bool, ShipmentError> {
        self.update_status(caller, id, i64::from(target.code()))
    }

    #[must_use]
    pub fn get_shipment(&self, id: ShipmentId) -> Option<Shipment> {
        self.state.read().shipments.get(&id).cloned()
    }

    #[must_use]
    pub fn get_status(&self, id: ShipmentId) -> Option<ShipmentStatus> {
        self.state.read().shipments.get(&id).map(|s| s.status)
    }

    /// Roles `principal` holds with respect to shipment `id`, including
    /// [`Roles::ADMIN`] for the administrator. `None` when `id` is unknown.
    #[must_use]
    pub fn roles(&self, principal: &Principal, id: ShipmentId) -> Option<Roles> {
        let state = self.state.read();
        let shipment = state.shipments.get(&id)?;

        let mut roles = shipment.roles_of(principal);
        roles.set(Roles::ADMIN, &state.admin == principal);
        Some(roles)
    }
}

fn not_found(id: ShipmentId) -> ShipmentError {
    ShipmentError::NotFound { message: format!("shipment {id}").into(), context: None }
}

fn rejected(operation: &'static str, caller: &Principal, err: ShipmentError) -> ShipmentError {
    warn!(operation, caller = %caller, code = err.code(), "{err}");
    err
}
