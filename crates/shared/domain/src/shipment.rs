use crate::roles::Roles;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of an authenticated actor.
///
/// Opaque: the only operation that carries meaning is equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Principal {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Principal {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&Self> for Principal {
    fn from(value: &Self) -> Self {
        value.clone()
    }
}

impl AsRef<str> for Principal {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Principal {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Principal {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sequential shipment identifier. The first issued id is `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipmentId(u64);

impl ShipmentId {
    pub const FIRST: Self = Self(1);
    /// Exclusive bound of the id counter. Never issued and never stored as the next id.
    pub const CEILING: Self = Self(u64::MAX);

    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The following id, or `None` once the counter would reach [`Self::CEILING`].
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) if next < Self::CEILING.0 => Some(Self(next)),
            _ => None,
        }
    }
}

impl From<u64> for ShipmentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ShipmentId> for u64 {
    fn from(value: ShipmentId) -> Self {
        value.0
    }
}

impl fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle stage of a shipment.
///
/// The discriminants are the wire codes and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ShipmentStatus {
    Created = 0,
    InTransit = 1,
    Delivered = 2,
    Disputed = 3,
    Cancelled = 4,
}

impl ShipmentStatus {
    pub const ALL: [Self; 5] =
        [Self::Created, Self::InTransit, Self::Delivered, Self::Disputed, Self::Cancelled];

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Created),
            1 => Some(Self::InTransit),
            2 => Some(Self::Delivered),
            3 => Some(Self::Disputed),
            4 => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl TryFrom<u8> for ShipmentStatus {
    /// The rejected code.
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}

impl From<ShipmentStatus> for u8 {
    fn from(value: ShipmentStatus) -> Self {
        value.code()
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::InTransit => write!(f, "InTransit"),
            Self::Delivered => write!(f, "Delivered"),
            Self::Disputed => write!(f, "Disputed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl Serialize for ShipmentStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for ShipmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = u8::deserialize(deserializer)?;
        Self::from_code(code).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown shipment status code {code}"))
        })
    }
}

/// A tracked shipment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Shipment {
    pub id: ShipmentId,
    /// Creator of the shipment; fixed at creation.
    pub shipper: Principal,
    /// Absent until an administrator assigns one. Never cleared afterwards.
    pub carrier: Option<Principal>,
    /// Fixed at creation.
    pub recipient: Principal,
    pub status: ShipmentStatus,
    /// Opaque document reference, never interpreted here.
    pub metadata_hash: String,
}

impl Shipment {
    /// A fresh record in the `Created` state with no carrier.
    pub fn new(
        id: ShipmentId,
        shipper: Principal,
        recipient: Principal,
        metadata_hash: impl Into<String>,
    ) -> Self {
        Self {
            id,
            shipper,
            carrier: None,
            recipient,
            status: ShipmentStatus::Created,
            metadata_hash: metadata_hash.into(),
        }
    }

    /// An unassigned carrier matches nobody.
    #[must_use]
    pub fn is_carrier(&self, principal: &Principal) -> bool {
        self.carrier.as_ref() == Some(principal)
    }

    #[must_use]
    pub fn is_shipper(&self, principal: &Principal) -> bool {
        &self.shipper == principal
    }

    #[must_use]
    pub fn is_recipient(&self, principal: &Principal) -> bool {
        &self.recipient == principal
    }

    /// Shipment-scoped roles held by `principal`. Never includes [`Roles::ADMIN`].
    #[must_use]
    pub fn roles_of(&self, principal: &Principal) -> Roles {
        let mut roles = Roles::empty();
        roles.set(Roles::SHIPPER, self.is_shipper(principal));
        roles.set(Roles::CARRIER, self.is_carrier(principal));
        roles.set(Roles::RECIPIENT, self.is_recipient(principal));
        roles
    }
}
