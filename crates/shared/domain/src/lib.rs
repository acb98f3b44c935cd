//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: data and simple helpers only, no I/O.

pub mod config;
pub mod roles;
pub mod shipment;

pub use roles::Roles;
pub use shipment::{Principal, Shipment, ShipmentId, ShipmentStatus};
