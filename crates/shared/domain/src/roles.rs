use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Parties a principal acts as, relative to one shipment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub struct Roles: u8 {
        const ADMIN = 1 << 0;
        const SHIPPER = 1 << 1;
        const CARRIER = 1 << 2;
        const RECIPIENT = 1 << 3;
    }
}
