use std::borrow::Cow;

/// Caller-facing outcome of a rejected registry operation.
///
/// The numeric codes are part of the wire contract and must stay stable.
#[cflux_derive::cflux_error]
pub enum ShipmentError {
    /// Caller is not the administrator, or not the recipient on delivery.
    #[code(100)]
    #[error("Unauthorized{}: {message}", format_context(.context))]
    Unauthorized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The referenced shipment id does not exist.
    #[code(101)]
    #[error("Shipment not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The requested status is not a reachable target.
    #[code(102)]
    #[error("Invalid status{}: {message}", format_context(.context))]
    InvalidStatus { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[code(103)]
    #[error("Caller is not the shipper{}: {message}", format_context(.context))]
    NotShipper { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[code(104)]
    #[error("Caller is not the carrier{}: {message}", format_context(.context))]
    NotCarrier { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Every shipment id has been issued. Only reachable from a restored snapshot.
    #[code(105)]
    #[error("Shipment ids exhausted{}: {message}", format_context(.context))]
    IdsExhausted { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
