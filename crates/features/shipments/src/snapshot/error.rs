use std::borrow::Cow;

/// Failures while exporting, persisting or restoring registry state.
#[cflux_derive::cflux_error]
pub enum SnapshotError {
    /// The snapshot violates a registry invariant.
    #[error("Invalid snapshot{}: {message}", format_context(.context))]
    Invalid { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Snapshot I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Binary snapshot encoding error{}: {source}", format_context(.context))]
    Postcard { source: postcard::Error, context: Option<Cow<'static, str>> },

    #[error("JSON snapshot encoding error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },
}
