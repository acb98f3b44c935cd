use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared across the workspace.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub registry: RegistryConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Shipment registry bootstrap settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Initial administrator. Has no default and must be provided.
    pub admin: String,
    /// Buffer size of the shipment event journal.
    pub event_capacity: usize,
    /// Optional snapshot file, loaded on start and rewritten after each mutation.
    pub snapshot: Option<PathBuf>,
}

/// Logging sink settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn`, `error` or `off`.
    pub level: String,
    pub console: bool,
    /// Write JSON lines to the log files instead of plain text.
    pub json: bool,
    pub directory: Option<PathBuf>,
    pub max_files: usize,
    /// Module directives such as `cflux_shipments=debug`.
    pub filter: Option<String>,
}

// --- Default ---

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { admin: String::new(), event_capacity: 128, snapshot: None }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            console: true,
            json: false,
            directory: None,
            max_files: 10,
            filter: None,
        }
    }
}
