//! # Logger
//!
//! Console and file logging for the `CargoFlux` binaries, built on `tracing-subscriber`
//! with rotating, non-blocking file output and environment-based filtering.
//!
//! * Use [`LoggerBuilder::env_filter`] to set module-directed filters
//!   (e.g., `"cflux_shipments=debug"`), in addition to `RUST_LOG`.
//! * [`Logger::from_config`] builds the subscriber from the `[logging]` config section.
//!
//! ## Example
//!
//! ```rust
//! # use cflux_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("my-app")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use cflux_domain::config::LoggingConfig;
use private::Sealed;
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug)]
struct Settings {
    console: bool,
    directory: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            console: true,
            directory: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}

/// A builder for configuring and initializing the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName> {
    settings: Settings,
    name: N,
}

impl LoggerBuilder<NoName> {
    /// Sets the name of the logger, used as the log file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { settings: self.settings, name: WithName(name.into()) }
    }
}

impl LoggerBuilder<WithName> {
    /// Configures the minimum log level to be emitted.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    /// Adds an explicit env filter (e.g., `cflux_shipments=debug`).
    ///
    /// `RUST_LOG` is ignored once a programmatic filter is set.
    /// Invalid filters will cause [`LoggerBuilder::init`] to return an error.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.settings.env_filter = Some(filter.into());
        self
    }

    /// Enables console logging. Console output goes to stderr.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }

    /// Writes rolling log files into `directory`.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.settings.directory = Some(directory.into());
        self
    }

    /// Configures maximum number of log files to keep.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.settings.max_files = max;
        self
    }

    /// Configures the log file rotation strategy.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.settings.rotation = rotation;
        self
    }

    /// Writes JSON lines to the log files.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.settings.json = enabled;
        self
    }

    /// Consumes the builder and initializes the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle. **Note:** This handle contains a [`WorkerGuard`]
    /// that must be kept alive for the duration of the program to ensure
    /// that non-blocking logs are flushed correctly.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already been set.
    /// Returns [`LoggerError::InvalidConfiguration`] for invalid builder settings.
    pub fn init(self) -> Result<Logger, LoggerError> {
        validate(&self.settings, &self.name.0)?;

        let env_filter = build_env_filter(&self.settings)?;

        let mut layers = Vec::new();

        if self.settings.console {
            layers.push(layer().compact().with_writer(std::io::stderr).with_ansi(true).boxed());
        }

        let guard = if let Some(directory) = self.settings.directory {
            fs::create_dir_all(&directory)
                .context(format!("Failed to create log directory: {}", directory.display()))?;

            let appender = RollingFileAppender::builder()
                .rotation(self.settings.rotation)
                .filename_prefix(&self.name.0)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(self.settings.max_files)
                .build(directory)?;

            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = layer().with_writer(writer).with_ansi(false);

            layers.push(if self.settings.json { file_layer.json().boxed() } else { file_layer.boxed() });
            Some(guard)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

/// A handle to the initialized logging system.
///
/// Holds the background file writer guard; drop it only at shutdown.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`] to configure the global tracing subscriber.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { settings: Settings::default(), name: NoName }
    }

    /// Builds and installs the subscriber described by a [`LoggingConfig`].
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for an unknown level or filter and
    /// the same errors as [`LoggerBuilder::init`] otherwise.
    pub fn from_config(name: &str, config: &LoggingConfig) -> Result<Self, LoggerError> {
        let level = parse_level(&config.level)?;

        let mut builder = Self::builder()
            .name(name)
            .level(level)
            .console(config.console)
            .json(config.json)
            .max_files(config.max_files);

        if let Some(directory) = &config.directory {
            builder = builder.directory(directory);
        }
        if let Some(filter) = &config.filter {
            builder = builder.env_filter(filter);
        }

        builder.init()
    }

    /// Returns a reference to the underlying worker guard, if present.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    level.trim().parse::<LevelFilter>().map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("Unknown log level '{level}': {e}").into(),
        context: None,
    })
}

fn validate(settings: &Settings, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if settings.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn build_env_filter(settings: &Settings) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(settings.level.into());
    settings.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_builder_initial_state() {
        let builder = Logger::builder().name("test-app").env_filter("cflux=debug");
        assert!(builder.settings.console);
        assert_eq!(builder.settings.level, LevelFilter::INFO);
        assert_eq!(builder.settings.env_filter.as_deref(), Some("cflux=debug"));
        assert!(builder.settings.directory.is_none());
        assert_eq!(builder.settings.max_files, DEFAULT_MAX_FILES);
    }

    #[test]
    fn test_logger_builder_configuration() {
        let builder = Logger::builder()
            .name("test-app")
            .directory("/tmp/cflux-logs")
            .max_files(5)
            .json(true)
            .level(LevelFilter::DEBUG);

        assert_eq!(builder.settings.level, LevelFilter::DEBUG);
        assert_eq!(builder.settings.max_files, 5);
        assert!(builder.settings.json);
        assert_eq!(
            builder.settings.directory.as_deref(),
            Some(std::path::Path::new("/tmp/cflux-logs"))
        );
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level(" WARN ").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::OFF);
        assert!(matches!(parse_level("loud"), Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_validation_rejects_empty_name_and_zero_files() {
        let settings = Settings::default();
        assert!(validate(&settings, "  ").is_err());

        let settings = Settings { max_files: 0, ..Settings::default() };
        assert!(validate(&settings, "app").is_err());
    }

    #[test]
    fn test_invalid_env_filter_is_reported() {
        let settings = Settings { env_filter: Some("cflux=notalevel".to_owned()), ..Settings::default() };
        assert!(matches!(
            build_env_filter(&settings),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }
}
