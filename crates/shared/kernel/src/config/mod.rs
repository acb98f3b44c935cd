use cflux_domain::config::AppConfig;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Base name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "cargoflux";
/// Prefix of environment overrides (e.g. `CFLUX__REGISTRY__ADMIN`).
pub const ENV_PREFIX: &str = "CFLUX";

/// Custom error type for config loading.
#[cflux_derive::cflux_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Invalid configuration{}: {message}", format_context(.context))]
    Invalid { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// 1. **Base File**: an explicit `path` must exist; without one, `cargoflux.{toml,json,yaml}`
///    in the working directory is used when present.
/// 2. **Environment Overrides**: variables prefixed with `CFLUX__`, nested with `__`
///    (e.g., `CFLUX__LOGGING__LEVEL` maps to `logging.level`).
///
/// # Errors
/// * The explicitly requested file cannot be found or parsed.
/// * The merged values do not match the structure of `T`.
///
/// # Example
/// ```rust
/// use cflux_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let file = match &path {
        Some(p) => {
            info!("Loading config from {}", p.as_ref().display());
            File::from(p.as_ref()).required(true)
        },
        None => {
            info!("Loading optional config '{DEFAULT_CONFIG_NAME}' from the working directory");
            File::with_name(DEFAULT_CONFIG_NAME).required(false)
        },
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX).separator("__").convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

/// Loads the application configuration and checks the values the registry depends on.
///
/// # Errors
/// Returns [`ConfigError::Config`] when loading fails and [`ConfigError::Invalid`] when
/// a required value is missing or out of range.
pub fn load_app_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = load_config(path)?;
    validate(&config)?;
    Ok(config)
}

/// Rejects configurations the registry cannot start from.
///
/// # Errors
/// Returns [`ConfigError::Invalid`] naming the offending key.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.registry.admin.trim().is_empty() {
        return Err(ConfigError::Invalid {
            message: "registry.admin must name the initial administrator".into(),
            context: None,
        });
    }

    if config.registry.event_capacity == 0 {
        return Err(ConfigError::Invalid {
            message: "registry.event_capacity must be greater than zero".into(),
            context: None,
        });
    }

    if config.logging.max_files == 0 {
        return Err(ConfigError::Invalid {
            message: "logging.max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}
