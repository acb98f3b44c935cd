//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it re-exports the domain and owns configuration loading.
//!
//! ## Config loading
//! ```rust,ignore
//! use cflux_kernel::config::load_app_config;
//!
//! let cfg = load_app_config(Some(std::path::Path::new("cargoflux.toml"))).unwrap();
//! println!("admin = {}", cfg.registry.admin);
//! ```
pub mod config;

pub use cflux_domain as domain;
