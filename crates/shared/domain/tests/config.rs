use cflux_domain::config::{AppConfig, LoggingConfig, RegistryConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let registry = RegistryConfig::default();
    assert!(registry.admin.is_empty(), "admin must be configured explicitly");
    assert_eq!(registry.event_capacity, 128);
    assert!(registry.snapshot.is_none());

    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.console);
    assert!(!logging.json);
    assert_eq!(logging.max_files, 10);
}

#[test]
fn app_config_deserializes() {
    let raw = json!({
        "registry": { "admin": "ST1ADMIN", "event_capacity": 16, "snapshot": "/tmp/registry.bin" },
        "logging": { "level": "debug", "json": true }
    });

    let cfg: AppConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.registry.admin, "ST1ADMIN");
    assert_eq!(cfg.registry.event_capacity, 16);
    assert_eq!(cfg.registry.snapshot, Some(std::path::PathBuf::from("/tmp/registry.bin")));
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.json);
    assert!(cfg.logging.console, "unspecified fields keep their defaults");
}

#[test]
fn app_config_deref_mut_copies_on_write() {
    let original = AppConfig::default();
    let mut edited = original.clone();
    edited.registry.admin = "ST1NEWADMIN".to_owned();

    assert!(original.registry.admin.is_empty());
    assert_eq!(edited.registry.admin, "ST1NEWADMIN");
}
