use modkit_domain::config::{AppConfig, LogRotation, LoggingConfig, ModulesConfig};
use serde_json::json;
use std::path::PathBuf;

#[test]
fn config_defaults_are_sane() {
    let modules = ModulesConfig::default();
    assert_eq!(modules.base_path, PathBuf::from("app/Modules"));
    assert_eq!(modules.root_namespace, "App");
    assert_eq!(modules.route_file, "web.toml");
    assert!(modules.modules.is_empty());

    let logging = LoggingConfig::default();
    assert!(logging.console);
    assert_eq!(logging.level, "info");
    assert_eq!(logging.rotation, LogRotation::Daily);
}

#[test]
fn app_config_deserializes() {
    let raw = json!({
        "modules": { "base_path": "src/Modules", "modules": ["Billing", "Shipping"] },
        "logging": { "level": "debug", "rotation": "hourly", "json": true }
    });

    let cfg: AppConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.modules.base_path, PathBuf::from("src/Modules"));
    assert_eq!(cfg.modules.modules, vec!["Billing".to_owned(), "Shipping".to_owned()]);
    assert_eq!(cfg.modules.root_namespace, "App");
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.logging.rotation, LogRotation::Hourly);
    assert!(cfg.logging.json);
}

#[test]
fn clones_share_until_mutated() {
    let original = AppConfig::default();
    let mut copy = original.clone();
    copy.modules.modules.push("Billing".to_owned());

    assert!(original.modules.modules.is_empty());
    assert_eq!(copy.modules.modules.len(), 1);
}
