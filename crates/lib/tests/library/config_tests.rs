use std::path::PathBuf;

use saltsolo_lib::config::{LogLevel, SaltInstall};
use saltsolo_lib::{Config, ConfigError, InstanceInfo, RawConfig, SaltSolo};

use super::common::{fixture_path, fixtures_root, instance};

#[test]
fn kitchen_yml_provisioner_block_resolves() {
  let raw = RawConfig::load(&fixture_path("kitchen.yml")).unwrap();
  let salt = SaltSolo::new(raw, &instance()).unwrap();
  let config = salt.config();

  assert_eq!(config.formula, "test_formula");
  assert_eq!(config.salt_version.as_str(), "2016.03.1");
  assert_eq!(config.log_level, Some(LogLevel::Info));
  assert_eq!(config.vendor_path, Some(PathBuf::from("vendor-path")));
  assert!(config.pillars.as_ref().unwrap().contains_key("top.sls"));
  assert!(config.pillars_from_files.as_ref().unwrap().contains_key("test_pillar.sls"));
}

#[test]
fn defaults_are_applied() {
  let raw = RawConfig {
    formula: Some("test_formula".to_string()),
    ..Default::default()
  };
  let config = SaltSolo::new(raw, &instance()).unwrap().config().clone();

  assert!(config.salt_version.is_latest());
  assert!(config.salt_run_highstate);
  assert!(!config.state_collection);
  assert!(!config.state_top_from_file);
  assert_eq!(config.salt_install, SaltInstall::Bootstrap);
  assert_eq!(config.root_path, "/tmp/kitchen");
  assert!(config.sudo);
  assert!(config.require_chef);
  assert_eq!(config.kitchen_root, fixtures_root());
  assert_eq!(config.instance_name, "coolbeans");
  assert_eq!(config.suite_name, "fries");
}

#[test]
fn missing_formula_is_rejected() {
  let err = SaltSolo::new(RawConfig::default(), &instance()).unwrap_err();
  assert!(matches!(err, ConfigError::MissingFormula));
  assert!(err.is_user_error());
}

#[test]
fn formula_without_directory_is_rejected() {
  let raw = RawConfig {
    formula: Some("not_a_formula".to_string()),
    ..Default::default()
  };
  let err = SaltSolo::new(raw, &instance()).unwrap_err();
  assert!(err.to_string().contains("not_a_formula"), "{err}");
}

#[test]
fn unknown_option_is_rejected() {
  let err = RawConfig::from_yaml_str("formula: test_formula\nsalt_verison: latest\n").unwrap_err();
  assert!(err.to_string().contains("salt_verison"), "{err}");
}

#[test]
fn windows_platform_is_rejected() {
  let raw = RawConfig {
    formula: Some("test_formula".to_string()),
    ..Default::default()
  };
  let instance = InstanceInfo::new("win", "default", fixtures_root()).with_os_type("windows");
  let err = Config::resolve(raw, &instance, &saltsolo_lib::fs::DiskFs).unwrap_err();
  assert!(matches!(err, ConfigError::UnsupportedPlatform { .. }));
}

#[test]
fn resolving_twice_is_deterministic() {
  let raw = RawConfig::load(&fixture_path("kitchen.yml")).unwrap();
  let a = Config::resolve(raw.clone(), &instance(), &saltsolo_lib::fs::DiskFs).unwrap();
  let b = Config::resolve(raw, &instance(), &saltsolo_lib::fs::DiskFs).unwrap();
  assert_eq!(a, b);
}
