use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use saltsolo_lib::RawConfig;
use saltsolo_lib::config::Dependency;
use saltsolo_lib::consts::{DEFAULT_BOOTSTRAP_URL, SALT_CALL_OUTPUT};

use super::common::{files_under, fixture_path, provisioner};

// =============================================================================
// Sandbox
// =============================================================================

#[test]
fn minimal_sandbox_holds_minion_config_formula_and_top() {
  let mut salt = provisioner(RawConfig::default());
  let sandbox = salt.create_sandbox().unwrap().to_path_buf();

  assert_eq!(
    files_under(&sandbox),
    vec!["etc/salt/minion", "srv/salt/test_formula/init.sls", "srv/salt/top.sls"]
  );
  assert!(!sandbox.join("srv/pillar").exists());
  assert!(!sandbox.join("etc/salt/grains").exists());

  salt.cleanup_sandbox().unwrap();
}

#[test]
fn grains_file_written_when_configured() {
  let grains = serde_yaml::from_str("roles:\n  - web\n").unwrap();
  let mut salt = provisioner(RawConfig {
    grains: Some(grains),
    ..Default::default()
  });
  let sandbox = salt.create_sandbox().unwrap().to_path_buf();

  let content = fs::read_to_string(sandbox.join("etc/salt/grains")).unwrap();
  assert!(content.contains("web"), "{content}");

  salt.cleanup_sandbox().unwrap();
}

#[test]
fn vendor_path_relative_to_kitchen_root() {
  let mut salt = provisioner(RawConfig {
    vendor_path: Some(PathBuf::from("vendor-path")),
    ..Default::default()
  });
  let sandbox = salt.create_sandbox().unwrap().to_path_buf();

  assert!(sandbox.join("srv/salt/foo/init.sls").is_file());
  assert!(sandbox.join("srv/salt/bar/init.sls").is_file());

  salt.cleanup_sandbox().unwrap();
}

#[test]
fn vendor_path_absolute() {
  let mut salt = provisioner(RawConfig {
    vendor_path: Some(fixture_path("vendor-path")),
    ..Default::default()
  });
  let sandbox = salt.create_sandbox().unwrap().to_path_buf();

  assert!(sandbox.join("srv/salt/foo/init.sls").is_file());
  assert!(sandbox.join("srv/salt/bar/init.sls").is_file());

  salt.cleanup_sandbox().unwrap();
}

#[test]
fn vendor_path_missing_is_user_error() {
  let mut salt = provisioner(RawConfig {
    vendor_path: Some(PathBuf::from("path/to/nowhere/that/should/exist")),
    ..Default::default()
  });

  let err = salt.create_sandbox().unwrap_err();
  assert!(err.is_user_error());
  assert!(err.to_string().contains("path/to/nowhere/that/should/exist"), "{err}");

  salt.cleanup_sandbox().unwrap();
}

#[test]
fn dependency_states_and_extensions_are_copied() {
  let mut salt = provisioner(RawConfig {
    dependencies: Some(vec![Dependency {
      name: "foo".to_string(),
      path: PathBuf::from("formula-foo"),
    }]),
    ..Default::default()
  });
  let sandbox = salt.create_sandbox().unwrap().to_path_buf();

  assert!(sandbox.join("srv/salt/foo/init.sls").is_file());
  assert!(sandbox.join("srv/salt/_states/foo.py").is_file());

  salt.cleanup_sandbox().unwrap();
}

#[test]
fn data_path_is_copied() {
  let mut salt = provisioner(RawConfig {
    data_path: Some(PathBuf::from("data-path")),
    ..Default::default()
  });
  let sandbox = salt.create_sandbox().unwrap().to_path_buf();

  assert_eq!(fs::read_to_string(sandbox.join("data/foo.txt")).unwrap(), "foo\n");

  salt.cleanup_sandbox().unwrap();
}

#[test]
fn pillars_and_pillar_files_together() {
  let pillars = serde_yaml::from_str("top.sls:\n  base:\n    '*':\n      - test_pillar\n").unwrap();
  let mut files = BTreeMap::new();
  files.insert("test_pillar.sls".to_string(), PathBuf::from("test_pillar.sls"));

  let mut salt = provisioner(RawConfig {
    pillars: Some(pillars),
    pillars_from_files: Some(files),
    ..Default::default()
  });
  let sandbox = salt.create_sandbox().unwrap().to_path_buf();

  assert!(sandbox.join("srv/pillar/top.sls").is_file());
  assert_eq!(
    fs::read_to_string(sandbox.join("srv/pillar/test_pillar.sls")).unwrap(),
    fs::read_to_string(fixture_path("test_pillar.sls")).unwrap()
  );

  salt.cleanup_sandbox().unwrap();
}

#[test]
fn state_top_from_file_copies_kitchen_top() {
  let mut salt = provisioner(RawConfig {
    state_top_from_file: Some(true),
    ..Default::default()
  });
  let sandbox = salt.create_sandbox().unwrap().to_path_buf();

  let written = fs::read_to_string(sandbox.join("srv/salt/top.sls")).unwrap();
  assert_eq!(written, fs::read_to_string(fixture_path("top.sls")).unwrap());
  assert!(written.contains("# test state_top_from_file"));

  salt.cleanup_sandbox().unwrap();
}

#[test]
fn minion_config_points_at_root_path() {
  let mut salt = provisioner(RawConfig {
    root_path: Some("/var/kitchen".to_string()),
    ..Default::default()
  });
  let sandbox = salt.create_sandbox().unwrap().to_path_buf();

  let minion: serde_yaml::Value =
    serde_yaml::from_str(&fs::read_to_string(sandbox.join("etc/salt/minion")).unwrap()).unwrap();
  assert_eq!(minion["id"].as_str(), Some("coolbeans"));
  assert_eq!(minion["file_roots"]["base"][0].as_str(), Some("/var/kitchen/srv/salt"));
  assert_eq!(minion["pillar_roots"]["base"][0].as_str(), Some("/var/kitchen/srv/pillar"));

  salt.cleanup_sandbox().unwrap();
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn install_command_pins_only_non_latest() {
  let latest = provisioner(RawConfig::default()).install_command();
  assert!(latest.contains(DEFAULT_BOOTSTRAP_URL));
  assert!(!latest.contains("-P git"));

  let pinned = provisioner(RawConfig {
    salt_version: Some("2015.8.8".to_string()),
    ..Default::default()
  })
  .install_command();
  assert!(pinned.contains(DEFAULT_BOOTSTRAP_URL));
  assert!(pinned.contains("-P git v2015.8.8"));
}

#[test]
fn run_command_legacy_wrapper_only_for_0_17_5() {
  let legacy = provisioner(RawConfig {
    salt_version: Some("0.17.5".to_string()),
    ..Default::default()
  })
  .run_command();
  assert!(legacy.contains(SALT_CALL_OUTPUT));

  for version in [None, Some("latest"), Some("2016.03.1")] {
    let cmd = provisioner(RawConfig {
      salt_version: version.map(str::to_string),
      ..Default::default()
    })
    .run_command();
    assert!(!cmd.contains(SALT_CALL_OUTPUT), "{version:?}: {cmd}");
  }
}

#[test]
fn init_command_targets_root_path() {
  let cmd = provisioner(RawConfig::default()).init_command();
  assert!(cmd.contains("mkdir -p /tmp/kitchen"));
}
