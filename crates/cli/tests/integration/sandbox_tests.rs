use std::path::PathBuf;

use predicates::prelude::*;

use super::common::{TestEnv, remove_sandbox};

const VENDOR_CONFIG: &str = r#"
provisioner:
  name: salt_solo
  formula: test_formula
  vendor_path: vendor
  pillars:
    top.sls:
      base:
        '*':
          - app
    app.sls:
      port: 8080
"#;

fn sandbox_path(stdout: &[u8]) -> PathBuf {
  PathBuf::from(String::from_utf8_lossy(stdout).trim())
}

#[test]
fn sandbox_prints_populated_directory() {
  let env = TestEnv::with_config(VENDOR_CONFIG);
  env.write_file("vendor/nginx/init.sls", "nginx:\n  pkg.installed: []\n");

  let assert = env
    .saltsolo_cmd()
    .arg("sandbox")
    .arg("--instance")
    .arg("default-ubuntu-1404")
    .assert()
    .success();

  let sandbox = sandbox_path(&assert.get_output().stdout);
  assert!(sandbox.join("etc/salt/minion").is_file());
  assert!(sandbox.join("srv/salt/top.sls").is_file());
  assert!(sandbox.join("srv/salt/test_formula/init.sls").is_file());
  assert!(sandbox.join("srv/salt/nginx/init.sls").is_file());
  assert!(sandbox.join("srv/pillar/app.sls").is_file());

  let minion = std::fs::read_to_string(sandbox.join("etc/salt/minion")).unwrap();
  assert!(minion.contains("default-ubuntu-1404"), "{minion}");

  remove_sandbox(&sandbox);
}

#[test]
fn sandbox_json_output_names_path() {
  let env = TestEnv::with_config(VENDOR_CONFIG);
  env.write_file("vendor/nginx/init.sls", "nginx: {}\n");

  let assert = env
    .saltsolo_cmd()
    .arg("sandbox")
    .args(["--format", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"instance\""))
    .stdout(predicate::str::contains("\"path\""));

  let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  let sandbox = PathBuf::from(report["path"].as_str().unwrap());
  assert!(sandbox.is_dir());

  remove_sandbox(&sandbox);
}

#[test]
fn sandbox_missing_vendor_path_fails() {
  let env = TestEnv::with_config(VENDOR_CONFIG);

  env
    .saltsolo_cmd()
    .arg("sandbox")
    .assert()
    .failure()
    .stderr(predicate::str::contains("vendor_path not found"));
}

#[test]
fn sandbox_uses_explicit_kitchen_root() {
  let env = TestEnv::with_config(VENDOR_CONFIG);
  env.write_file("vendor/nginx/init.sls", "nginx: {}\n");

  let assert = env
    .saltsolo_cmd()
    .current_dir(std::env::temp_dir())
    .arg("sandbox")
    .arg("--kitchen-root")
    .arg(env.root())
    .assert()
    .success();

  let sandbox = sandbox_path(&assert.get_output().stdout);
  assert!(sandbox.join("srv/salt/nginx/init.sls").is_file());

  remove_sandbox(&sandbox);
}

#[test]
fn sandbox_state_top_from_file() {
  let env = TestEnv::with_config("provisioner:\n  formula: test_formula\n  state_top_from_file: true\n");
  env.write_file("top.sls", "# test state_top_from_file\n");

  let assert = env.saltsolo_cmd().arg("sandbox").assert().success();

  let sandbox = sandbox_path(&assert.get_output().stdout);
  assert_eq!(
    std::fs::read_to_string(sandbox.join("srv/salt/top.sls")).unwrap(),
    "# test state_top_from_file\n"
  );

  remove_sandbox(&sandbox);
}
