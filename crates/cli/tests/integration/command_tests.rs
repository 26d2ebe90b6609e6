use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn install_pins_configured_version() {
  let env = TestEnv::with_config("provisioner:\n  formula: test_formula\n  salt_version: 2015.8.8\n");

  env
    .saltsolo_cmd()
    .args(["command", "install"])
    .assert()
    .success()
    .stdout(predicate::str::contains("http://bootstrap.saltstack.org"))
    .stdout(predicate::str::contains("-P git v2015.8.8"));
}

#[test]
fn install_latest_is_unpinned() {
  let env = TestEnv::with_config("provisioner:\n  formula: test_formula\n");

  env
    .saltsolo_cmd()
    .args(["command", "install"])
    .assert()
    .success()
    .stdout(predicate::str::contains("-P git").not());
}

#[test]
fn run_legacy_version_detects_failures() {
  let env = TestEnv::with_config("provisioner:\n  formula: test_formula\n  salt_version: 0.17.5\n");

  env
    .saltsolo_cmd()
    .args(["command", "run"])
    .assert()
    .success()
    .stdout(predicate::str::contains("/tmp/salt-call-output"));
}

#[test]
fn run_includes_log_level() {
  let env = TestEnv::with_config("provisioner:\n  formula: test_formula\n  log_level: debug\n");

  env
    .saltsolo_cmd()
    .args(["command", "run"])
    .assert()
    .success()
    .stdout(predicate::str::contains("--log-level debug"))
    .stdout(predicate::str::contains("/tmp/salt-call-output").not());
}

#[test]
fn run_invalid_log_level_fails() {
  let env = TestEnv::with_config("provisioner:\n  formula: test_formula\n  log_level: loud\n");

  env
    .saltsolo_cmd()
    .args(["command", "run"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("log_level"));
}

#[test]
fn init_honours_root_path_and_sudo() {
  let env = TestEnv::with_config("provisioner:\n  formula: test_formula\n  root_path: /srv/kitchen\n  sudo: false\n");

  env
    .saltsolo_cmd()
    .args(["command", "init"])
    .assert()
    .success()
    .stdout(predicate::str::starts_with("rm -rf /srv/kitchen/etc"))
    .stdout(predicate::str::contains("mkdir -p /srv/kitchen"));
}

#[test]
fn command_json_output() {
  let env = TestEnv::with_config("provisioner:\n  formula: test_formula\n");

  env
    .saltsolo_cmd()
    .args(["command", "run", "--format", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"kind\": \"run\""))
    .stdout(predicate::str::contains("salt-call"));
}
