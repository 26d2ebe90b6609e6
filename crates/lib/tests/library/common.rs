//! Shared helpers for library integration tests.

use std::path::PathBuf;

use saltsolo_lib::{InstanceInfo, RawConfig, SaltSolo};

/// Kitchen root holding the `test_formula` formula and the source fixtures.
pub fn fixtures_root() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  fixtures_root().join(name)
}

pub fn instance() -> InstanceInfo {
  InstanceInfo::new("coolbeans", "fries", fixtures_root())
}

/// A provisioner for `test_formula` with `raw` layered on top.
pub fn provisioner(raw: RawConfig) -> SaltSolo {
  SaltSolo::new(
    RawConfig {
      formula: Some("test_formula".to_string()),
      ..raw
    },
    &instance(),
  )
  .unwrap_or_else(|e| panic!("config should resolve: {e}"))
}

/// Every file under `root`, relative and sorted.
pub fn files_under(root: &std::path::Path) -> Vec<String> {
  let mut files: Vec<String> = walkdir::WalkDir::new(root)
    .into_iter()
    .filter_map(Result::ok)
    .filter(|e| e.file_type().is_file())
    .map(|e| {
      e.path()
        .strip_prefix(root)
        .unwrap()
        .to_string_lossy()
        .replace('\\', "/")
    })
    .collect();
  files.sort();
  files
}
