//! The slice of the host test instance the provisioner reads.

use std::path::{Path, PathBuf};

/// What the provisioner needs to know about the instance it prepares.
///
/// Read once, while the configuration is resolved.
pub trait Instance {
  /// Instance name, used as the minion id and the sandbox directory prefix.
  fn name(&self) -> &str;

  fn suite_name(&self) -> &str;

  /// Platform OS type (`unix`, `windows`), if the host knows it.
  fn os_type(&self) -> Option<&str>;

  /// Directory holding the formula under test and any relative sources.
  fn kitchen_root(&self) -> &Path;
}

/// Plain-data [`Instance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceInfo {
  pub name: String,
  pub suite_name: String,
  pub os_type: Option<String>,
  pub kitchen_root: PathBuf,
}

impl InstanceInfo {
  pub fn new(name: impl Into<String>, suite_name: impl Into<String>, kitchen_root: impl Into<PathBuf>) -> Self {
    Self {
      name: name.into(),
      suite_name: suite_name.into(),
      os_type: None,
      kitchen_root: kitchen_root.into(),
    }
  }

  pub fn with_os_type(mut self, os_type: impl Into<String>) -> Self {
    self.os_type = Some(os_type.into());
    self
  }
}

impl Instance for InstanceInfo {
  fn name(&self) -> &str {
    &self.name
  }

  fn suite_name(&self) -> &str {
    &self.suite_name
  }

  fn os_type(&self) -> Option<&str> {
    self.os_type.as_deref()
  }

  fn kitchen_root(&self) -> &Path {
    &self.kitchen_root
  }
}
