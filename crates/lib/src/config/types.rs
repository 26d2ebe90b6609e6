//! Option schema before and after resolution.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use super::version::{SaltVersion, deserialize_version};

/// Options exactly as the user wrote them. Every field is optional; defaults are
/// applied by [`Config::resolve`](super::Config::resolve).
///
/// Unknown keys are rejected when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
  /// Provisioner plugin name as written in `.kitchen.yml`; must be `salt_solo` when present.
  pub name: Option<String>,
  pub formula: Option<String>,
  pub kitchen_root: Option<PathBuf>,
  pub grains: Option<Value>,
  pub pillars: Option<BTreeMap<String, Value>>,
  #[serde(rename = "pillars-from-files", alias = "pillars_from_files")]
  pub pillars_from_files: Option<BTreeMap<String, PathBuf>>,
  pub data_path: Option<PathBuf>,
  pub dependencies: Option<Vec<Dependency>>,
  pub state_collection: Option<bool>,
  pub state_top_from_file: Option<bool>,
  pub state_top: Option<Mapping>,
  pub salt_run_highstate: Option<bool>,
  #[serde(default, deserialize_with = "deserialize_version")]
  pub salt_version: Option<String>,
  pub vendor_path: Option<PathBuf>,
  pub log_level: Option<String>,
  pub salt_copy_filter: Option<Vec<String>>,
  pub salt_minion_extra_config: Option<Mapping>,
  pub salt_install: Option<String>,
  pub salt_bootstrap_url: Option<String>,
  pub salt_bootstrap_options: Option<String>,
  pub salt_apt_repo: Option<String>,
  pub salt_apt_repo_key: Option<String>,
  pub salt_ppa: Option<String>,
  pub require_chef: Option<bool>,
  pub chef_bootstrap_url: Option<String>,
  pub root_path: Option<String>,
  pub sudo: Option<bool>,
}

/// A supporting formula copied into `srv/salt/<name>/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
  pub name: String,
  pub path: PathBuf,
}

/// How salt gets onto the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaltInstall {
  #[default]
  Bootstrap,
  Apt,
  Ppa,
}

impl SaltInstall {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Bootstrap => "bootstrap",
      Self::Apt => "apt",
      Self::Ppa => "ppa",
    }
  }
}

impl FromStr for SaltInstall {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "bootstrap" => Ok(Self::Bootstrap),
      "apt" => Ok(Self::Apt),
      "ppa" => Ok(Self::Ppa),
      _ => Err(()),
    }
  }
}

/// `salt-call --log-level` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
  All,
  Garbage,
  Trace,
  Debug,
  Info,
  Profile,
  Warning,
  Error,
  Critical,
  Quiet,
}

impl LogLevel {
  pub const NAMES: &'static [&'static str] = &[
    "all", "garbage", "trace", "debug", "info", "profile", "warning", "error", "critical", "quiet",
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::All => "all",
      Self::Garbage => "garbage",
      Self::Trace => "trace",
      Self::Debug => "debug",
      Self::Info => "info",
      Self::Profile => "profile",
      Self::Warning => "warning",
      Self::Error => "error",
      Self::Critical => "critical",
      Self::Quiet => "quiet",
    }
  }
}

impl FromStr for LogLevel {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(match s.to_ascii_lowercase().as_str() {
      "all" => Self::All,
      "garbage" => Self::Garbage,
      "trace" => Self::Trace,
      "debug" => Self::Debug,
      "info" => Self::Info,
      "profile" => Self::Profile,
      "warning" | "warn" => Self::Warning,
      "error" => Self::Error,
      "critical" => Self::Critical,
      "quiet" => Self::Quiet,
      _ => return Err(()),
    })
  }
}

impl fmt::Display for LogLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Fully resolved provisioner configuration.
///
/// Produced once by [`Config::resolve`](super::Config::resolve) and only ever
/// borrowed afterwards; nothing downstream mutates it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Config {
  pub formula: String,
  pub kitchen_root: PathBuf,
  pub instance_name: String,
  pub suite_name: String,
  pub os_type: Option<String>,

  pub grains: Option<Value>,
  pub pillars: Option<BTreeMap<String, Value>>,
  pub pillars_from_files: Option<BTreeMap<String, PathBuf>>,
  pub data_path: Option<PathBuf>,
  pub dependencies: Vec<Dependency>,
  pub vendor_path: Option<PathBuf>,
  pub salt_copy_filter: Vec<String>,

  pub state_collection: bool,
  pub state_top_from_file: bool,
  pub state_top: Option<Mapping>,
  pub salt_minion_extra_config: Option<Mapping>,

  pub salt_run_highstate: bool,
  pub salt_version: SaltVersion,
  pub log_level: Option<LogLevel>,
  pub salt_install: SaltInstall,
  pub salt_bootstrap_url: String,
  pub salt_bootstrap_options: Option<String>,
  pub salt_apt_repo: String,
  pub salt_apt_repo_key: String,
  pub salt_ppa: String,
  pub require_chef: bool,
  pub chef_bootstrap_url: String,
  pub root_path: String,
  pub sudo: bool,
}

impl Config {
  /// Directory of the formula under test.
  pub fn formula_dir(&self) -> PathBuf {
    self.kitchen_root.join(&self.formula)
  }

  /// Resolve a user-supplied source path: absolute paths are kept, relative
  /// ones are taken from the kitchen root.
  pub fn source_path(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.kitchen_root.join(path)
    }
  }

  /// Remote path below [`Config::root_path`].
  pub fn remote_path(&self, relative: &str) -> String {
    format!("{}/{}", self.root_path.trim_end_matches('/'), relative)
  }

  /// `sudo -E ` when privileged commands should be elevated, otherwise empty.
  pub fn sudo_prefix(&self) -> &'static str {
    if self.sudo { "sudo -E " } else { "" }
  }
}
