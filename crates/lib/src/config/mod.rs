//! Provisioner configuration.
//!
//! Raw options ([`RawConfig`]) come from a YAML file or are built in code. They are
//! resolved once against the instance into an immutable [`Config`], which the
//! sandbox builder and the command generator only read.

mod load;
mod resolve;
mod types;
mod version;

use std::path::PathBuf;

use thiserror::Error;

pub use types::{Config, Dependency, LogLevel, RawConfig, SaltInstall};
pub use version::SaltVersion;

/// Errors raised while loading or resolving configuration.
///
/// All of these are user-facing: each names the option or path to fix.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("the `formula` option is required")]
  MissingFormula,

  #[error("formula '{formula}' not found: {} is not a directory", path.display())]
  FormulaNotFound { formula: String, path: PathBuf },

  #[error("invalid `{option}`: {reason}")]
  InvalidOption { option: String, reason: String },

  #[error("platform '{os_type}' is not supported: generated commands require a POSIX shell")]
  UnsupportedPlatform { os_type: String },

  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse config {}: {source}", path.display())]
  ParseFile { path: PathBuf, source: serde_yaml::Error },

  #[error("invalid configuration: {0}")]
  Parse(#[source] serde_yaml::Error),
}

impl ConfigError {
  /// Always true: every configuration failure is fixed by editing options or paths.
  pub fn is_user_error(&self) -> bool {
    true
  }

  pub(crate) fn invalid(option: &str, reason: impl Into<String>) -> Self {
    Self::InvalidOption {
      option: option.to_string(),
      reason: reason.into(),
    }
  }
}
