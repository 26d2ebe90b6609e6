//! The `salt_solo` provisioner as the host drives it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::command;
use crate::config::{Config, ConfigError, RawConfig};
use crate::fs::DiskFs;
use crate::instance::Instance;
use crate::sandbox::{self, SandboxError};

#[derive(Debug, Error)]
pub enum ProvisionerError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Sandbox(#[from] SandboxError),

  #[error("failed to create sandbox directory: {0}")]
  TempDir(#[source] io::Error),

  #[error("failed to remove sandbox {}: {source}", path.display())]
  Cleanup { path: PathBuf, source: io::Error },
}

impl ProvisionerError {
  /// Whether the failure traces back to configuration the user can correct.
  pub fn is_user_error(&self) -> bool {
    match self {
      ProvisionerError::Config(e) => e.is_user_error(),
      ProvisionerError::Sandbox(e) => e.is_user_error(),
      ProvisionerError::TempDir(_) | ProvisionerError::Cleanup { .. } => false,
    }
  }
}

/// One instance's provisioner: a resolved [`Config`] and, once built, its sandbox.
///
/// Each value owns a separate sandbox directory, so instances provisioned in
/// parallel never share state.
#[derive(Debug)]
pub struct SaltSolo {
  config: Config,
  sandbox: Option<PathBuf>,
}

impl SaltSolo {
  /// Resolve `raw` against `instance`, checking sources on the real filesystem.
  pub fn new<I: Instance + ?Sized>(raw: RawConfig, instance: &I) -> Result<Self, ConfigError> {
    let config = Config::resolve(raw, instance, &DiskFs)?;
    Ok(Self::from_config(config))
  }

  pub fn from_config(config: Config) -> Self {
    Self { config, sandbox: None }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Build a fresh sandbox under the system temp directory and return its path.
  ///
  /// A sandbox left from an earlier call is removed first. On failure the
  /// partial directory is kept and reported by [`SaltSolo::sandbox_path`] so
  /// [`SaltSolo::cleanup_sandbox`] can still remove it.
  pub fn create_sandbox(&mut self) -> Result<&Path, ProvisionerError> {
    self.cleanup_sandbox()?;

    let prefix = format!("{}-sandbox-", sanitize(&self.config.instance_name));
    let dir = tempfile::Builder::new()
      .prefix(&prefix)
      .tempdir()
      .map_err(ProvisionerError::TempDir)?
      .keep();

    let path: &Path = self.sandbox.insert(dir);
    sandbox::create_sandbox(&DiskFs, &self.config, path)?;
    Ok(path)
  }

  /// The current sandbox directory, if one has been created.
  pub fn sandbox_path(&self) -> Option<&Path> {
    self.sandbox.as_deref()
  }

  /// Remove the sandbox directory. Succeeds when there is none.
  pub fn cleanup_sandbox(&mut self) -> Result<(), ProvisionerError> {
    let Some(path) = self.sandbox.take() else {
      return Ok(());
    };

    info!(path = %path.display(), "removing sandbox");
    match fs::remove_dir_all(&path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        warn!(path = %path.display(), "sandbox already gone");
        Ok(())
      }
      Err(source) => Err(ProvisionerError::Cleanup { path, source }),
    }
  }

  pub fn install_command(&self) -> String {
    command::install_command(&self.config)
  }

  pub fn init_command(&self) -> String {
    command::init_command(&self.config)
  }

  pub fn run_command(&self) -> String {
    command::run_command(&self.config)
  }
}

/// Instance names may hold characters that are not valid in a file name.
fn sanitize(name: &str) -> String {
  name
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '-' })
    .collect()
}
