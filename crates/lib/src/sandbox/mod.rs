//! Sandbox assembly.
//!
//! Materializes everything the minion needs into one directory tree, which the
//! host later transfers to the instance's `root_path`:
//!
//! ```text
//! {sandbox}/
//! ├── etc/salt/minion        # minion config
//! ├── etc/salt/grains        # only when grains are configured
//! ├── srv/salt/              # state tree: dependencies, vendor, formula, top.sls
//! ├── srv/pillar/            # pillars and pillars-from-files
//! └── data/                  # copy of data_path, when set
//! ```
//!
//! Steps run in a fixed order and stop at the first failure. A failed build may
//! leave the sandbox partially populated; callers discard it.

mod minion;
mod pillars;
mod sources;
mod top;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, info_span};

use crate::config::Config;
use crate::consts::layout::DATA;
use crate::fs::SandboxFs;

/// Errors raised while assembling a sandbox.
#[derive(Debug, Error)]
pub enum SandboxError {
  /// A source path named in the configuration does not exist.
  #[error("{what} not found: {}", path.display())]
  MissingPath { what: String, path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: io::Error },

  #[error("failed to read file {}: {source}", path.display())]
  ReadFile { path: PathBuf, source: io::Error },

  #[error("failed to list directory {}: {source}", path.display())]
  ListDir { path: PathBuf, source: io::Error },

  #[error("failed to serialize {what}: {source}")]
  Serialize { what: String, source: serde_yaml::Error },
}

impl SandboxError {
  /// Whether the user can fix this by correcting a configured path.
  ///
  /// Everything else is an I/O fault on the host.
  pub fn is_user_error(&self) -> bool {
    matches!(self, SandboxError::MissingPath { .. })
  }

  fn missing(what: impl Into<String>, path: PathBuf) -> Self {
    SandboxError::MissingPath {
      what: what.into(),
      path,
    }
  }
}

/// Build the complete sandbox tree for `config` under `sandbox_root`.
///
/// Expects `sandbox_root` to be freshly created and empty; creates it if missing.
pub fn create_sandbox<F>(fs: &F, config: &Config, sandbox_root: &Path) -> Result<(), SandboxError>
where
  F: SandboxFs + ?Sized,
{
  let span = info_span!("sandbox", instance = %config.instance_name, suite = %config.suite_name);
  let _guard = span.enter();

  info!(path = %sandbox_root.display(), formula = %config.formula, "creating sandbox");
  ensure_dir(fs, sandbox_root)?;

  minion::prepare_minion_config(fs, config, sandbox_root)?;
  minion::prepare_grains(fs, config, sandbox_root)?;
  sources::prepare_formulas(fs, config, sandbox_root)?;
  top::prepare_state_top(fs, config, sandbox_root)?;
  pillars::prepare_pillars(fs, config, sandbox_root)?;
  pillars::prepare_pillars_from_files(fs, config, sandbox_root)?;
  prepare_data(fs, config, sandbox_root)?;

  info!(path = %sandbox_root.display(), "sandbox ready");
  Ok(())
}

fn prepare_data<F: SandboxFs + ?Sized>(fs: &F, config: &Config, sandbox_root: &Path) -> Result<(), SandboxError> {
  let Some(data_path) = &config.data_path else {
    return Ok(());
  };

  let source = config.source_path(data_path);
  if !fs.is_dir(&source) {
    return Err(SandboxError::missing("data_path", source));
  }

  info!(source = %source.display(), "preparing data");
  copy_tree(fs, &source, &sandbox_root.join(DATA), &[])?;
  Ok(())
}

fn ensure_dir<F: SandboxFs + ?Sized>(fs: &F, path: &Path) -> Result<(), SandboxError> {
  fs.create_dir_all(path).map_err(|source| SandboxError::CreateDir {
    path: path.to_path_buf(),
    source,
  })
}

/// Write a file, creating its parent directories.
fn write_file<F: SandboxFs + ?Sized>(fs: &F, path: &Path, contents: &[u8]) -> Result<(), SandboxError> {
  if let Some(parent) = path.parent() {
    ensure_dir(fs, parent)?;
  }
  fs.write(path, contents).map_err(|source| SandboxError::WriteFile {
    path: path.to_path_buf(),
    source,
  })
}

fn copy_file<F: SandboxFs + ?Sized>(fs: &F, source: &Path, dest: &Path) -> Result<(), SandboxError> {
  let contents = fs.read(source).map_err(|e| SandboxError::ReadFile {
    path: source.to_path_buf(),
    source: e,
  })?;
  write_file(fs, dest, &contents)
}

/// Recursively copy every file under `source` into `dest`, overwriting files
/// already there. Paths with a component named in `filter` are skipped.
///
/// Returns the number of files copied.
fn copy_tree<F: SandboxFs + ?Sized>(
  fs: &F,
  source: &Path,
  dest: &Path,
  filter: &[String],
) -> Result<usize, SandboxError> {
  let files = fs.list_files(source).map_err(|e| SandboxError::ListDir {
    path: source.to_path_buf(),
    source: e,
  })?;

  ensure_dir(fs, dest)?;

  let mut copied = 0;
  for relative in files {
    if is_filtered(&relative, filter) {
      debug!(path = %relative.display(), "skipping filtered path");
      continue;
    }
    copy_file(fs, &source.join(&relative), &dest.join(&relative))?;
    copied += 1;
  }

  debug!(source = %source.display(), dest = %dest.display(), files = copied, "copied tree");
  Ok(copied)
}

fn is_filtered(relative: &Path, filter: &[String]) -> bool {
  relative
    .iter()
    .any(|component| filter.iter().any(|name| component == name.as_str()))
}
