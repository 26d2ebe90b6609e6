//! Populates the state tree (`srv/salt/`) from its three origins.
//!
//! Sources are copied lowest precedence first, so a later copy overwrites an
//! earlier one at the same relative path:
//!
//! 1. each dependency, into `srv/salt/<name>/`
//! 2. the vendor path, merged into `srv/salt/` as-is
//! 3. the formula under test, into `srv/salt/<formula>/`
//!
//! Salt extension directories (`_modules`, `_states`, ...) are additionally
//! hoisted to the file root, where the minion syncs them from.

use std::path::Path;

use tracing::{debug, info};

use super::{SandboxError, copy_tree, ensure_dir};
use crate::config::{Config, Dependency};
use crate::consts::EXTENSION_DIRS;
use crate::consts::layout::FILE_ROOT;
use crate::fs::SandboxFs;

pub(super) fn prepare_formulas<F: SandboxFs + ?Sized>(
  fs: &F,
  config: &Config,
  sandbox_root: &Path,
) -> Result<(), SandboxError> {
  let file_root = sandbox_root.join(FILE_ROOT);
  ensure_dir(fs, &file_root)?;

  for dependency in &config.dependencies {
    copy_dependency(fs, config, dependency, &file_root)?;
  }

  if let Some(vendor_path) = &config.vendor_path {
    copy_vendor(fs, config, vendor_path, &file_root)?;
  }

  copy_formula(fs, config, &file_root)
}

fn copy_dependency<F: SandboxFs + ?Sized>(
  fs: &F,
  config: &Config,
  dependency: &Dependency,
  file_root: &Path,
) -> Result<(), SandboxError> {
  let root = config.source_path(&dependency.path);
  if !fs.is_dir(&root) {
    return Err(SandboxError::missing(format!("dependency '{}'", dependency.name), root));
  }

  // A formula repository keeps its states in a subdirectory named after it
  let nested = root.join(&dependency.name);
  let formula_dir = if fs.is_dir(&nested) { nested } else { root.clone() };

  info!(name = %dependency.name, path = %formula_dir.display(), "copying dependency");
  copy_tree(
    fs,
    &formula_dir,
    &file_root.join(&dependency.name),
    &config.salt_copy_filter,
  )?;

  hoist_extensions(fs, &root, file_root, &config.salt_copy_filter)?;
  if formula_dir != root {
    hoist_extensions(fs, &formula_dir, file_root, &config.salt_copy_filter)?;
  }
  Ok(())
}

fn copy_vendor<F: SandboxFs + ?Sized>(
  fs: &F,
  config: &Config,
  vendor_path: &Path,
  file_root: &Path,
) -> Result<(), SandboxError> {
  let vendor = config.source_path(vendor_path);
  if !fs.is_dir(&vendor) {
    return Err(SandboxError::missing("vendor_path", vendor));
  }

  info!(path = %vendor.display(), "copying vendored formulas");
  copy_tree(fs, &vendor, file_root, &config.salt_copy_filter)?;
  Ok(())
}

fn copy_formula<F: SandboxFs + ?Sized>(fs: &F, config: &Config, file_root: &Path) -> Result<(), SandboxError> {
  let formula_dir = config.formula_dir();
  if !fs.is_dir(&formula_dir) {
    return Err(SandboxError::missing(format!("formula '{}'", config.formula), formula_dir));
  }

  info!(formula = %config.formula, path = %formula_dir.display(), "copying formula");
  copy_tree(
    fs,
    &formula_dir,
    &file_root.join(&config.formula),
    &config.salt_copy_filter,
  )?;

  hoist_extensions(fs, &config.kitchen_root, file_root, &config.salt_copy_filter)?;
  hoist_extensions(fs, &formula_dir, file_root, &config.salt_copy_filter)?;
  Ok(())
}

/// Copy any extension directories found directly under `root` to the file root.
fn hoist_extensions<F: SandboxFs + ?Sized>(
  fs: &F,
  root: &Path,
  file_root: &Path,
  filter: &[String],
) -> Result<(), SandboxError> {
  for ext in EXTENSION_DIRS {
    if filter.iter().any(|name| name == ext) {
      continue;
    }
    let source = root.join(ext);
    if fs.is_dir(&source) {
      debug!(source = %source.display(), "hoisting extension modules");
      copy_tree(fs, &source, &file_root.join(ext), filter)?;
    }
  }
  Ok(())
}
