//! Pillar data under `srv/pillar/`.

use std::path::Path;

use tracing::{debug, info};

use super::{SandboxError, copy_file, write_file};
use crate::config::Config;
use crate::consts::layout::PILLAR_ROOT;
use crate::fs::SandboxFs;

/// Serialize each `pillars` entry to `srv/pillar/<key>`.
pub(super) fn prepare_pillars<F: SandboxFs + ?Sized>(
  fs: &F,
  config: &Config,
  sandbox_root: &Path,
) -> Result<(), SandboxError> {
  let Some(pillars) = &config.pillars else {
    return Ok(());
  };

  info!(count = pillars.len(), "preparing pillars");
  let pillar_root = sandbox_root.join(PILLAR_ROOT);

  for (key, value) in pillars {
    let content = serde_yaml::to_string(value).map_err(|source| SandboxError::Serialize {
      what: format!("pillar '{key}'"),
      source,
    })?;
    debug!(pillar = %key, "writing pillar");
    write_file(fs, &pillar_root.join(key), content.as_bytes())?;
  }

  Ok(())
}

/// Copy each `pillars-from-files` source verbatim to `srv/pillar/<key>`.
///
/// Runs after [`prepare_pillars`]; a key present in both maps ends up with the
/// file's content.
pub(super) fn prepare_pillars_from_files<F: SandboxFs + ?Sized>(
  fs: &F,
  config: &Config,
  sandbox_root: &Path,
) -> Result<(), SandboxError> {
  let Some(files) = &config.pillars_from_files else {
    return Ok(());
  };

  info!(count = files.len(), "preparing pillars from files");
  let pillar_root = sandbox_root.join(PILLAR_ROOT);

  for (key, source) in files {
    let source = config.source_path(source);
    if !fs.is_file(&source) {
      return Err(SandboxError::missing(format!("pillar file for '{key}'"), source));
    }
    debug!(pillar = %key, source = %source.display(), "copying pillar file");
    copy_file(fs, &source, &pillar_root.join(key))?;
  }

  Ok(())
}
