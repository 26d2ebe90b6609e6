//! Minion config and grains under `etc/salt/`.

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::info;

use super::{SandboxError, write_file};
use crate::config::Config;
use crate::consts::STATE_TOP;
use crate::consts::layout::{FILE_ROOT, GRAINS, MINION_CONFIG, PILLAR_ROOT};
use crate::fs::SandboxFs;

/// The minion config as a YAML mapping, with `salt_minion_extra_config` applied last.
pub(crate) fn minion_config(config: &Config) -> Mapping {
  let mut minion = Mapping::new();
  minion.insert("id".into(), config.instance_name.clone().into());
  minion.insert("state_top".into(), STATE_TOP.into());
  minion.insert("file_client".into(), "local".into());
  minion.insert("file_roots".into(), base_roots(config.remote_path(FILE_ROOT)));
  minion.insert("pillar_roots".into(), base_roots(config.remote_path(PILLAR_ROOT)));

  if let Some(extra) = &config.salt_minion_extra_config {
    for (key, value) in extra {
      minion.insert(key.clone(), value.clone());
    }
  }

  minion
}

fn base_roots(path: String) -> Value {
  let mut roots = Mapping::new();
  roots.insert("base".into(), Value::Sequence(vec![path.into()]));
  Value::Mapping(roots)
}

pub(super) fn prepare_minion_config<F: SandboxFs + ?Sized>(
  fs: &F,
  config: &Config,
  sandbox_root: &Path,
) -> Result<(), SandboxError> {
  info!("preparing minion config");

  let content = serde_yaml::to_string(&minion_config(config)).map_err(|source| SandboxError::Serialize {
    what: "minion config".to_string(),
    source,
  })?;
  write_file(fs, &sandbox_root.join(MINION_CONFIG), content.as_bytes())
}

pub(super) fn prepare_grains<F: SandboxFs + ?Sized>(
  fs: &F,
  config: &Config,
  sandbox_root: &Path,
) -> Result<(), SandboxError> {
  let Some(grains) = &config.grains else {
    return Ok(());
  };

  info!("preparing grains");
  let content = serde_yaml::to_string(grains).map_err(|source| SandboxError::Serialize {
    what: "grains".to_string(),
    source,
  })?;
  write_file(fs, &sandbox_root.join(GRAINS), content.as_bytes())
}
