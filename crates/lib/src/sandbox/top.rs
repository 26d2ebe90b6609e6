//! The state top file at `srv/salt/top.sls`.
//!
//! Three sources, in order of precedence: a user `top.sls` when
//! `state_top_from_file` is set, the inline `state_top` mapping, or a generated
//! top that applies the formula (or, with `state_collection`, each of its
//! states) to every minion.

use std::collections::BTreeSet;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::info;

use super::{SandboxError, write_file};
use crate::config::Config;
use crate::consts::STATE_TOP;
use crate::consts::layout::FILE_ROOT;
use crate::fs::SandboxFs;

pub(super) fn prepare_state_top<F: SandboxFs + ?Sized>(
  fs: &F,
  config: &Config,
  sandbox_root: &Path,
) -> Result<(), SandboxError> {
  info!(from_file = config.state_top_from_file, "preparing state top");

  let content = if config.state_top_from_file {
    read_user_top(fs, config)?
  } else {
    let top = match &config.state_top {
      Some(top) => top.clone(),
      None => generated_top(fs, config)?,
    };
    serde_yaml::to_string(&top)
      .map_err(|source| SandboxError::Serialize {
        what: "state top".to_string(),
        source,
      })?
      .into_bytes()
  };

  write_file(fs, &sandbox_root.join(FILE_ROOT).join(STATE_TOP), &content)
}

/// The user's own `top.sls`: the kitchen root's, else the formula directory's.
fn read_user_top<F: SandboxFs + ?Sized>(fs: &F, config: &Config) -> Result<Vec<u8>, SandboxError> {
  let candidates = [config.kitchen_root.join(STATE_TOP), config.formula_dir().join(STATE_TOP)];

  let found = candidates.iter().find(|path| fs.is_file(path)).cloned();
  let Some(path) = found else {
    let [primary, _] = candidates;
    return Err(SandboxError::missing("state top file (state_top_from_file)", primary));
  };

  fs.read(&path).map_err(|source| SandboxError::ReadFile { path, source })
}

/// `base: {'*': [...]}` naming the formula, or each state of a collection.
fn generated_top<F: SandboxFs + ?Sized>(fs: &F, config: &Config) -> Result<Mapping, SandboxError> {
  let states = if config.state_collection {
    collection_states(fs, config)?
  } else {
    vec![config.formula.clone()]
  };

  let mut targets = Mapping::new();
  targets.insert("*".into(), Value::Sequence(states.into_iter().map(Value::from).collect()));

  let mut top = Mapping::new();
  top.insert("base".into(), Value::Mapping(targets));
  Ok(top)
}

/// Top-level states of the formula directory, in dotted form.
fn collection_states<F: SandboxFs + ?Sized>(fs: &F, config: &Config) -> Result<Vec<String>, SandboxError> {
  let formula = &config.formula;
  let formula_dir = config.formula_dir();
  let files = fs.list_files(&formula_dir).map_err(|source| SandboxError::ListDir {
    path: formula_dir.clone(),
    source,
  })?;

  let mut has_init = false;
  let mut states = BTreeSet::new();
  for file in &files {
    let parts: Vec<&str> = file.iter().filter_map(|c| c.to_str()).collect();
    match parts.as_slice() {
      ["init.sls"] => has_init = true,
      [name] if *name != STATE_TOP => {
        if let Some(state) = name.strip_suffix(".sls") {
          states.insert(format!("{formula}.{state}"));
        }
      }
      [dir, "init.sls"] if !dir.starts_with('_') => {
        states.insert(format!("{formula}.{dir}"));
      }
      _ => {}
    }
  }

  let mut listed = Vec::with_capacity(states.len() + 1);
  if has_init || states.is_empty() {
    listed.push(formula.clone());
  }
  listed.extend(states);
  Ok(listed)
}
