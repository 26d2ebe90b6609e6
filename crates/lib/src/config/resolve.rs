//! Turning raw options into a validated [`Config`].
//!
//! Resolution fills in defaults, captures the instance's attributes and
//! rejects values that would produce a broken sandbox or an unsafe
//! command. The only filesystem access is the formula directory check.

use std::collections::BTreeMap;
use std::path::{Component, Path};

use tracing::debug;

use super::types::{Config, LogLevel, RawConfig, SaltInstall};
use super::version::SaltVersion;
use super::ConfigError;
use crate::consts::{
  DEFAULT_APT_REPO, DEFAULT_APT_REPO_KEY, DEFAULT_BOOTSTRAP_URL, DEFAULT_CHEF_BOOTSTRAP_URL, DEFAULT_PPA,
  DEFAULT_ROOT_PATH,
};
use crate::fs::SandboxFs;
use crate::instance::Instance;

/// Plugin name accepted in the `name` key of a `.kitchen.yml` provisioner block.
const PLUGIN_NAME: &str = "salt_solo";

impl Config {
  /// Merge `raw` with the documented defaults and the instance's attributes.
  ///
  /// Reads the instance once and checks that the formula directory exists under
  /// the kitchen root. Has no side effects, so resolving the same inputs twice
  /// gives equal configs.
  pub fn resolve<I, F>(raw: RawConfig, instance: &I, fs: &F) -> Result<Self, ConfigError>
  where
    I: Instance + ?Sized,
    F: SandboxFs + ?Sized,
  {
    if let Some(os_type) = instance.os_type().filter(|os| os.eq_ignore_ascii_case("windows")) {
      return Err(ConfigError::UnsupportedPlatform {
        os_type: os_type.to_string(),
      });
    }

    if let Some(name) = raw.name.as_deref().filter(|name| *name != PLUGIN_NAME) {
      return Err(ConfigError::invalid("name", format!("expected '{PLUGIN_NAME}', got '{name}'")));
    }

    let formula = raw
      .formula
      .map(|f| f.trim().to_string())
      .filter(|f| !f.is_empty())
      .ok_or(ConfigError::MissingFormula)?;
    if !is_single_component(&formula) {
      return Err(ConfigError::invalid("formula", format!("'{formula}' must be a directory name")));
    }

    let kitchen_root = raw
      .kitchen_root
      .unwrap_or_else(|| instance.kitchen_root().to_path_buf());

    let formula_dir = kitchen_root.join(&formula);
    if !fs.is_dir(&formula_dir) {
      return Err(ConfigError::FormulaNotFound {
        formula,
        path: formula_dir,
      });
    }

    let salt_version = match raw.salt_version.as_deref() {
      None => SaltVersion::latest(),
      Some(value) => SaltVersion::parse(value)
        .ok_or_else(|| ConfigError::invalid("salt_version", format!("'{value}' is not 'latest' or a release number")))?,
    };

    let log_level = raw
      .log_level
      .as_deref()
      .map(|value| {
        value.parse::<LogLevel>().map_err(|()| {
          ConfigError::invalid(
            "log_level",
            format!("'{value}' is not one of {}", LogLevel::NAMES.join(", ")),
          )
        })
      })
      .transpose()?;

    let salt_install = match raw.salt_install.as_deref() {
      None => SaltInstall::default(),
      Some(value) => value
        .parse()
        .map_err(|()| ConfigError::invalid("salt_install", format!("'{value}' is not one of bootstrap, apt, ppa")))?,
    };

    if raw.grains.as_ref().is_some_and(|grains| !grains.is_mapping()) {
      return Err(ConfigError::invalid("grains", "must be a mapping"));
    }

    if let Some(pillars) = &raw.pillars {
      check_pillar_keys("pillars", pillars)?;
    }
    if let Some(pillars) = &raw.pillars_from_files {
      check_pillar_keys("pillars-from-files", pillars)?;
    }

    let dependencies = raw.dependencies.unwrap_or_default();
    for dependency in &dependencies {
      if !is_single_component(&dependency.name) {
        return Err(ConfigError::invalid(
          "dependencies",
          format!("name '{}' must be a single directory name", dependency.name),
        ));
      }
    }

    let root_path = raw.root_path.unwrap_or_else(|| DEFAULT_ROOT_PATH.to_string());
    if !root_path.starts_with('/') {
      return Err(ConfigError::invalid("root_path", format!("'{root_path}' must be absolute")));
    }
    if !is_shell_safe_path(&root_path) {
      return Err(ConfigError::invalid(
        "root_path",
        format!("'{root_path}' may only contain letters, digits, '/', '.', '_' and '-'"),
      ));
    }

    debug!(
      formula = %formula,
      kitchen_root = %kitchen_root.display(),
      salt_version = %salt_version,
      "resolved provisioner config"
    );

    Ok(Self {
      formula,
      kitchen_root,
      instance_name: instance.name().to_string(),
      suite_name: instance.suite_name().to_string(),
      os_type: instance.os_type().map(str::to_string),
      grains: raw.grains,
      pillars: raw.pillars,
      pillars_from_files: raw.pillars_from_files,
      data_path: raw.data_path,
      dependencies,
      vendor_path: raw.vendor_path,
      salt_copy_filter: raw.salt_copy_filter.unwrap_or_default(),
      state_collection: raw.state_collection.unwrap_or(false),
      state_top_from_file: raw.state_top_from_file.unwrap_or(false),
      state_top: raw.state_top,
      salt_minion_extra_config: raw.salt_minion_extra_config,
      salt_run_highstate: raw.salt_run_highstate.unwrap_or(true),
      salt_version,
      log_level,
      salt_install,
      salt_bootstrap_url: raw
        .salt_bootstrap_url
        .unwrap_or_else(|| DEFAULT_BOOTSTRAP_URL.to_string()),
      salt_bootstrap_options: raw.salt_bootstrap_options.filter(|o| !o.trim().is_empty()),
      salt_apt_repo: raw.salt_apt_repo.unwrap_or_else(|| DEFAULT_APT_REPO.to_string()),
      salt_apt_repo_key: raw
        .salt_apt_repo_key
        .unwrap_or_else(|| DEFAULT_APT_REPO_KEY.to_string()),
      salt_ppa: raw.salt_ppa.unwrap_or_else(|| DEFAULT_PPA.to_string()),
      require_chef: raw.require_chef.unwrap_or(true),
      chef_bootstrap_url: raw
        .chef_bootstrap_url
        .unwrap_or_else(|| DEFAULT_CHEF_BOOTSTRAP_URL.to_string()),
      root_path,
      sudo: raw.sudo.unwrap_or(true),
    })
  }
}

/// A name that is exactly one normal path component (no separators, no `..`).
fn is_single_component(name: &str) -> bool {
  let mut components = Path::new(name).components();
  matches!(
    (components.next(), components.next()),
    (Some(Component::Normal(_)), None)
  )
}

/// Pillar keys become file paths under `srv/pillar/`, so each must name a file
/// inside it: relative, at least one normal component, no trailing separator.
fn check_pillar_keys<V>(option: &str, pillars: &BTreeMap<String, V>) -> Result<(), ConfigError> {
  for key in pillars.keys() {
    let path = Path::new(key);
    let escapes = path
      .components()
      .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    let names_file = path.components().any(|c| matches!(c, Component::Normal(_)));
    let is_dir = matches!(key.rsplit(['/', '\\']).next(), None | Some("" | "." | ".."));
    if escapes || !names_file || is_dir {
      return Err(ConfigError::invalid(
        option,
        format!("key '{key}' must be a relative file path inside the pillar tree"),
      ));
    }
  }
  Ok(())
}

/// `root_path` is spliced into shell commands unquoted, so it is limited to
/// characters the shell passes through literally.
fn is_shell_safe_path(path: &str) -> bool {
  path
    .chars()
    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-'))
}
