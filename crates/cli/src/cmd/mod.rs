mod command;
mod config;
mod sandbox;

pub use command::{CommandKind, cmd_command};
pub use config::cmd_config;
pub use sandbox::cmd_sandbox;

use std::env;

use anyhow::{Context, Result};
use tracing::debug;

use saltsolo_lib::{InstanceInfo, RawConfig, SaltSolo};

use crate::InstanceArgs;

/// Load the config file and resolve it for the instance described by `args`.
fn load_provisioner(args: &InstanceArgs) -> Result<SaltSolo> {
  let kitchen_root = match &args.kitchen_root {
    Some(root) => root.clone(),
    None => env::current_dir().context("Failed to determine current directory")?,
  };
  let kitchen_root = dunce::canonicalize(&kitchen_root)
    .with_context(|| format!("Kitchen root not found: {}", kitchen_root.display()))?;

  let config_path = kitchen_root.join(&args.config);
  debug!(config = %config_path.display(), kitchen_root = %kitchen_root.display(), "loading provisioner config");

  let raw = RawConfig::load(&config_path).with_context(|| format!("Failed to load config: {}", config_path.display()))?;

  let mut instance = InstanceInfo::new(&args.instance, &args.suite, kitchen_root);
  if let Some(os_type) = &args.os_type {
    instance = instance.with_os_type(os_type);
  }

  SaltSolo::new(raw, &instance).context("Invalid provisioner configuration")
}
