use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use crate::InstanceArgs;
use crate::output::{OutputFormat, print_json};

use super::load_provisioner;

#[derive(Debug, Clone, Copy, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
  /// Install salt on the instance
  Install,
  /// Prepare the remote root path
  Init,
  /// Apply states with salt-call
  Run,
}

#[derive(Serialize)]
struct CommandReport {
  kind: CommandKind,
  command: String,
}

pub fn cmd_command(kind: CommandKind, args: &InstanceArgs, output: OutputFormat) -> Result<()> {
  let salt = load_provisioner(args)?;

  let command = match kind {
    CommandKind::Install => salt.install_command(),
    CommandKind::Init => salt.init_command(),
    CommandKind::Run => salt.run_command(),
  };

  if output.is_json() {
    print_json(&CommandReport { kind, command })?;
  } else {
    println!("{command}");
  }

  Ok(())
}
