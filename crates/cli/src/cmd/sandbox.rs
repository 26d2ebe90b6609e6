//! Implementation of the `saltsolo sandbox` command.
//!
//! Builds the sandbox in a fresh temp directory and leaves it in place for the
//! host to transfer; only a failed build is cleaned up.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use crate::InstanceArgs;
use crate::output::{OutputFormat, print_json};

use super::load_provisioner;

#[derive(Serialize)]
struct SandboxReport {
  instance: String,
  path: PathBuf,
}

pub fn cmd_sandbox(args: &InstanceArgs, output: OutputFormat) -> Result<()> {
  let mut salt = load_provisioner(args)?;

  let path = match salt.create_sandbox() {
    Ok(path) => path.to_path_buf(),
    Err(err) => {
      if let Err(cleanup) = salt.cleanup_sandbox() {
        warn!(error = %cleanup, "failed to remove partial sandbox");
      }
      return Err(err).context("Failed to create sandbox");
    }
  };

  if output.is_json() {
    print_json(&SandboxReport {
      instance: salt.config().instance_name.clone(),
      path,
    })?;
  } else {
    println!("{}", path.display());
  }

  Ok(())
}
