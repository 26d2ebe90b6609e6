use anyhow::Result;

use crate::InstanceArgs;
use crate::output::{OutputFormat, print_json, print_stat};

use super::load_provisioner;

pub fn cmd_config(args: &InstanceArgs, output: OutputFormat) -> Result<()> {
  let salt = load_provisioner(args)?;
  let config = salt.config();

  if output.is_json() {
    return print_json(config);
  }

  println!("Provisioner: salt_solo");
  print_stat("Formula", &config.formula);
  print_stat("Kitchen root", &config.kitchen_root.display().to_string());
  print_stat("Instance", &config.instance_name);
  print_stat("Suite", &config.suite_name);
  print_stat("Salt version", config.salt_version.as_str());
  print_stat("Install", config.salt_install.as_str());
  print_stat("Root path", &config.root_path);
  print_stat("Highstate", &config.salt_run_highstate.to_string());
  if let Some(level) = &config.log_level {
    print_stat("Log level", level.as_str());
  }
  if let Some(vendor) = &config.vendor_path {
    print_stat("Vendor path", &vendor.display().to_string());
  }
  for dependency in &config.dependencies {
    print_stat(
      "Dependency",
      &format!("{} ({})", dependency.name, dependency.path.display()),
    );
  }
  let pillar_count = config.pillars.as_ref().map_or(0, |p| p.len())
    + config.pillars_from_files.as_ref().map_or(0, |p| p.len());
  print_stat("Pillars", &pillar_count.to_string());

  Ok(())
}
