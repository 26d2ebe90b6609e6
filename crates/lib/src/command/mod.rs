//! Command Generator.
//!
//! Renders the three shell snippets the host runs on the instance: installing
//! salt, preparing the remote root, and applying states. Generation is pure;
//! every function reads a finalized [`Config`] and returns a `String`.

use crate::config::{Config, SaltInstall};
use crate::consts::layout::SALT_CONFIG_DIR;
use crate::consts::{LATEST, RETCODE_PASSTHROUGH_VERSION, SALT_CALL_OUTPUT};

/// POSIX shell functions (`exists`, `do_download`, ...) sourced by the install snippet.
pub const SHELL_HELPERS: &str = include_str!("helpers.sh");

const BOOTSTRAP_SCRIPT: &str = "/tmp/bootstrap-salt.sh";
const CHEF_SCRIPT: &str = "/tmp/install.sh";
const CHEF_ROOT: &str = "/opt/chef";

/// Shell snippet that installs salt (and chef, when required) on the instance.
pub fn install_command(config: &Config) -> String {
  let mut lines = vec![SHELL_HELPERS.trim_end().to_string(), String::new()];

  match config.salt_install {
    SaltInstall::Bootstrap => bootstrap_install(config, &mut lines),
    SaltInstall::Apt => apt_install(config, &mut lines),
    SaltInstall::Ppa => ppa_install(config, &mut lines),
  }

  if config.require_chef {
    chef_install(config, &mut lines);
  }

  sh_c(&lines.join("\n"))
}

/// Shell snippet that clears stale sandbox content and recreates `root_path`.
pub fn init_command(config: &Config) -> String {
  let root = config.root_path.trim_end_matches('/');
  format!(
    "{}rm -rf {root}/etc {root}/srv {root}/data ; mkdir -p {root}",
    config.sudo_prefix()
  )
}

/// Output fragments that mark a failed legacy salt-call run.
const LEGACY_FAILURE_MARKERS: [&str; 4] = ["Result: False", "ERROR:", "\\[ERROR", "Data failed to compile"];

/// Highstate summary line with a nonzero failure count.
const LEGACY_FAILED_COUNT: &str = "^ *Failed: *[1-9]";

/// Shell snippet that runs `salt-call` in local mode against the transferred sandbox.
pub fn run_command(config: &Config) -> String {
  let mut cmd = format!(
    "{}salt-call --config-dir={} --local",
    config.sudo_prefix(),
    config.remote_path(SALT_CONFIG_DIR)
  );

  if let Some(level) = &config.log_level {
    cmd.push_str(&format!(" --log-level {level}"));
  }

  if config.salt_run_highstate {
    cmd.push_str(" state.highstate");
    if config.salt_version.at_least(RETCODE_PASSTHROUGH_VERSION) {
      cmd.push_str(" --retcode-passthrough");
    }
  }

  // salt-call exits 0 on failed states in this release; scrape its output instead
  if config.salt_version.is_legacy() {
    let markers: Vec<String> = LEGACY_FAILURE_MARKERS.iter().map(|m| format!("-e \"{m}\"")).collect();
    cmd.push_str(&format!(
      " 2>&1 | tee {SALT_CALL_OUTPUT} ; (grep -q {markers} {SALT_CALL_OUTPUT} || grep -q -E \"{LEGACY_FAILED_COUNT}\" {SALT_CALL_OUTPUT}) && exit 1 || true",
      markers = markers.join(" "),
    ));
  }

  cmd
}

/// Arguments handed to the bootstrap script: user options, then the version pin.
pub fn bootstrap_args(config: &Config) -> String {
  let mut args = Vec::new();
  if let Some(options) = &config.salt_bootstrap_options {
    args.push(options.trim().to_string());
  }
  if !config.salt_version.is_latest() {
    args.push(format!("-P git v{}", config.salt_version));
  }
  args.join(" ")
}

fn bootstrap_install(config: &Config, lines: &mut Vec<String>) {
  let version = config.salt_version.as_str();
  let sudo = config.sudo_prefix();
  let install = [
    format!("  do_download {} {BOOTSTRAP_SCRIPT}", config.salt_bootstrap_url),
    format!("  {sudo}sh {BOOTSTRAP_SCRIPT} {}", bootstrap_args(config))
      .trim_end()
      .to_string(),
  ];

  lines.push("SALT_VERSION=$(salt-call --version 2>/dev/null | cut -d \" \" -f 2)".to_string());
  lines.push("if [ -z \"${SALT_VERSION}\" ]; then".to_string());
  lines.push("  echo \"-----> Installing Salt via bootstrap\"".to_string());
  lines.extend(install.iter().cloned());
  lines.push(format!(
    "elif [ \"${{SALT_VERSION}}\" = \"{version}\" ] || [ \"{version}\" = \"{LATEST}\" ]; then"
  ));
  lines.push("  echo \"-----> Found Salt ${SALT_VERSION} installed\"".to_string());
  lines.push("else".to_string());
  lines.push(format!(
    "  echo \"-----> Reinstalling Salt {version} (found ${{SALT_VERSION}})\""
  ));
  lines.extend(install);
  lines.push("fi".to_string());
}

fn apt_install(config: &Config, lines: &mut Vec<String>) {
  let version = config.salt_version.as_str();
  let sudo = config.sudo_prefix();
  let pin = if config.salt_version.is_latest() {
    String::new()
  } else {
    format!("={version}")
  };
  let list = format!("/etc/apt/sources.list.d/salt-{version}.list");

  lines.push("if exists salt-call; then".to_string());
  lines.push("  echo \"-----> Found Salt $(salt-call --version) installed\"".to_string());
  lines.push("else".to_string());
  lines.push(format!("  echo \"-----> Configuring apt repo for salt {version}\""));
  lines.push(format!(
    "  echo \"deb {}/salt-{version} $(lsb_release -sc) main\" | {sudo}tee {list}",
    config.salt_apt_repo.trim_end_matches('/')
  ));
  lines.push(format!("  do_download {} /tmp/repo.key", config.salt_apt_repo_key));
  lines.push(format!("  {sudo}apt-key add /tmp/repo.key"));
  lines.push(format!("  {sudo}apt-get update"));
  lines.push(format!("  echo \"-----> Installing salt-minion ({version})\""));
  lines.push(format!("  {sudo}apt-get install -y salt-minion{pin} salt-common{pin}"));
  lines.push("fi".to_string());
}

fn ppa_install(config: &Config, lines: &mut Vec<String>) {
  let sudo = config.sudo_prefix();

  lines.push("if exists salt-call; then".to_string());
  lines.push("  echo \"-----> Found Salt $(salt-call --version) installed\"".to_string());
  lines.push("else".to_string());
  lines.push(format!("  echo \"-----> Installing salt-minion from {}\"", config.salt_ppa));
  lines.push(format!("  {sudo}apt-get install -y python-software-properties"));
  lines.push(format!("  {sudo}add-apt-repository -y {}", config.salt_ppa));
  lines.push(format!("  {sudo}apt-get update"));
  lines.push(format!("  {sudo}apt-get install -y salt-minion"));
  lines.push("fi".to_string());
}

fn chef_install(config: &Config, lines: &mut Vec<String>) {
  lines.push(String::new());
  lines.push(format!("if [ ! -d \"{CHEF_ROOT}\" ]; then"));
  lines.push("  echo \"-----> Installing Chef Omnibus (for busser/serverspec ruby support)\"".to_string());
  lines.push(format!("  do_download {} {CHEF_SCRIPT}", config.chef_bootstrap_url));
  lines.push(format!("  {}sh {CHEF_SCRIPT}", config.sudo_prefix()));
  lines.push("fi".to_string());
}

/// Wrap a script as `sh -c '...'`, escaping embedded single quotes.
fn sh_c(script: &str) -> String {
  format!("sh -c '\n{}\n'", script.replace('\'', r"'\''"))
}
