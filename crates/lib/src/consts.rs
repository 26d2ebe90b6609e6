//! Fixed values shared by the sandbox builder and the command generator.

/// Where the salt bootstrap script is downloaded from unless overridden.
pub const DEFAULT_BOOTSTRAP_URL: &str = "http://bootstrap.saltstack.org";

/// Salt release whose `salt-call` does not report failures through its exit code.
pub const LEGACY_SALT_VERSION: &str = "0.17.5";

/// Output capture file used by the failure-detection wrapper for [`LEGACY_SALT_VERSION`].
pub const SALT_CALL_OUTPUT: &str = "/tmp/salt-call-output";

/// First salt release that understands `--retcode-passthrough`.
pub const RETCODE_PASSTHROUGH_VERSION: &str = "2014.7.0";

/// Remote directory the sandbox is transferred to.
pub const DEFAULT_ROOT_PATH: &str = "/tmp/kitchen";

pub const DEFAULT_APT_REPO: &str = "http://apt.mccartney.ie";
pub const DEFAULT_APT_REPO_KEY: &str = "http://apt.mccartney.ie/KEY";
pub const DEFAULT_PPA: &str = "ppa:saltstack/salt";
pub const DEFAULT_CHEF_BOOTSTRAP_URL: &str = "https://www.getchef.com/chef/install.sh";

/// Version value meaning "whatever the installer considers newest".
pub const LATEST: &str = "latest";

/// Name of the state top file, both in the formula tree and the sandbox.
pub const STATE_TOP: &str = "top.sls";

/// Salt extension module directories that must live at the file root to be synced.
pub const EXTENSION_DIRS: &[&str] = &["_modules", "_states", "_grains", "_renderers", "_returners", "_utils"];

/// Fixed sandbox subpaths, relative to the sandbox root.
pub mod layout {
  pub const SALT_CONFIG_DIR: &str = "etc/salt";
  pub const MINION_CONFIG: &str = "etc/salt/minion";
  pub const GRAINS: &str = "etc/salt/grains";
  pub const FILE_ROOT: &str = "srv/salt";
  pub const PILLAR_ROOT: &str = "srv/pillar";
  pub const DATA: &str = "data";
}
