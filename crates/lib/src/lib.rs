//! saltsolo-lib: the `salt_solo` test-kitchen provisioner.
//!
//! Prepares a masterless salt run on a test instance:
//! - `config`: resolves user options against the instance into a `Config`
//! - `sandbox`: assembles the minion config, state tree and pillars on the host
//! - `command`: renders the install, init and run shell snippets
//! - `provisioner`: `SaltSolo`, which ties the above to one instance's run

pub mod command;
pub mod config;
pub mod consts;
pub mod fs;
pub mod instance;
pub mod provisioner;
pub mod sandbox;

pub use config::{Config, ConfigError, RawConfig};
pub use instance::{Instance, InstanceInfo};
pub use provisioner::{ProvisionerError, SaltSolo};
pub use sandbox::{SandboxError, create_sandbox};
