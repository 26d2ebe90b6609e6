//! Reading provisioner options from YAML.

use std::fs;
use std::path::Path;

use serde_yaml::Value;

use super::ConfigError;
use super::types::RawConfig;
use super::version::QUOTE_VERSION_HINT;

/// Key under which `.kitchen.yml` nests provisioner options.
const PROVISIONER_KEY: &str = "provisioner";
const SALT_VERSION_KEY: &str = "salt_version";

impl RawConfig {
  /// Parse options from YAML. Accepts either the options at top level or a
  /// `.kitchen.yml`-style document with them under `provisioner:`.
  pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
    if content.trim().is_empty() {
      return Ok(Self::default());
    }
    let document: Value = serde_yaml::from_str(content).map_err(ConfigError::Parse)?;
    Self::from_value(document, ConfigError::Parse)
  }

  /// Read and parse a config file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    if content.trim().is_empty() {
      return Ok(Self::default());
    }

    let document: Value = serde_yaml::from_str(&content).map_err(|source| ConfigError::ParseFile {
      path: path.to_path_buf(),
      source,
    })?;

    Self::from_value(document, |source| ConfigError::ParseFile {
      path: path.to_path_buf(),
      source,
    })
  }

  fn from_value<E>(document: Value, parse_error: E) -> Result<Self, ConfigError>
  where
    E: FnOnce(serde_yaml::Error) -> ConfigError,
  {
    let options = match document {
      Value::Null => return Ok(Self::default()),
      Value::Mapping(mut mapping) => match mapping.remove(PROVISIONER_KEY) {
        Some(nested @ Value::Mapping(_)) => nested,
        Some(other) => {
          // Not a provisioner block; put it back so it is reported as an unknown key
          mapping.insert(Value::String(PROVISIONER_KEY.to_string()), other);
          Value::Mapping(mapping)
        }
        None => Value::Mapping(mapping),
      },
      other => other,
    };

    // A float here has already lost its digits; report it as an option error
    if options.get(SALT_VERSION_KEY).is_some_and(Value::is_f64) {
      return Err(ConfigError::invalid(SALT_VERSION_KEY, QUOTE_VERSION_HINT));
    }

    serde_yaml::from_value(options).map_err(parse_error)
  }
}
