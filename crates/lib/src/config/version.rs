//! Salt release identifiers.

use std::cmp::Ordering;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::consts::{LATEST, LEGACY_SALT_VERSION};

/// A requested salt release: `latest` or a dotted version such as `2016.03.1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SaltVersion(String);

impl SaltVersion {
  pub fn latest() -> Self {
    Self(LATEST.to_string())
  }

  /// Validate a version string. Returns `None` for anything that is not
  /// `latest` or digits-first dotted alphanumerics.
  pub fn parse(value: &str) -> Option<Self> {
    let value = value.trim();
    if value == LATEST {
      return Some(Self::latest());
    }

    let valid = value.starts_with(|c: char| c.is_ascii_digit())
      && value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));

    valid.then(|| Self(value.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn is_latest(&self) -> bool {
    self.0 == LATEST
  }

  /// Whether this is the release that needs output-scraping failure detection.
  pub fn is_legacy(&self) -> bool {
    self.0 == LEGACY_SALT_VERSION
  }

  /// Whether this release is `minimum` or newer. `latest` is newer than everything.
  pub fn at_least(&self, minimum: &str) -> bool {
    if self.is_latest() {
      return true;
    }
    compare_numeric(&self.0, minimum) != Ordering::Less
  }
}

impl fmt::Display for SaltVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Leading digits of each dot-separated segment, so `2015.8.0rc1` is `[2015, 8, 0]`.
fn numeric_components(version: &str) -> Vec<u64> {
  version
    .split('.')
    .map(|segment| {
      let digits: String = segment.chars().take_while(char::is_ascii_digit).collect();
      digits.parse().unwrap_or(0)
    })
    .collect()
}

fn compare_numeric(a: &str, b: &str) -> Ordering {
  let a = numeric_components(a);
  let b = numeric_components(b);
  let len = a.len().max(b.len());
  for i in 0..len {
    let left = a.get(i).copied().unwrap_or(0);
    let right = b.get(i).copied().unwrap_or(0);
    match left.cmp(&right) {
      Ordering::Equal => continue,
      other => return other,
    }
  }
  Ordering::Equal
}

pub(crate) const QUOTE_VERSION_HINT: &str =
  "must be a quoted string such as \"2016.11.3\"; bare numbers like 2016.10 lose trailing zeros";

/// Accept `salt_version` written as a YAML string or as a bare integer (`3006`).
///
/// Fractional numbers are refused: `2016.10` parses as a float and would come
/// back as `2016.1`.
pub(crate) fn deserialize_version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<Value>::deserialize(deserializer)? {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(text)) => Ok(Some(text)),
    Some(Value::Number(n)) if !n.is_f64() => Ok(Some(n.to_string())),
    Some(_) => Err(D::Error::custom(QUOTE_VERSION_HINT)),
  }
}
