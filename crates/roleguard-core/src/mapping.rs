//! Parsed configuration mappings.
//!
//! A [`ConfigMapping`] is the top level of one role source. Lookups never fail:
//! a missing key, or a value that is not a mapping where one is needed, simply
//! means "nothing here".

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::key_path::KeyPath;

/// The top-level mapping of a configuration source.
///
/// # Examples
///
/// ```rust
/// use roleguard_core::{ConfigMapping, KeyPath};
///
/// let mapping = ConfigMapping::from_yaml_mapping(
///     serde_yaml::from_str("features:\n  central_database: false\n").unwrap(),
/// );
/// let features: KeyPath = "features".parse().unwrap();
///
/// // Only presence of the key matters, not its value.
/// assert!(mapping.has_key_at(&features, "central_database"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigMapping {
    inner: Mapping,
}

impl ConfigMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already parsed YAML mapping.
    #[must_use]
    pub const fn from_yaml_mapping(inner: Mapping) -> Self {
        Self { inner }
    }

    /// Returns true if the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns the value at `path`, if every segment resolves through a mapping.
    #[must_use]
    pub fn get(&self, path: &KeyPath) -> Option<&Value> {
        let (first, rest) = path.segments().split_first()?;

        let mut current = self.inner.get(first.as_str())?;
        for segment in rest {
            current = current.as_mapping()?.get(segment.as_str())?;
        }
        Some(current)
    }

    /// Returns the mapping found at `path`.
    ///
    /// The root path yields the top-level mapping. Any non-mapping value,
    /// including `null`, yields `None`.
    #[must_use]
    pub fn mapping_at(&self, path: &KeyPath) -> Option<&Mapping> {
        if path.is_root() {
            return Some(&self.inner);
        }
        self.get(path)?.as_mapping()
    }

    /// Returns true if `key` is present in the mapping at `path`.
    ///
    /// The value stored under `key` is never inspected.
    #[must_use]
    pub fn has_key_at(&self, path: &KeyPath, key: &str) -> bool {
        self.mapping_at(path).is_some_and(|m| m.contains_key(key))
    }
}

impl From<Mapping> for ConfigMapping {
    fn from(inner: Mapping) -> Self {
        Self::from_yaml_mapping(inner)
    }
}

/// Names the YAML type of a value, for diagnostics.
#[must_use]
pub const fn describe_value(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> ConfigMapping {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        match value {
            Value::Mapping(m) => ConfigMapping::from(m),
            other => panic!("expected mapping, got {}", describe_value(&other)),
        }
    }

    fn path(p: &str) -> KeyPath {
        KeyPath::parse(p).unwrap()
    }

    #[test]
    fn test_empty_mapping_has_no_keys() {
        let m = ConfigMapping::new();
        assert!(m.is_empty());
        assert!(!m.has_key_at(&path("features"), "central_database"));
        assert!(m.mapping_at(&path("docker.services")).is_none());
    }

    #[test]
    fn test_nested_lookup() {
        let m = mapping("docker:\n  services:\n    database:\n      image: postgres\n");
        assert!(m.has_key_at(&path("docker.services"), "database"));
        assert!(!m.has_key_at(&path("docker.services"), "redis"));
        assert!(!m.has_key_at(&path("docker"), "database"));
    }

    #[test]
    fn test_presence_ignores_value() {
        for value in ["true", "false", "null", "~", "{}", "[]", "0"] {
            let m = mapping(&format!("features:\n  central_database: {value}\n"));
            assert!(
                m.has_key_at(&path("features"), "central_database"),
                "value {value} should still count as declared"
            );
        }
    }

    #[test]
    fn test_non_mapping_parent_has_no_keys() {
        let m = mapping("features: [central_database]\ndocker: enabled\n");
        assert!(!m.has_key_at(&path("features"), "central_database"));
        assert!(!m.has_key_at(&path("docker.services"), "database"));
    }

    #[test]
    fn test_null_parent_has_no_keys() {
        let m = mapping("features:\ndocker:\n  services:\n");
        assert!(!m.has_key_at(&path("features"), "central_database"));
        assert!(!m.has_key_at(&path("docker.services"), "database"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let m = mapping("Features:\n  central_database: true\n");
        assert!(!m.has_key_at(&path("features"), "central_database"));
    }

    #[test]
    fn test_root_path() {
        let m = mapping("features: {}\n");
        assert!(m.has_key_at(&KeyPath::root(), "features"));
        assert_eq!(m.mapping_at(&KeyPath::root()).map(Mapping::len), Some(1));
        assert!(m.get(&KeyPath::root()).is_none());
    }

    #[test]
    fn test_service_among_siblings() {
        let m = mapping("docker:\n  services:\n    web: {}\n    database: {}\n    cache: {}\n");
        assert!(m.has_key_at(&path("docker.services"), "database"));
        assert!(!m.has_key_at(&path("docker.services"), "databases"));
    }

    #[test]
    fn test_describe_value() {
        assert_eq!(describe_value(&Value::Null), "null");
        assert_eq!(describe_value(&Value::Bool(true)), "boolean");
        assert_eq!(describe_value(&Value::Sequence(Vec::new())), "sequence");
        assert_eq!(describe_value(&Value::String("x".into())), "string");
    }
}
