//! Dotted key paths into configuration mappings.
//!
//! A [`KeyPath`] names a nested location such as `docker.services`. Matching is
//! case-sensitive and segment-exact; there is no escaping, so a key containing
//! a literal `.` cannot be addressed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A dotted path of mapping keys.
///
/// The empty path refers to the top level of a mapping.
///
/// # Examples
///
/// ```rust
/// use roleguard_core::KeyPath;
///
/// let path: KeyPath = "docker.services".parse().unwrap();
/// assert_eq!(path.segments(), ["docker", "services"]);
/// assert_eq!(path.to_string(), "docker.services");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Returns the path addressing the top level of a mapping.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parses a dotted key path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyPath`] if any segment is empty or padded with
    /// whitespace.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(Error::InvalidKeyPath {
                    path: path.to_string(),
                    reason: "empty segment".to_string(),
                });
            }
            if segment.trim() != segment {
                return Err(Error::InvalidKeyPath {
                    path: path.to_string(),
                    reason: format!("segment '{segment}' has surrounding whitespace"),
                });
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    /// Returns the individual keys of the path.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns true for the top-level path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Renders `<path>.<key>`, or just `<key>` at the root.
    #[must_use]
    pub fn join_key(&self, key: &str) -> String {
        if self.is_root() {
            key.to_string()
        } else {
            format!("{self}.{key}")
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for KeyPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for KeyPath {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<KeyPath> for String {
    fn from(path: KeyPath) -> Self {
        path.to_string()
    }
}
