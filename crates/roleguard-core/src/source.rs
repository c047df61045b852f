//! Named configuration sources within a role.
//!
//! Each role may carry one file per logical source. The [`SourceLayout`] maps
//! source names to their role-relative file paths.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Source name for role variables.
pub const VARS: &str = "vars";

/// Source name for role configuration.
pub const CONFIG: &str = "config";

/// Fixed file name used by the default layout.
pub const MAIN_FILE: &str = "main.yml";

/// Maps logical source names to role-relative file paths.
///
/// # Examples
///
/// ```rust
/// use roleguard_core::SourceLayout;
/// use std::path::Path;
///
/// let layout = SourceLayout::default();
/// assert_eq!(layout.path_for("vars"), Some(Path::new("vars/main.yml")));
/// assert_eq!(layout.path_for("config"), Some(Path::new("config/main.yml")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    sources: BTreeMap<String, PathBuf>,
}

impl Default for SourceLayout {
    fn default() -> Self {
        let mut sources = BTreeMap::new();
        for name in [VARS, CONFIG] {
            sources.insert(name.to_string(), Path::new(name).join(MAIN_FILE));
        }
        Self { sources }
    }
}

impl SourceLayout {
    /// Creates a layout with no sources registered.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            sources: BTreeMap::new(),
        }
    }

    /// Registers a source, replacing any existing path for the same name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSource`] if the name is blank or the path is
    /// not a plain relative path inside the role directory.
    pub fn with_source(
        mut self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let name = name.into();
        let path = path.into();

        if name.trim().is_empty() {
            return Err(Error::InvalidSource {
                name,
                reason: "source name cannot be empty".to_string(),
            });
        }

        if path.as_os_str().is_empty()
            || !path.components().all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(Error::InvalidSource {
                name,
                reason: format!(
                    "path '{}' must be relative and stay inside the role directory",
                    path.display()
                ),
            });
        }

        self.sources.insert(name, path);
        Ok(self)
    }

    /// Returns the role-relative path of a source.
    #[must_use]
    pub fn path_for(&self, name: &str) -> Option<&Path> {
        self.sources.get(name).map(PathBuf::as_path)
    }

    /// Returns true if the source name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Returns registered source names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = SourceLayout::default();
        assert_eq!(layout.names().collect::<Vec<_>>(), vec!["config", "vars"]);
        assert_eq!(layout.path_for(VARS), Some(Path::new("vars/main.yml")));
        assert!(layout.path_for("defaults").is_none());
    }

    #[test]
    fn test_register_extra_source() {
        let layout = SourceLayout::default()
            .with_source("defaults", "defaults/main.yml")
            .unwrap();
        assert!(layout.contains("defaults"));
        assert_eq!(
            layout.path_for("defaults"),
            Some(Path::new("defaults/main.yml"))
        );
    }

    #[test]
    fn test_override_source_path() {
        let layout = SourceLayout::default()
            .with_source(CONFIG, "config/main.yaml")
            .unwrap();
        assert_eq!(layout.path_for(CONFIG), Some(Path::new("config/main.yaml")));
    }

    #[test]
    fn test_reject_escaping_paths() {
        assert!(SourceLayout::empty().with_source("x", "../x.yml").is_err());
        assert!(SourceLayout::empty().with_source("x", "/etc/x.yml").is_err());
        assert!(SourceLayout::empty().with_source("x", "").is_err());
        assert!(SourceLayout::empty().with_source(" ", "x.yml").is_err());
    }
}
