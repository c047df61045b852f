//! Role discovery.
//!
//! Every immediate subdirectory of the roles root is a role. Discovery does not
//! recurse and does not look inside role directories; the order of the result
//! is the sort order of role names, so reports are stable across runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use roleguard_check::RoleDiscovery;
//!
//! let roles = RoleDiscovery::new().discover("roles/")?;
//! for role in &roles {
//!     println!("{}", role.name);
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CheckError, Result};

/// Configuration for role discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// Directory names never treated as roles.
    pub exclude_dirs: Vec<String>,
    /// Whether to skip directories whose name starts with `.`.
    pub skip_hidden: bool,
}

impl DiscoveryConfig {
    /// Creates a new discovery configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory to exclude.
    #[must_use]
    pub fn exclude_dir(mut self, dir: impl Into<String>) -> Self {
        self.exclude_dirs.push(dir.into());
        self
    }

    /// Sets whether hidden directories are skipped.
    #[must_use]
    pub const fn with_skip_hidden(mut self, skip_hidden: bool) -> Self {
        self.skip_hidden = skip_hidden;
        self
    }

    fn is_excluded(&self, name: &str) -> bool {
        (self.skip_hidden && name.starts_with('.')) || self.exclude_dirs.iter().any(|d| d == name)
    }
}

/// A discovered role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Role {
    /// Role name (the directory name).
    pub name: String,
    /// Role directory.
    pub dir: PathBuf,
}

impl Role {
    /// Creates a role.
    #[must_use]
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
        }
    }
}

/// Role discovery engine.
#[derive(Debug, Default)]
pub struct RoleDiscovery {
    config: DiscoveryConfig,
}

impl RoleDiscovery {
    /// Creates a discovery instance with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a discovery instance with custom configuration.
    #[must_use]
    pub const fn with_config(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    /// Discovers roles under `root`, sorted by name.
    ///
    /// An empty root yields no roles.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` does not exist, is not a directory, or cannot
    /// be read.
    pub fn discover(&self, root: impl AsRef<Path>) -> Result<Vec<Role>> {
        let root = root.as_ref();

        if !root.exists() {
            return Err(CheckError::Discovery(format!(
                "Directory does not exist: {}",
                root.display()
            )));
        }

        if !root.is_dir() {
            return Err(CheckError::Discovery(format!(
                "Path is not a directory: {}",
                root.display()
            )));
        }

        let entries = fs::read_dir(root).map_err(|e| CheckError::Io {
            path: root.to_path_buf(),
            source: e,
        })?;

        let mut roles = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CheckError::Io {
                path: root.to_path_buf(),
                source: e,
            })?;

            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if self.config.is_excluded(&name) {
                debug!(dir = %path.display(), "Skipping excluded directory");
                continue;
            }

            roles.push(Role::new(name, path));
        }

        roles.sort();

        info!(path = %root.display(), roles = roles.len(), "Role discovery complete");

        Ok(roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(roles: &[Role]) -> Vec<&str> {
        roles.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_discover_sorted_directories() {
        let temp = TempDir::new().unwrap();
        for name in ["web", "db-service", "Alpha", "cache"] {
            fs::create_dir(temp.path().join(name)).unwrap();
        }

        let roles = RoleDiscovery::new().discover(temp.path()).unwrap();
        assert_eq!(names(&roles), vec!["Alpha", "cache", "db-service", "web"]);
        assert_eq!(roles[2].dir, temp.path().join("db-service"));
    }

    #[test]
    fn test_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("role-a")).unwrap();
        fs::write(temp.path().join("README.md"), "roles").unwrap();

        let roles = RoleDiscovery::new().discover(temp.path()).unwrap();
        assert_eq!(names(&roles), vec!["role-a"]);
    }

    #[test]
    fn test_empty_root() {
        let temp = TempDir::new().unwrap();
        let roles = RoleDiscovery::new().discover(temp.path()).unwrap();
        assert!(roles.is_empty());
    }

    #[test]
    fn test_missing_root_is_error() {
        let temp = TempDir::new().unwrap();
        let err = RoleDiscovery::new()
            .discover(temp.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, CheckError::Discovery(_)));
    }

    #[test]
    fn test_file_root_is_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("roles");
        fs::write(&file, "").unwrap();
        assert!(RoleDiscovery::new().discover(&file).is_err());
    }

    #[test]
    fn test_hidden_and_excluded() {
        let temp = TempDir::new().unwrap();
        for name in [".git", "role-a", "templates"] {
            fs::create_dir(temp.path().join(name)).unwrap();
        }

        let all = RoleDiscovery::new().discover(temp.path()).unwrap();
        assert_eq!(names(&all), vec![".git", "role-a", "templates"]);

        let config = DiscoveryConfig::new()
            .with_skip_hidden(true)
            .exclude_dir("templates");
        let filtered = RoleDiscovery::with_config(config)
            .discover(temp.path())
            .unwrap();
        assert_eq!(names(&filtered), vec!["role-a"]);
    }
}
