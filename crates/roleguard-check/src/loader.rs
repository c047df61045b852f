//! Loading role configuration sources.
//!
//! The loader resolves `<role dir>/<layout path>` for a source name and
//! normalizes what it finds into a [`ConfigMapping`]. Absence is a valid state:
//! a missing file, an empty file, or a document that is just `null` all load
//! as an empty mapping. A top-level scalar or sequence also loads as an empty
//! mapping but is flagged as [`SourceShape::Malformed`] so the caller can
//! decide whether to report it.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use roleguard_core::{describe_value, ConfigMapping, SourceLayout};
use serde_yaml::Value;
use tracing::debug;

use crate::discovery::Role;
use crate::error::{CheckError, Result};

/// What a source file turned out to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceShape {
    /// No file at the resolved path.
    Absent,
    /// The file is blank, comments only, or `null`.
    Empty,
    /// The file holds a mapping.
    Mapping,
    /// The file holds something other than a mapping at the top level.
    Malformed {
        /// YAML type found instead of a mapping.
        found: &'static str,
    },
}

/// A loaded source, normalized to a mapping.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    /// Logical source name.
    pub source: String,
    /// Resolved file path.
    pub path: PathBuf,
    /// Parsed content, empty unless `shape` is [`SourceShape::Mapping`].
    pub mapping: ConfigMapping,
    /// What the file contained.
    pub shape: SourceShape,
}

/// Loads named sources from role directories.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    layout: SourceLayout,
}

impl ConfigLoader {
    /// Creates a loader for the given layout.
    #[must_use]
    pub const fn new(layout: SourceLayout) -> Self {
        Self { layout }
    }

    /// Resolves the file path of a source for a role.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::UnknownSource`] if the layout has no such source.
    pub fn resolve(&self, role: &Role, source: &str) -> Result<PathBuf> {
        self.layout
            .path_for(source)
            .map(|relative| role.dir.join(relative))
            .ok_or_else(|| CheckError::UnknownSource {
                name: source.to_string(),
            })
    }

    /// Loads one source of a role.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is unknown, the file exists but cannot
    /// be read, or its content is not valid YAML.
    pub fn load(&self, role: &Role, source: &str) -> Result<LoadedSource> {
        let path = self.resolve(role, source)?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                debug!(role = %role.name, source, "Source absent");
                return Ok(LoadedSource {
                    source: source.to_string(),
                    path,
                    mapping: ConfigMapping::new(),
                    shape: SourceShape::Absent,
                });
            }
            Err(e) => return Err(CheckError::Io { path, source: e }),
        };

        let (mapping, shape) = if is_blank_document(&content) {
            (ConfigMapping::new(), SourceShape::Empty)
        } else {
            let value: Value =
                serde_yaml::from_str(&content).map_err(|e| CheckError::SourceParse {
                    path: path.clone(),
                    source: e,
                })?;
            normalize(value)
        };

        debug!(role = %role.name, source, shape = ?shape, keys = mapping.len(), "Source loaded");

        Ok(LoadedSource {
            source: source.to_string(),
            path,
            mapping,
            shape,
        })
    }
}

fn normalize(value: Value) -> (ConfigMapping, SourceShape) {
    match value {
        Value::Mapping(m) => (ConfigMapping::from(m), SourceShape::Mapping),
        Value::Null => (ConfigMapping::new(), SourceShape::Empty),
        other => (
            ConfigMapping::new(),
            SourceShape::Malformed {
                found: describe_value(&other),
            },
        ),
    }
}

/// True for documents with no content beyond comments and markers.
fn is_blank_document(content: &str) -> bool {
    content.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}
