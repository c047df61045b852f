//! # roleguard core
//!
//! Core types for checking cross-file consistency of role configuration.
//!
//! This crate provides the data model used by the checker:
//!
//! - [`KeyPath`] - a dotted path into a configuration mapping
//! - [`ConfigMapping`] - one parsed role source, where only key presence matters
//! - [`SourceLayout`] - where each named source lives inside a role directory
//! - [`DependencyRule`] and [`RuleSet`] - declared-key ⇒ required-key rules as data
//!
//! ## Example
//!
//! ```rust
//! use roleguard_core::{ConfigMapping, RuleSet};
//!
//! let vars = ConfigMapping::from_yaml_mapping(
//!     serde_yaml::from_str("features:\n  central_database: true\n").unwrap(),
//! );
//! let config = ConfigMapping::new();
//!
//! let rules = RuleSet::builtin();
//! let violated: Vec<_> = rules
//!     .iter()
//!     .filter(|rule| {
//!         rule.is_violated(|source| match source {
//!             "vars" => Some(&vars),
//!             "config" => Some(&config),
//!             _ => None,
//!         })
//!     })
//!     .map(|rule| rule.id.as_str())
//!     .collect();
//!
//! assert_eq!(violated, ["central-database-requires-database-service"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod key_path;
pub mod mapping;
pub mod rule;
pub mod source;


pub use error::{Error, Result};
pub use key_path::KeyPath;
pub use mapping::{describe_value, ConfigMapping};
pub use rule::{DependencyRule, KeyCondition, RuleSet, CENTRAL_DATABASE_RULE};
pub use source::SourceLayout;
