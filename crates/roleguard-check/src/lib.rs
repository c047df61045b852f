//! # roleguard check
//!
//! Cross-file consistency checks for role-based configuration repositories.
//!
//! This crate provides functionality for:
//!
//! - Discovering roles (one per subdirectory of a roles root)
//! - Loading each role's named configuration sources
//! - Evaluating dependency rules and collecting every violation
//! - Reporting results to the console or as JSON
//!
//! ## Example
//!
//! ```rust,ignore
//! use roleguard_check::{CheckConfig, ConsoleReporter, Reporter, RuleEvaluator};
//! use roleguard_core::RuleSet;
//!
//! let config = CheckConfig::new().with_roles_root("roles/");
//! let evaluator = RuleEvaluator::new(config, RuleSet::builtin())?;
//! let report = evaluator.run()?;
//!
//! ConsoleReporter::new().report(&report)?;
//! println!("Violations: {}", report.violation_count());
//! ```

pub mod discovery;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod report;
pub mod reporter;

pub use discovery::{DiscoveryConfig, Role, RoleDiscovery};
pub use error::{CheckError, Result};
pub use evaluator::{CheckConfig, MalformedPolicy, RuleEvaluator};
pub use loader::{ConfigLoader, LoadedSource, SourceShape};
pub use report::{Report, Violation, ViolationKind, MALFORMED_SOURCE_RULE};
pub use reporter::{ConsoleReporter, JsonReporter, Reporter};
