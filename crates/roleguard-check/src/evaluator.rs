//! Rule evaluation across roles.
//!
//! The evaluator loads every source the rule set references for each role,
//! applies each rule, and appends violations to a [`Report`]. It never stops at
//! the first violation. Only infrastructural failures (unreadable files, YAML
//! syntax errors) abort a run, and they come back as `Err` rather than as a
//! report.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use roleguard_core::{ConfigMapping, RuleSet, SourceLayout};
use tracing::{debug, info, warn};

use crate::discovery::{DiscoveryConfig, Role, RoleDiscovery};
use crate::error::Result;
use crate::loader::{ConfigLoader, SourceShape};
use crate::report::{Report, Violation};

/// How sources that are not a mapping at the top level are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Treat the source as empty and log a warning.
    #[default]
    Lenient,
    /// Treat the source as empty and report a violation for it.
    Strict,
}

/// Configuration for a check run.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Directory containing one subdirectory per role.
    pub roles_root: PathBuf,
    /// Role discovery settings.
    pub discovery: DiscoveryConfig,
    /// Where each source lives inside a role.
    pub layout: SourceLayout,
    /// Handling of non-mapping sources.
    pub malformed: MalformedPolicy,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            roles_root: PathBuf::from("roles"),
            discovery: DiscoveryConfig::default(),
            layout: SourceLayout::default(),
            malformed: MalformedPolicy::default(),
        }
    }
}

impl CheckConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the roles root.
    #[must_use]
    pub fn with_roles_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roles_root = root.into();
        self
    }

    /// Sets the discovery configuration.
    #[must_use]
    pub fn with_discovery(mut self, discovery: DiscoveryConfig) -> Self {
        self.discovery = discovery;
        self
    }

    /// Sets the source layout.
    #[must_use]
    pub fn with_layout(mut self, layout: SourceLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the malformed-source policy.
    #[must_use]
    pub const fn with_malformed(mut self, malformed: MalformedPolicy) -> Self {
        self.malformed = malformed;
        self
    }
}

/// Evaluates a rule set against roles.
///
/// # Examples
///
/// ```rust,no_run
/// use roleguard_check::{CheckConfig, RuleEvaluator};
/// use roleguard_core::RuleSet;
///
/// let evaluator = RuleEvaluator::new(CheckConfig::new(), RuleSet::builtin())?;
/// let report = evaluator.run()?;
///
/// if let Some(message) = report.failure_message() {
///     eprintln!("{message}");
/// }
/// # Ok::<(), roleguard_check::CheckError>(())
/// ```
#[derive(Debug)]
pub struct RuleEvaluator {
    config: CheckConfig,
    rules: RuleSet,
    loader: ConfigLoader,
}

impl RuleEvaluator {
    /// Creates an evaluator.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule set is invalid or references a source the
    /// layout does not define.
    pub fn new(config: CheckConfig, rules: RuleSet) -> Result<Self> {
        rules.validate()?;
        rules.validate_sources(&config.layout)?;

        let loader = ConfigLoader::new(config.layout.clone());
        Ok(Self {
            config,
            rules,
            loader,
        })
    }

    /// Discovers roles under the configured root and evaluates them.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails or any source cannot be loaded.
    pub fn run(&self) -> Result<Report> {
        self.check(&self.config.roles_root)
    }

    /// Discovers roles under `root` and evaluates them.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails or any source cannot be loaded.
    pub fn check(&self, root: impl AsRef<Path>) -> Result<Report> {
        let roles = RoleDiscovery::with_config(self.config.discovery.clone()).discover(root)?;
        self.evaluate(&roles)
    }

    /// Evaluates the given roles in order.
    ///
    /// # Errors
    ///
    /// Returns an error if any source cannot be loaded.
    pub fn evaluate(&self, roles: &[Role]) -> Result<Report> {
        let start = Instant::now();
        let mut report = Report::new();

        info!(roles = roles.len(), rules = self.rules.len(), "Starting check");

        for role in roles {
            let violations = self.evaluate_role(role)?;
            report.add_role(role.name.clone());
            for violation in violations {
                report.add(violation);
            }
        }

        report.duration = start.elapsed();

        info!(
            roles = report.roles.len(),
            violations = report.violation_count(),
            duration = ?report.duration,
            "Check complete"
        );

        Ok(report)
    }

    /// Evaluates every rule against one role.
    ///
    /// Malformed-source violations (strict mode) come first, in source name
    /// order, followed by rule violations in rule order.
    ///
    /// # Errors
    ///
    /// Returns an error if any referenced source cannot be loaded.
    pub fn evaluate_role(&self, role: &Role) -> Result<Vec<Violation>> {
        debug!(role = %role.name, "Evaluating role");

        let mut violations = Vec::new();
        let mut sources: BTreeMap<&str, ConfigMapping> = BTreeMap::new();

        for name in self.rules.referenced_sources() {
            let loaded = self.loader.load(role, name)?;

            if let SourceShape::Malformed { found } = loaded.shape {
                match self.config.malformed {
                    MalformedPolicy::Lenient => {
                        warn!(
                            role = %role.name,
                            source = name,
                            path = %loaded.path.display(),
                            found,
                            "Source is not a mapping, treating it as empty"
                        );
                    }
                    MalformedPolicy::Strict => {
                        violations.push(Violation::malformed_source(&role.name, name, found));
                    }
                }
            }

            sources.insert(name, loaded.mapping);
        }

        for rule in self.rules.iter() {
            if rule.is_violated(|name| sources.get(name)) {
                debug!(role = %role.name, rule = %rule.id, "Rule violated");
                violations.push(Violation::missing_dependency(
                    &role.name,
                    &rule.id,
                    rule.message(),
                ));
            }
        }

        Ok(violations)
    }
}
