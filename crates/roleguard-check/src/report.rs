//! Check reports.
//!
//! A [`Report`] lists violations in role order (sorted role names), then in
//! source and rule order within a role.

use std::fmt::Write as FmtWrite;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Why a role failed a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// A rule's trigger was declared without its required key.
    MissingDependency {
        /// Message describing the rule.
        message: String,
    },
    /// A source did not hold a mapping at the top level.
    MalformedSource {
        /// Logical source name.
        source: String,
        /// YAML type found instead of a mapping.
        found: String,
    },
}

/// One failed check for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Role name.
    pub role: String,
    /// Rule identifier (`malformed-source` for shape violations).
    pub rule_id: String,
    /// What went wrong.
    #[serde(flatten)]
    pub kind: ViolationKind,
}

/// Rule id used for malformed-source violations.
pub const MALFORMED_SOURCE_RULE: &str = "malformed-source";

impl Violation {
    /// Creates a missing-dependency violation.
    #[must_use]
    pub fn missing_dependency(
        role: impl Into<String>,
        rule_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            rule_id: rule_id.into(),
            kind: ViolationKind::MissingDependency {
                message: message.into(),
            },
        }
    }

    /// Creates a malformed-source violation.
    #[must_use]
    pub fn malformed_source(
        role: impl Into<String>,
        source: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            rule_id: MALFORMED_SOURCE_RULE.to_string(),
            kind: ViolationKind::MalformedSource {
                source: source.into(),
                found: found.into(),
            },
        }
    }
}

/// Result of a check run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Role names checked, in evaluation order.
    pub roles: Vec<String>,
    /// Violations, in evaluation order.
    pub violations: Vec<Violation>,
    /// Total duration of the run.
    #[serde(skip)]
    pub duration: Duration,
}

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a checked role.
    pub fn add_role(&mut self, role: impl Into<String>) {
        self.roles.push(role.into());
    }

    /// Records a violation.
    pub fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Returns true if no violations were found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the number of violations.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Returns the distinct violating role names, in report order.
    #[must_use]
    pub fn violating_roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = Vec::new();
        for violation in &self.violations {
            if roles.last() != Some(&violation.role.as_str()) {
                roles.push(&violation.role);
            }
        }
        roles
    }

    /// Returns the roles that passed every check, in report order.
    pub fn compliant_roles(&self) -> impl Iterator<Item = &str> {
        self.roles
            .iter()
            .map(String::as_str)
            .filter(|role| !self.violations.iter().any(|v| v.role == *role))
    }

    /// Returns the violations of one rule.
    pub fn for_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| v.rule_id == rule_id)
    }

    /// Renders the consolidated failure message, or `None` for a clean report.
    ///
    /// There is one block per violated rule, in order of first appearance,
    /// listing every offending role as `- <role>`.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        if self.is_clean() {
            return None;
        }

        let mut rule_ids: Vec<&str> = Vec::new();
        for violation in &self.violations {
            if !rule_ids.contains(&violation.rule_id.as_str()) {
                rule_ids.push(&violation.rule_id);
            }
        }

        let mut blocks = Vec::new();
        for rule_id in rule_ids {
            let mut block = String::new();
            let mut violations = self.for_rule(rule_id).peekable();

            match violations.peek().map(|v| &v.kind) {
                Some(ViolationKind::MissingDependency { message }) => {
                    let _ = write!(block, "{message} Missing in roles:");
                }
                Some(ViolationKind::MalformedSource { .. }) => {
                    block.push_str("Malformed configuration sources:");
                }
                None => continue,
            }

            for violation in violations {
                match &violation.kind {
                    ViolationKind::MissingDependency { .. } => {
                        let _ = write!(block, "\n- {}", violation.role);
                    }
                    ViolationKind::MalformedSource { source, found } => {
                        let _ = write!(block, "\n- {}: {source} ({found})", violation.role);
                    }
                }
            }
            blocks.push(block);
        }

        Some(blocks.join("\n\n"))
    }
}
