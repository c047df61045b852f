//! Cross-source dependency rules.
//!
//! A [`DependencyRule`] states that when a trigger key is declared in one set
//! of sources, a required key must be declared in another. Rules are plain
//! data, so new dependencies are added to a [`RuleSet`] (or a rules file)
//! without touching the evaluator.
//!
//! Rules files are YAML:
//!
//! ```yaml
//! rules:
//!   - id: central-database-requires-database-service
//!     trigger:
//!       sources: [vars, config]
//!       path: features
//!       key: central_database
//!     requirement:
//!       sources: [config]
//!       path: docker.services
//!       key: database
//! ```

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::key_path::KeyPath;
use crate::mapping::ConfigMapping;
use crate::source::{SourceLayout, CONFIG, VARS};

/// Identifier of the built-in central database rule.
pub const CENTRAL_DATABASE_RULE: &str = "central-database-requires-database-service";

/// A key that must be present at a path in at least one of several sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyCondition {
    /// Sources consulted, in order. The condition holds if any of them matches.
    pub sources: Vec<String>,
    /// Path of the mapping whose keys are inspected.
    #[serde(default)]
    pub path: KeyPath,
    /// Key whose presence is tested.
    pub key: String,
}

impl KeyCondition {
    /// Creates a condition.
    #[must_use]
    pub fn new<S: Into<String>>(
        sources: impl IntoIterator<Item = S>,
        path: KeyPath,
        key: impl Into<String>,
    ) -> Self {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            path,
            key: key.into(),
        }
    }

    /// Evaluates the condition, resolving source names through `lookup`.
    ///
    /// A source that `lookup` cannot resolve is treated as an empty mapping.
    pub fn holds<'a, F>(&self, mut lookup: F) -> bool
    where
        F: FnMut(&str) -> Option<&'a ConfigMapping>,
    {
        self.sources.iter().any(|source| {
            lookup(source.as_str())
                .is_some_and(|mapping| mapping.has_key_at(&self.path, &self.key))
        })
    }

    /// Returns the full dotted location, e.g. `docker.services.database`.
    #[must_use]
    pub fn location(&self) -> String {
        self.path.join_key(&self.key)
    }

    fn describe_sources(&self) -> String {
        self.sources.join(" or ")
    }
}

/// A declared-key ⇒ required-key dependency between role sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyRule {
    /// Unique rule identifier.
    pub id: String,
    /// Human-readable explanation shown in reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Condition that activates the rule.
    pub trigger: KeyCondition,
    /// Condition that must hold whenever the trigger holds.
    pub requirement: KeyCondition,
}

impl DependencyRule {
    /// Creates a rule without a description.
    #[must_use]
    pub fn new(id: impl Into<String>, trigger: KeyCondition, requirement: KeyCondition) -> Self {
        Self {
            id: id.into(),
            description: None,
            trigger,
            requirement,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The built-in rule: a declared `features.central_database` in `vars` or
    /// `config` requires `docker.services.database` in `config`.
    #[must_use]
    pub fn central_database() -> Self {
        Self::new(
            CENTRAL_DATABASE_RULE,
            KeyCondition::new(
                [VARS, CONFIG],
                KeyPath::parse("features").unwrap_or_default(),
                "central_database",
            ),
            KeyCondition::new(
                [CONFIG],
                KeyPath::parse("docker.services").unwrap_or_default(),
                "database",
            ),
        )
        .with_description(
            "The 'central_database' feature is only available if \
             'docker.services.database' is defined in config/main.yml.",
        )
    }

    /// Returns the message used when the rule is violated.
    #[must_use]
    pub fn message(&self) -> String {
        self.description.clone().unwrap_or_else(|| {
            format!(
                "'{}' declared in {} requires '{}' in {}.",
                self.trigger.location(),
                self.trigger.describe_sources(),
                self.requirement.location(),
                self.requirement.describe_sources(),
            )
        })
    }

    /// Returns true if the rule is violated by the given sources.
    ///
    /// The requirement is only consulted once the trigger holds.
    pub fn is_violated<'a, F>(&self, mut lookup: F) -> bool
    where
        F: FnMut(&str) -> Option<&'a ConfigMapping>,
    {
        self.trigger.holds(&mut lookup) && !self.requirement.holds(&mut lookup)
    }

    /// Returns the sources referenced by either condition.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.trigger
            .sources
            .iter()
            .chain(&self.requirement.sources)
            .map(String::as_str)
    }

    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidRuleSet {
                reason: "rule id cannot be empty".to_string(),
            });
        }

        for (label, condition) in [("trigger", &self.trigger), ("requirement", &self.requirement)]
        {
            if condition.sources.is_empty() {
                return Err(Error::InvalidRuleSet {
                    reason: format!("rule '{}' {label} lists no sources", self.id),
                });
            }
            if condition.key.is_empty() {
                return Err(Error::InvalidRuleSet {
                    reason: format!("rule '{}' {label} has an empty key", self.id),
                });
            }
        }

        Ok(())
    }
}

/// An ordered collection of dependency rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    /// Rules, evaluated in order.
    pub rules: Vec<DependencyRule>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the built-in rules.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new().with_rule(DependencyRule::central_database())
    }

    /// Appends a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: DependencyRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over the rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &DependencyRule> {
        self.rules.iter()
    }

    /// Returns every source referenced by any rule, sorted and deduplicated.
    #[must_use]
    pub fn referenced_sources(&self) -> BTreeSet<&str> {
        self.rules.iter().flat_map(DependencyRule::sources).collect()
    }

    /// Checks rule ids are unique and every condition is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRuleSet`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            rule.validate()?;
            if !seen.insert(rule.id.as_str()) {
                return Err(Error::InvalidRuleSet {
                    reason: format!("duplicate rule id '{}'", rule.id),
                });
            }
        }
        Ok(())
    }

    /// Checks that every referenced source is registered in `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSource`] for the first unknown source.
    pub fn validate_sources(&self, layout: &SourceLayout) -> Result<()> {
        for rule in &self.rules {
            if let Some(unknown) = rule.sources().find(|s| !layout.contains(s)) {
                return Err(Error::InvalidSource {
                    name: unknown.to_string(),
                    reason: format!(
                        "referenced by rule '{}' but not in the layout (known: {})",
                        rule.id,
                        layout.names().collect::<Vec<_>>().join(", ")
                    ),
                });
            }
        }
        Ok(())
    }

    /// Parses and validates a rule set from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the rules are invalid.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let rules: Self = serde_yaml::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Loads and validates a rule set from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content is invalid.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::RuleLoadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }
}
