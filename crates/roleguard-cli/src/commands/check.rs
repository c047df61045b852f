//! Check command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::info;

use roleguard_check::{
    CheckConfig, ConsoleReporter, DiscoveryConfig, JsonReporter, MalformedPolicy, Reporter,
    RuleEvaluator,
};
use roleguard_core::SourceLayout;

use super::load_rules;

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing.
    Console,
    /// Machine-readable JSON.
    Json,
}

/// Result of a check that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No violations were found.
    Clean,
    /// At least one violation was found.
    Violations,
}

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Directory containing one subdirectory per role
    #[arg(default_value = "roles", env = "ROLEGUARD_ROLES_DIR")]
    pub roles_dir: PathBuf,

    /// YAML rules file replacing the built-in rules
    #[arg(long, env = "ROLEGUARD_RULES")]
    pub rules: Option<PathBuf>,

    /// Register or override a source location (NAME=PATH, relative to the role)
    #[arg(long = "source", value_name = "NAME=PATH", value_parser = parse_source)]
    pub sources: Vec<(String, PathBuf)>,

    /// Report sources that are not a mapping instead of treating them as empty
    #[arg(long)]
    pub strict: bool,

    /// Directory names that are not roles
    #[arg(long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Skip role directories starting with '.'
    #[arg(long)]
    pub skip_hidden: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "console")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

fn parse_source(value: &str) -> std::result::Result<(String, PathBuf), String> {
    let (name, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{value}'"))?;
    if name.is_empty() || path.is_empty() {
        return Err(format!("expected NAME=PATH, got '{value}'"));
    }
    Ok((name.to_string(), PathBuf::from(path)))
}

impl CheckArgs {
    /// Builds the library configuration from the arguments.
    fn to_config(&self) -> Result<CheckConfig> {
        let mut layout = SourceLayout::default();
        for (name, path) in &self.sources {
            layout = layout
                .with_source(name.clone(), path.clone())
                .with_context(|| format!("Invalid --source {name}={}", path.display()))?;
        }

        let mut discovery = DiscoveryConfig::new().with_skip_hidden(self.skip_hidden);
        for dir in &self.exclude {
            discovery = discovery.exclude_dir(dir.clone());
        }

        let malformed = if self.strict {
            MalformedPolicy::Strict
        } else {
            MalformedPolicy::Lenient
        };

        Ok(CheckConfig::new()
            .with_roles_root(&self.roles_dir)
            .with_discovery(discovery)
            .with_layout(layout)
            .with_malformed(malformed))
    }
}

/// Runs the check command.
pub fn run(args: &CheckArgs, verbose: bool) -> Result<CheckOutcome> {
    info!(path = ?args.roles_dir, strict = args.strict, "Checking roles");

    let rules = load_rules(args.rules.as_deref())?;
    let evaluator = RuleEvaluator::new(args.to_config()?, rules)?;

    let report = evaluator
        .run()
        .with_context(|| format!("Check of {} could not complete", args.roles_dir.display()))?;

    match args.output {
        OutputFormat::Console => ConsoleReporter::new()
            .with_colors(!args.no_color)
            .with_verbose(verbose)
            .report(&report)?,
        OutputFormat::Json => JsonReporter::new().with_pretty(true).report(&report)?,
    }

    if report.is_clean() {
        Ok(CheckOutcome::Clean)
    } else {
        Ok(CheckOutcome::Violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn args(roles_dir: &Path) -> CheckArgs {
        CheckArgs {
            roles_dir: roles_dir.to_path_buf(),
            rules: None,
            sources: Vec::new(),
            strict: false,
            exclude: Vec::new(),
            skip_hidden: false,
            output: OutputFormat::Console,
            no_color: true,
        }
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_parse_source() {
        assert_eq!(
            parse_source("defaults=defaults/main.yml").unwrap(),
            ("defaults".to_string(), PathBuf::from("defaults/main.yml"))
        );
        assert!(parse_source("defaults").is_err());
        assert!(parse_source("=x.yml").is_err());
    }

    #[test]
    fn test_clean_run() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("web")).unwrap();

        assert_eq!(run(&args(temp.path()), false).unwrap(), CheckOutcome::Clean);
    }

    #[test]
    fn test_violations_outcome() {
        let temp = TempDir::new().unwrap();
        write(
            &temp.path().join("api/vars/main.yml"),
            "features:\n  central_database: true\n",
        );

        assert_eq!(
            run(&args(temp.path()), false).unwrap(),
            CheckOutcome::Violations
        );
    }

    #[test]
    fn test_fatal_error_is_distinct() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("api/config/main.yml"), "docker: [\n");

        assert!(run(&args(temp.path()), false).is_err());
        assert!(run(&args(&temp.path().join("missing")), false).is_err());
    }

    #[test]
    fn test_strict_flag() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("api/vars/main.yml"), "- item\n");

        assert_eq!(run(&args(temp.path()), false).unwrap(), CheckOutcome::Clean);

        let mut strict = args(temp.path());
        strict.strict = true;
        strict.output = OutputFormat::Json;
        assert_eq!(run(&strict, false).unwrap(), CheckOutcome::Violations);
    }

    #[test]
    fn test_rules_file_and_extra_source() {
        let temp = TempDir::new().unwrap();
        let roles = temp.path().join("roles");
        write(&roles.join("api/defaults/main.yml"), "tls: true\n");

        let rules_file = temp.path().join("rules.yml");
        write(
            &rules_file,
            "rules:\n  - id: tls-needs-cert\n    \
             trigger: { sources: [defaults], key: tls }\n    \
             requirement: { sources: [vars], path: certs, key: server }\n",
        );

        let mut check = args(&roles);
        check.rules = Some(rules_file);
        assert!(run(&check, false).is_err(), "unknown source must be fatal");

        check.sources = vec![("defaults".to_string(), PathBuf::from("defaults/main.yml"))];
        assert_eq!(run(&check, false).unwrap(), CheckOutcome::Violations);
    }

    #[test]
    fn test_exclude_and_hidden() {
        let temp = TempDir::new().unwrap();
        let trigger = "features:\n  central_database: true\n";
        write(&temp.path().join(".cache/vars/main.yml"), trigger);
        write(&temp.path().join("templates/vars/main.yml"), trigger);

        let mut check = args(temp.path());
        check.skip_hidden = true;
        check.exclude = vec!["templates".to_string()];
        assert_eq!(run(&check, false).unwrap(), CheckOutcome::Clean);
    }
}
