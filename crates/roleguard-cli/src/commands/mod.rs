//! CLI commands and argument parsing.

pub mod check;
pub mod rules;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roleguard_core::RuleSet;

/// roleguard - cross-file consistency checks for role configuration
#[derive(Parser)]
#[command(name = "roleguard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Check roles against the dependency rules
    Check(check::CheckArgs),

    /// List the effective dependency rules
    Rules(rules::RulesArgs),

    /// Print version information
    Version,
}

/// Loads the rule set from `path`, or the built-in rules when absent.
pub fn load_rules(path: Option<&Path>) -> Result<RuleSet> {
    match path {
        Some(path) => RuleSet::from_yaml_file(path)
            .with_context(|| format!("Failed to load rules from {}", path.display())),
        None => Ok(RuleSet::builtin()),
    }
}
