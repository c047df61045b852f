//! Rules command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use roleguard_core::{DependencyRule, KeyCondition, RuleSet};

use super::load_rules;

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    /// YAML rules file replacing the built-in rules
    #[arg(long, env = "ROLEGUARD_RULES")]
    pub rules: Option<PathBuf>,

    /// Print the rules as a YAML rules file
    #[arg(long)]
    pub yaml: bool,
}

/// Runs the rules command.
pub fn run(args: &RulesArgs) -> Result<()> {
    let rules = load_rules(args.rules.as_deref())?;

    if args.yaml {
        print!("{}", serde_yaml::to_string(&rules)?);
    } else {
        print!("{}", render(&rules));
    }

    Ok(())
}

fn render(rules: &RuleSet) -> String {
    if rules.is_empty() {
        return "No rules defined\n".to_string();
    }
    rules.iter().map(render_rule).collect()
}

fn render_rule(rule: &DependencyRule) -> String {
    format!(
        "{}\n  when:     {}\n  requires: {}\n  message:  {}\n",
        rule.id,
        render_condition(&rule.trigger),
        render_condition(&rule.requirement),
        rule.message()
    )
}

fn render_condition(condition: &KeyCondition) -> String {
    format!(
        "{} in {}",
        condition.location(),
        condition.sources.join(", ")
    )
}
