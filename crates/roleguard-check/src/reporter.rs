//! Report rendering.
//!
//! This module provides formatters for check reports.

use std::fmt::Write as FmtWrite;
use std::io::{self, Write};

use crate::report::{Report, Violation, ViolationKind};

/// Trait for reporting check results.
pub trait Reporter {
    /// Reports the results of a check run.
    ///
    /// # Errors
    ///
    /// Returns an IO error if writing to output fails.
    fn report(&self, report: &Report) -> io::Result<()>;
}

/// Console reporter that outputs results to stdout.
#[derive(Debug)]
pub struct ConsoleReporter {
    /// Whether to use colors.
    use_colors: bool,
    /// Whether to list compliant roles too.
    verbose: bool,
}

impl ConsoleReporter {
    /// Creates a new console reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Sets whether to use colors.
    #[must_use]
    pub const fn with_colors(mut self, colors: bool) -> Self {
        self.use_colors = colors;
        self
    }

    /// Sets verbose mode.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("\x1b[{color}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    /// Formats a compliant role line.
    fn format_pass(&self, role: &str) -> String {
        format!("{} {role}", self.paint("✓", "32"))
    }

    /// Formats a violation line.
    fn format_violation(&self, violation: &Violation) -> String {
        let mut line = format!(
            "{} {} [{}]",
            self.paint("✗", "31"),
            violation.role,
            violation.rule_id
        );

        match &violation.kind {
            ViolationKind::MissingDependency { message } => {
                let _ = write!(line, "\n    {message}");
            }
            ViolationKind::MalformedSource { source, found } => {
                let _ = write!(line, "\n    Source '{source}' is a {found}, expected a mapping");
            }
        }

        line
    }

    /// Formats the summary line.
    fn format_summary(&self, report: &Report) -> String {
        let status = if report.is_clean() {
            self.paint("PASSED", "32")
        } else {
            self.paint("FAILED", "31")
        };

        format!(
            "\n{}: {} role(s) checked, {} violation(s) in {} role(s) ({:.2}s)",
            status,
            report.roles.len(),
            report.violation_count(),
            report.violating_roles().len(),
            report.duration.as_secs_f64()
        )
    }

    /// Renders the full console output.
    #[must_use]
    pub fn render(&self, report: &Report) -> String {
        let mut out = String::from("\nRole Check Results:\n");
        out.push_str(&"─".repeat(50));
        out.push('\n');

        if self.verbose {
            for role in report.compliant_roles() {
                out.push_str(&self.format_pass(role));
                out.push('\n');
            }
        }

        for violation in &report.violations {
            out.push_str(&self.format_violation(violation));
            out.push('\n');
        }

        if let Some(message) = report.failure_message() {
            out.push('\n');
            out.push_str(&message);
            out.push('\n');
        }

        out.push_str(&"─".repeat(50));
        out.push_str(&self.format_summary(report));
        out
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, report: &Report) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", self.render(report))?;
        Ok(())
    }
}

/// JSON reporter that outputs the report as JSON.
#[derive(Debug, Default)]
pub struct JsonReporter {
    /// Whether to pretty-print the JSON.
    pretty: bool,
}

impl JsonReporter {
    /// Creates a new JSON reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to pretty-print.
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Renders the report as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render(&self, report: &Report) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        }
    }
}

impl Reporter for JsonReporter {
    fn report(&self, report: &Report) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        let json = self.render(report).map_err(io::Error::other)?;
        writeln!(stdout, "{json}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample_report() -> Report {
        let mut report = Report::new();
        for role in ["api", "db-service", "worker"] {
            report.add_role(role);
        }
        report.add(Violation::missing_dependency(
            "api",
            "central-db",
            "Needs a database service.",
        ));
        report.add(Violation::malformed_source("worker", "vars", "sequence"));
        report.duration = Duration::from_millis(12);
        report
    }

    #[test]
    fn test_console_reporter_format_violation() {
        let reporter = ConsoleReporter::new().with_colors(false);
        let report = sample_report();

        let formatted = reporter.format_violation(&report.violations[0]);
        assert!(formatted.starts_with("✗ api [central-db]"));
        assert!(formatted.contains("Needs a database service."));

        let formatted = reporter.format_violation(&report.violations[1]);
        assert!(formatted.contains("Source 'vars' is a sequence"));
    }

    #[test]
    fn test_console_reporter_colors() {
        let reporter = ConsoleReporter::new();
        assert!(reporter.format_pass("db-service").contains("\x1b[32m"));

        let plain = ConsoleReporter::new().with_colors(false);
        assert_eq!(plain.format_pass("db-service"), "✓ db-service");
    }

    #[test]
    fn test_console_reporter_default_matches_new() {
        let default = ConsoleReporter::default();
        assert!(default.use_colors);
        assert!(!default.verbose);
        assert_eq!(default.format_pass("api"), ConsoleReporter::new().format_pass("api"));
    }

    #[test]
    fn test_console_reporter_summary_passed() {
        let reporter = ConsoleReporter::new().with_colors(false);
        let mut report = Report::new();
        report.add_role("db-service");

        let summary = reporter.format_summary(&report);
        assert!(summary.contains("PASSED"));
        assert!(summary.contains("1 role(s) checked"));
        assert!(summary.contains("0 violation(s)"));
    }

    #[test]
    fn test_console_reporter_summary_failed() {
        let reporter = ConsoleReporter::new().with_colors(false);
        let summary = reporter.format_summary(&sample_report());
        assert!(summary.contains("FAILED"));
        assert!(summary.contains("2 violation(s) in 2 role(s)"));
    }

    #[test]
    fn test_console_render_verbose() {
        let quiet = ConsoleReporter::new().with_colors(false).render(&sample_report());
        assert!(!quiet.contains("✓ db-service"));
        assert!(quiet.contains("Missing in roles:\n- api"));

        let verbose = ConsoleReporter::new()
            .with_colors(false)
            .with_verbose(true)
            .render(&sample_report());
        assert!(verbose.contains("✓ db-service"));
    }

    #[test]
    fn test_json_reporter_render() {
        let json = JsonReporter::new().render(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["roles"].as_array().unwrap().len(), 3);
        assert_eq!(value["violations"][0]["role"], "api");
        assert_eq!(value["violations"][1]["kind"], "malformed_source");

        let pretty = JsonReporter::new().with_pretty(true).render(&sample_report()).unwrap();
        assert!(pretty.contains('\n'));
    }
}
