//! Scenario outcomes and their line-oriented rendering.

use std::fmt;
use std::io::{self, Write};

pub const PASS_MARKER: &str = "✅";
pub const FAIL_MARKER: &str = "❌";

/// One schema violation, located by a JSONPath-style path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.path, self.message)
    }
}

/// Outcome of a single scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub context: String,
    pub passed: bool,
    /// Why a scenario failed when the cause is not a schema violation.
    pub reason: Option<String>,
    pub violations: Vec<Violation>,
}

impl ScenarioReport {
    pub fn pass(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            passed: true,
            reason: None,
            violations: Vec::new(),
        }
    }

    pub fn fail(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            passed: false,
            reason: Some(reason.into()),
            violations: Vec::new(),
        }
    }

    /// Pass when `violations` is empty, fail listing them otherwise.
    pub fn from_violations(context: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            context: context.into(),
            passed: violations.is_empty(),
            reason: None,
            violations,
        }
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.passed { PASS_MARKER } else { FAIL_MARKER };
        write!(f, "{marker} {}", self.context)?;
        if let Some(reason) = &self.reason {
            write!(f, " - {}", single_line(reason))?;
        }
        for violation in &self.violations {
            write!(f, "\n    - {violation}")?;
        }
        Ok(())
    }
}

/// Response bodies quoted in a reason may span lines; the report keeps one
/// line per scenario.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Every scenario outcome of one run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub scenarios: Vec<ScenarioReport>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.scenarios.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.scenarios.iter().all(|s| s.passed)
    }
}

/// Writes each scenario as soon as it finishes and keeps it for the summary.
pub struct ReportWriter<W> {
    out: W,
    report: Report,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            report: Report::default(),
        }
    }

    pub fn record(&mut self, scenario: ScenarioReport) -> io::Result<()> {
        writeln!(self.out, "{scenario}")?;
        self.out.flush()?;
        self.report.scenarios.push(scenario);
        Ok(())
    }

    pub fn finish(self) -> Report {
        self.report
    }
}
