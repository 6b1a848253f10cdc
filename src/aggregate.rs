/// Exit-code mapping and the combined verdict of several checks.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::FAILURE_EXIT;
use crate::report::{Report, icon};

/// Health of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Healthy,
    Unhealthy,
}

impl Verdict {
    /// 0 for healthy, 1 otherwise.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Healthy => 0,
            Self::Unhealthy => FAILURE_EXIT,
        }
    }

    /// Any non-zero exit code is unhealthy.
    #[must_use]
    pub fn from_exit_code(code: i32) -> Self {
        if code == 0 { Self::Healthy } else { Self::Unhealthy }
    }

    #[must_use]
    pub fn is_healthy(self) -> bool {
        self == Self::Healthy
    }
}

/// The sub-checks `project-status` knows how to run, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckName {
    Ci,
    SonarCloud,
}

impl CheckName {
    /// Label in the overall summary.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ci => "CI",
            Self::SonarCloud => "SonarCloud",
        }
    }

    /// Section heading printed before the check's own report.
    #[must_use]
    pub fn section_title(self) -> &'static str {
        match self {
            Self::Ci => "GITHUB ACTIONS CI",
            Self::SonarCloud => "SONARCLOUD ANALYSIS",
        }
    }

    /// Executable implementing the check.
    #[must_use]
    pub fn binary(self) -> &'static str {
        match self {
            Self::Ci => "ci-check",
            Self::SonarCloud => "sonarcloud-check",
        }
    }
}

/// Exit codes keyed by check name.
///
/// Skipped checks are simply absent, so lookups never depend on which other
/// checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutcomes {
    codes: BTreeMap<CheckName, i32>,
}

impl CheckOutcomes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, check: CheckName, exit_code: i32) {
        self.codes.insert(check, exit_code);
    }

    #[cfg(test)]
    pub(crate) fn get(&self, check: CheckName) -> Option<Verdict> {
        self.codes.get(&check).copied().map(Verdict::from_exit_code)
    }

    /// Checks that ran, in run order, with their verdicts.
    pub fn iter(&self) -> impl Iterator<Item = (CheckName, Verdict)> + '_ {
        self.codes
            .iter()
            .map(|(name, code)| (*name, Verdict::from_exit_code(*code)))
    }

    /// Healthy only if every recorded check is healthy; vacuously healthy when
    /// nothing ran.
    #[must_use]
    pub fn overall(&self) -> Verdict {
        if self.iter().all(|(_, v)| v.is_healthy()) {
            Verdict::Healthy
        } else {
            Verdict::Unhealthy
        }
    }
}

fn section(report: &mut Report, title: &str) {
    report.blank().blank().heavy_rule().line(title).heavy_rule();
}

/// Heading printed before a sub-check runs.
#[must_use]
pub fn format_section_header(check: CheckName) -> Report {
    let mut report = Report::new();
    section(&mut report, &format!("  {}", check.section_title()));
    report
}

/// The closing `OVERALL STATUS` block.
#[must_use]
pub fn format_overall(outcomes: &CheckOutcomes) -> Report {
    let mut report = Report::new();
    section(&mut report, "OVERALL STATUS");

    if outcomes.overall().is_healthy() {
        report
            .line(format!("{} All checks passed!", icon::OK))
            .blank()
            .heavy_rule();
        return report;
    }

    report
        .line(format!("{} Some checks failed!", icon::FAIL))
        .blank();
    for (check, verdict) in outcomes.iter() {
        let status = if verdict.is_healthy() {
            format!("{} PASSED", icon::OK)
        } else {
            format!("{} FAILED", icon::FAIL)
        };
        report.line(format!("  {}: {status}", check.label()));
    }
    report.blank().heavy_rule();
    report
}
