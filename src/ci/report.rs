/// Text report and verdict for workflow runs.
use super::run::{RunConclusion, RunRecord, RunSummary, run_badge};
use crate::aggregate::Verdict;
use crate::identity::RepoIdentity;
use crate::report::{RUN_TIME_FORMAT, Report, format_timestamp};

/// Two-line entry for one run.
#[must_use]
pub fn format_run(run: &RunRecord) -> [String; 2] {
    let (icon, label) = run_badge(&run.status, run.conclusion.as_ref());
    let id = run.id.map_or_else(|| "?".to_owned(), |id| id.to_string());
    let time = format_timestamp(&run.created_at, RUN_TIME_FORMAT);
    [
        format!("{icon} {label} - {} (#{id})", run.name),
        format!(
            "   Branch: {} | Event: {} | Time: {time}",
            run.branch, run.event
        ),
    ]
}

/// Build the full CI status report.
#[must_use]
pub fn format_ci_report(repo: &RepoIdentity, workflow: Option<&str>, runs: &[RunRecord]) -> Report {
    let mut report = Report::new();
    report
        .banner("GitHub Actions CI Status")
        .line(format!("Repository: {repo}"));
    if let Some(workflow) = workflow {
        report.line(format!("Workflow: {workflow}"));
    }
    report.blank();

    if runs.is_empty() {
        report.line("No workflow runs found.").blank().heavy_rule();
        return report;
    }

    report
        .line(format!("Recent Runs (showing {}):", runs.len()))
        .light_rule();
    for run in runs {
        for line in format_run(run) {
            report.line(line);
        }
    }

    let summary = RunSummary::tally(runs);
    report
        .blank()
        .line("Summary:")
        .light_rule()
        .line(format!("  Successful: {}", summary.successful))
        .line(format!("  Failed: {}", summary.failed))
        .line(format!("  Other: {}", summary.other))
        .blank()
        .heavy_rule();
    report
}

/// Unhealthy only when the most recent run concluded in failure.
///
/// An empty list is healthy: "no runs" is a successful fetch.
#[must_use]
pub fn ci_verdict(runs: &[RunRecord]) -> Verdict {
    match runs.first().and_then(|run| run.conclusion.as_ref()) {
        Some(RunConclusion::Failure) => Verdict::Unhealthy,
        _ => Verdict::Healthy,
    }
}
