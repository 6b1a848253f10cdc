/// Text report and verdict for a quality snapshot.
use super::model::{CoverageSummary, FileCoverage, ProjectMeasures, QualityQuery, QualitySnapshot};
use crate::aggregate::Verdict;
use crate::report::{ANALYSIS_TIME_FORMAT, CoverageTier, Report, count_icon, format_timestamp};

fn or_unknown(value: Option<u64>) -> String {
    value.map_or_else(|| "?".to_owned(), |v| v.to_string())
}

/// One line of the file coverage section.
#[must_use]
pub fn format_file(file: &FileCoverage) -> String {
    let tier = CoverageTier::of(file.coverage);
    match file.coverage {
        Some(cov) => format!(
            "  {} {}: {cov:.1}% ({} lines, {} uncovered)",
            tier.icon(),
            file.path,
            or_unknown(file.lines_to_cover),
            or_unknown(file.uncovered_lines),
        ),
        None => format!("  {} {}: No coverage data", tier.icon(), file.path),
    }
}

/// The indented lines of the `Project Metrics` section.
#[must_use]
pub fn format_metrics(m: &ProjectMeasures) -> [String; 6] {
    [
        match m.coverage {
            Some(cov) => format!("  Coverage: {} {cov:.1}%", CoverageTier::of(Some(cov)).icon()),
            None => format!("  Coverage: {} No data", CoverageTier::NoData.icon()),
        },
        format!("  Bugs: {} {}", count_icon(m.bugs), m.bugs),
        format!(
            "  Vulnerabilities: {} {}",
            count_icon(m.vulnerabilities),
            m.vulnerabilities
        ),
        format!("  Code Smells: {}", m.code_smells),
        format!("  Security Hotspots: {}", m.security_hotspots),
        format!("  Lines of Code: {}", m.lines),
    ]
}

/// Files with data first, then files without, each sorted by path.
#[must_use]
pub fn partition_files(files: &[FileCoverage]) -> (Vec<&FileCoverage>, Vec<&FileCoverage>) {
    let (mut with, mut without): (Vec<_>, Vec<_>) =
        files.iter().partition(|f| f.coverage.is_some());
    with.sort_by(|a, b| a.path.cmp(&b.path));
    without.sort_by(|a, b| a.path.cmp(&b.path));
    (with, without)
}

/// Build the full SonarCloud status report.
#[must_use]
pub fn format_quality_report(query: &QualityQuery, snapshot: &QualitySnapshot) -> Report {
    let mut report = Report::new();
    report
        .banner("SonarCloud Status Check")
        .line(format!("Project: {}", query.project_key));
    if let Some(org) = &query.organization {
        report.line(format!("Organization: {org}"));
    }
    if let Some(component) = &query.component {
        report.line(format!("Component: {component}"));
    }
    report.blank();

    if let Some(date) = &snapshot.last_analysis {
        report
            .line(format!(
                "Last Analysis: {}",
                format_timestamp(date, ANALYSIS_TIME_FORMAT)
            ))
            .blank();
    }

    report
        .line(format!(
            "Quality Gate: {} {}",
            snapshot.gate.icon(),
            snapshot.gate.as_str()
        ))
        .blank();

    report.line("Project Metrics:").light_rule();
    for line in format_metrics(&snapshot.measures) {
        report.line(line);
    }
    report.blank();

    if snapshot.files.is_empty() {
        report.line("No files found in analysis");
    } else {
        report.line("File Coverage:").light_rule();
        let (with, without) = partition_files(&snapshot.files);
        for file in &with {
            report.line(format_file(file));
        }
        if !with.is_empty() && !without.is_empty() {
            report.blank();
        }
        for file in &without {
            report.line(format_file(file));
        }

        let summary = CoverageSummary::tally(&snapshot.files);
        report
            .blank()
            .line(format!("Total Files: {}", summary.total))
            .line(format!("With Coverage: {}", summary.with_coverage))
            .line(format!("Without Coverage: {}", summary.without_coverage));
    }

    report.blank().heavy_rule();
    report
}

/// Unhealthy only when the quality gate is `ERROR`.
#[must_use]
pub fn quality_verdict(snapshot: &QualitySnapshot) -> Verdict {
    if snapshot.gate.is_error() {
        Verdict::Unhealthy
    } else {
        Verdict::Healthy
    }
}
