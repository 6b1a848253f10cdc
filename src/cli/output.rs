/// Output formatting: text report, table, and JSON modes.
use std::io::Write;

use comfy_table::{Cell, Table, presets::UTF8_BORDERS_ONLY};
use serde::Serialize;

use super::args::{CommonArgs, OutputFormat};
use crate::ci::run::run_badge;
use crate::report::{RUN_TIME_FORMAT, Report, format_timestamp};
use crate::sonar::report::{format_metrics, partition_files};
use crate::types::{CiStatusOutput, ErrorOutput, QualityStatusOutput};

/// Resolve the effective output format, handling the `--json` flag.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag { OutputFormat::Json } else { fmt }
}

/// Output context passed to all writers.
#[derive(Debug, Clone)]
pub struct OutputCtx {
    pub format: OutputFormat,
    pub no_header: bool,
    /// Time fetch steps; on whenever debug events would be recorded.
    pub timings: bool,
}

impl OutputCtx {
    /// Construct from CLI args. Call after the log subscriber is installed.
    #[must_use]
    pub fn new(common: &CommonArgs) -> Self {
        Self {
            format: resolve_format(common.output, common.json),
            no_header: common.no_header,
            timings: tracing::enabled!(tracing::Level::DEBUG),
        }
    }

    /// Start a named timer. Logs elapsed time at debug level on drop.
    #[must_use]
    pub fn timer(&self, label: &'static str) -> DebugTimer {
        DebugTimer::new(label, self.timings)
    }
}

impl Default for OutputCtx {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            no_header: false,
            timings: false,
        }
    }
}

// --- CI runs ---

/// Write the `ci-check` result to stdout.
pub fn write_ci_status(status: &CiStatusOutput<'_>, report: &Report, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => print_json(status),
        OutputFormat::Compact => print_compact_json(status),
        OutputFormat::Table => println!("{}", ci_table_view(status, ctx)),
    }
}

/// Repository context, then the runs table and a one-line summary.
fn ci_table_view(status: &CiStatusOutput<'_>, ctx: &OutputCtx) -> Report {
    let mut view = Report::new();
    view.line(format!("Repository: {}", status.repository));
    if let Some(workflow) = status.workflow {
        view.line(format!("Workflow: {workflow}"));
    }
    view.blank();

    if status.runs.is_empty() {
        view.line("No workflow runs found.");
        return view;
    }

    let s = &status.summary;
    view.line(runs_table(status, ctx).to_string())
        .blank()
        .line(format!(
            "Summary: {} total, {} successful, {} failed, {} other",
            s.total(),
            s.successful,
            s.failed,
            s.other
        ));
    view
}

fn runs_table(status: &CiStatusOutput<'_>, ctx: &OutputCtx) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if !ctx.no_header {
        table.set_header(["STATUS", "NAME", "ID", "BRANCH", "EVENT", "TIME"]);
    }
    for run in status.runs {
        let (icon, label) = run_badge(&run.status, run.conclusion.as_ref());
        table.add_row([
            format!("{icon} {label}"),
            run.name.clone(),
            run.id.map(|id| id.to_string()).unwrap_or_default(),
            run.branch.clone(),
            run.event.clone(),
            format_timestamp(&run.created_at, RUN_TIME_FORMAT),
        ]);
    }
    table
}

// --- Quality ---

/// Write the `sonarcloud-check` result to stdout.
pub fn write_quality_status(status: &QualityStatusOutput<'_>, report: &Report, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => print_json(status),
        OutputFormat::Compact => print_compact_json(status),
        OutputFormat::Table => println!("{}", quality_table_view(status, ctx)),
    }
}

/// Project context, gate and metrics, then the file coverage table.
fn quality_table_view(status: &QualityStatusOutput<'_>, ctx: &OutputCtx) -> Report {
    let mut view = Report::new();
    view.line(format!("Project: {}", status.project));
    if let Some(org) = status.organization {
        view.line(format!("Organization: {org}"));
    }
    if let Some(component) = status.component {
        view.line(format!("Component: {component}"));
    }
    let gate = &status.snapshot.gate;
    view.blank()
        .line(format!("Quality Gate: {} {}", gate.icon(), gate.as_str()))
        .blank();
    for line in format_metrics(&status.snapshot.measures) {
        view.line(line);
    }
    view.blank();

    if status.snapshot.files.is_empty() {
        view.line("No files found in analysis");
    } else {
        view.line(files_table(status, ctx).to_string());
    }
    view
}

fn files_table(status: &QualityStatusOutput<'_>, ctx: &OutputCtx) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if !ctx.no_header {
        table.set_header([
            Cell::new("PATH"),
            Cell::new("COVERAGE"),
            Cell::new("LINES"),
            Cell::new("UNCOVERED"),
        ]);
    }
    let opt = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_default();
    let (with, without) = partition_files(&status.snapshot.files);
    for file in with.into_iter().chain(without) {
        table.add_row([
            file.path.clone(),
            file.coverage.map(|c| format!("{c:.1}%")).unwrap_or_default(),
            opt(file.lines_to_cover),
            opt(file.uncovered_lines),
        ]);
    }
    table
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat) {
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    match format {
        OutputFormat::Json | OutputFormat::Compact => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        OutputFormat::Text | OutputFormat::Table => {
            let _ = writeln!(out, "Error: {}", err.error.message);
            if let Some(hint) = &err.error.hint {
                let _ = writeln!(out, "{hint}");
            }
        }
    }
}

// --- Debug timer ---

/// A RAII timer that logs elapsed milliseconds on drop.
///
/// Created via [`OutputCtx::timer`]. Inactive timers record nothing.
pub struct DebugTimer {
    label: &'static str,
    start: std::time::Instant,
    active: bool,
}

impl DebugTimer {
    #[must_use]
    fn new(label: &'static str, active: bool) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
            active,
        }
    }
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        if self.active {
            let ms = self.start.elapsed().as_secs_f64() * 1000.0;
            tracing::debug!(step = self.label, elapsed_ms = %format!("{ms:.2}"), "timing");
        }
    }
}

// --- Generic JSON helpers ---

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_compact_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}
