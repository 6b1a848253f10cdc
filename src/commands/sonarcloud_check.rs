/// `sonarcloud-check`: quality gate, project metrics, and file coverage.
use std::time::Duration;

use crate::aggregate::Verdict;
use crate::cli::OutputCtx;
use crate::cli::SonarCheckArgs;
use crate::cli::output::write_quality_status;
use crate::errors::StatusError;
use crate::sonar::model::CoverageSummary;
use crate::sonar::{
    QualityQuery, QualitySource, SonarClient, fetch_snapshot, format_quality_report,
    quality_verdict,
};
use crate::types::QualityStatusOutput;

/// Run `sonarcloud-check` against the configured API.
///
/// # Errors
///
/// Returns `StatusError` on transport or decode failures.
pub fn run(args: &SonarCheckArgs, ctx: &OutputCtx) -> Result<Verdict, StatusError> {
    let client = SonarClient::new(&args.api_url, Duration::from_secs(args.timeout))?;
    run_with(args, ctx, &client)
}

/// Run `sonarcloud-check` with an explicit data source.
///
/// # Errors
///
/// See [`run`].
pub fn run_with(
    args: &SonarCheckArgs,
    ctx: &OutputCtx,
    source: &dyn QualitySource,
) -> Result<Verdict, StatusError> {
    let query = QualityQuery {
        project_key: args.project.clone(),
        organization: args.organization.clone(),
        component: args.component.clone(),
        page_size: args.limit as usize,
    };

    let timer = ctx.timer("fetch_snapshot");
    let snapshot = fetch_snapshot(source, &query)?;
    drop(timer);
    tracing::info!(
        project = %query.project_key,
        gate = snapshot.gate.as_str(),
        files = snapshot.files.len(),
        "fetched quality snapshot"
    );

    let verdict = quality_verdict(&snapshot);
    let report = format_quality_report(&query, &snapshot);
    let status = QualityStatusOutput {
        project: &query.project_key,
        organization: query.organization.as_deref(),
        component: query.component.as_deref(),
        snapshot: &snapshot,
        coverage_summary: CoverageSummary::tally(&snapshot.files),
        verdict,
        healthy: verdict.is_healthy(),
    };
    write_quality_status(&status, &report, ctx);
    Ok(verdict)
}
