/// `ci-check`: recent GitHub Actions runs for the current repository.
use crate::aggregate::Verdict;
use crate::ci::{GhCli, RunQuery, RunSource, RunSummary, ci_verdict, format_ci_report};
use crate::cli::CiCheckArgs;
use crate::cli::OutputCtx;
use crate::cli::output::write_ci_status;
use crate::errors::StatusError;
use crate::identity::{GitRemote, RemoteSource, resolve_identity};
use crate::types::CiStatusOutput;

/// Run `ci-check` against `gh` and the `origin` remote.
///
/// # Errors
///
/// Returns `StatusError` if `gh` is missing or fails, or the repository
/// cannot be identified.
pub fn run(args: &CiCheckArgs, ctx: &OutputCtx) -> Result<Verdict, StatusError> {
    run_with(args, ctx, &GhCli::default(), &GitRemote::origin())
}

/// Run `ci-check` with explicit collaborators.
///
/// # Errors
///
/// See [`run`].
pub fn run_with(
    args: &CiCheckArgs,
    ctx: &OutputCtx,
    runs: &dyn RunSource,
    remote: &dyn RemoteSource,
) -> Result<Verdict, StatusError> {
    runs.ensure_available()?;

    let timer = ctx.timer("resolve_identity");
    let repo = resolve_identity(args.repo.as_deref(), remote)?;
    drop(timer);

    let query = RunQuery {
        repo,
        limit: args.limit as usize,
        workflow: args.workflow.clone(),
    };

    let timer = ctx.timer("recent_runs");
    let records = runs.recent_runs(&query)?;
    drop(timer);
    tracing::info!(repo = %query.repo, count = records.len(), "fetched workflow runs");

    let verdict = ci_verdict(&records);
    let report = format_ci_report(&query.repo, query.workflow.as_deref(), &records);
    let status = CiStatusOutput {
        repository: &query.repo,
        workflow: query.workflow.as_deref(),
        runs: &records,
        summary: RunSummary::tally(&records),
        verdict,
        healthy: verdict.is_healthy(),
    };
    write_ci_status(&status, &report, ctx);
    Ok(verdict)
}
