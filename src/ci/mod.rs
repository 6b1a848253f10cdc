/// GitHub Actions layer: run records, `gh` fetching, report formatting.
pub mod gh;
pub mod report;
pub mod run;

pub use gh::{GhCli, RunQuery, RunSource};
pub use report::{ci_verdict, format_ci_report};
pub use run::{RunConclusion, RunRecord, RunStatus, RunSummary};
