/// Shared serializable output types.
///
/// These are what `--output json` writes to stdout. They wrap the domain
/// records with the request context and the verdict.
use serde::Serialize;

use crate::aggregate::Verdict;
use crate::ci::{RunRecord, RunSummary};
use crate::errors::StatusError;
use crate::identity::RepoIdentity;
use crate::sonar::QualitySnapshot;
use crate::sonar::model::CoverageSummary;

/// Result of `ci-check`.
#[derive(Debug, Clone, Serialize)]
pub struct CiStatusOutput<'a> {
    pub repository: &'a RepoIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<&'a str>,
    pub runs: &'a [RunRecord],
    pub summary: RunSummary,
    pub verdict: Verdict,
    pub healthy: bool,
}

/// Result of `sonarcloud-check`.
#[derive(Debug, Clone, Serialize)]
pub struct QualityStatusOutput<'a> {
    pub project: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<&'a str>,
    #[serde(flatten)]
    pub snapshot: &'a QualitySnapshot,
    pub coverage_summary: CoverageSummary,
    pub verdict: Verdict,
    pub healthy: bool,
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (`snake_case`).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// What the user can do about it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorOutput {
    #[must_use]
    pub fn from_status_error(err: &StatusError) -> Self {
        Self {
            ok: false,
            error: ErrorDetail {
                code: err.code().to_owned(),
                message: err.to_string(),
                hint: err.hint(),
            },
        }
    }
}
