/// Workflow run listing via the GitHub CLI.
use std::process::Command;

use serde::Deserialize;

use super::run::{RunConclusion, RunRecord, RunStatus};
use crate::errors::StatusError;
use crate::identity::RepoIdentity;

/// Fields requested from `gh run list --json`.
pub const GH_RUN_FIELDS: &str =
    "databaseId,name,status,conclusion,createdAt,updatedAt,headBranch,event";

const GH_INSTALL_HINT: &str = "Install with: https://cli.github.com/";

/// Which runs to fetch.
#[derive(Debug, Clone)]
pub struct RunQuery {
    pub repo: RepoIdentity,
    /// Number of most recent runs.
    pub limit: usize,
    /// Workflow file or name filter.
    pub workflow: Option<String>,
}

/// Anything that can list recent workflow runs, newest first.
pub trait RunSource {
    /// Verify the backing client can be used at all.
    ///
    /// # Errors
    ///
    /// Returns `StatusError::ToolUnavailable` if the client is missing.
    fn ensure_available(&self) -> Result<(), StatusError> {
        Ok(())
    }

    /// Fetch up to `query.limit` runs. Zero runs is `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// Returns `StatusError` if the client fails or its output is malformed.
    fn recent_runs(&self, query: &RunQuery) -> Result<Vec<RunRecord>, StatusError>;
}

/// `gh` subprocess client. Authentication is whatever `gh auth` has set up.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
}

impl Default for GhCli {
    fn default() -> Self {
        Self {
            program: "gh".to_owned(),
        }
    }
}

impl GhCli {
    /// Use a different executable (a wrapper script, or a missing one in tests).
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn unavailable(&self) -> StatusError {
        StatusError::ToolUnavailable {
            tool: self.program.clone(),
            hint: GH_INSTALL_HINT.to_owned(),
        }
    }
}

impl RunSource for GhCli {
    fn ensure_available(&self) -> Result<(), StatusError> {
        match Command::new(&self.program).arg("--version").output() {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => {
                tracing::debug!(status = %output.status, "gh --version failed");
                Err(self.unavailable())
            }
            Err(err) => {
                tracing::debug!(%err, "gh could not be spawned");
                Err(self.unavailable())
            }
        }
    }

    fn recent_runs(&self, query: &RunQuery) -> Result<Vec<RunRecord>, StatusError> {
        let args = run_list_args(query);
        tracing::info!(program = %self.program, ?args, "listing workflow runs");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|_| self.unavailable())?;

        if !output.status.success() {
            return Err(StatusError::ToolFailed {
                tool: self.program.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        parse_runs(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Arguments for `gh run list`.
#[must_use]
pub fn run_list_args(query: &RunQuery) -> Vec<String> {
    let mut args: Vec<String> = ["run", "list", "--json", GH_RUN_FIELDS, "--limit"]
        .into_iter()
        .map(str::to_owned)
        .collect();
    args.push(query.limit.to_string());
    args.push("--repo".to_owned());
    args.push(query.repo.to_string());
    if let Some(workflow) = &query.workflow {
        args.push("--workflow".to_owned());
        args.push(workflow.clone());
    }
    args
}

/// Raw `gh run list --json` element. Every field is optional on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhRun {
    #[serde(default)]
    database_id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    conclusion: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    head_branch: Option<String>,
    #[serde(default)]
    event: Option<String>,
}

impl From<GhRun> for RunRecord {
    fn from(raw: GhRun) -> Self {
        Self {
            id: raw.database_id,
            name: raw.name.unwrap_or_else(|| "Unknown".to_owned()),
            status: RunStatus::from(raw.status.as_deref().unwrap_or("unknown")),
            conclusion: raw.conclusion.as_deref().and_then(RunConclusion::parse),
            branch: raw.head_branch.unwrap_or_else(|| "unknown".to_owned()),
            event: raw.event.unwrap_or_else(|| "unknown".to_owned()),
            created_at: raw.created_at.unwrap_or_default(),
        }
    }
}

/// Decode `gh run list --json` output. Blank output is an empty list.
///
/// # Errors
///
/// Returns `StatusError::Decode` if the output is not a JSON array of runs.
pub fn parse_runs(stdout: &str) -> Result<Vec<RunRecord>, StatusError> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    let raw: Vec<GhRun> = serde_json::from_str(stdout).map_err(|e| StatusError::Decode {
        what: "gh run list".to_owned(),
        message: e.to_string(),
    })?;
    Ok(raw.into_iter().map(RunRecord::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(workflow: Option<&str>) -> RunQuery {
        RunQuery {
            repo: "acme/widgets".parse().unwrap(),
            limit: 5,
            workflow: workflow.map(str::to_owned),
        }
    }

    #[test]
    fn test_args_without_workflow() {
        let args = run_list_args(&query(None));
        assert_eq!(
            args,
            [
                "run",
                "list",
                "--json",
                GH_RUN_FIELDS,
                "--limit",
                "5",
                "--repo",
                "acme/widgets"
            ]
        );
    }

    #[test]
    fn test_args_with_workflow() {
        let args = run_list_args(&query(Some("coverage.yml")));
        assert_eq!(&args[args.len() - 2..], ["--workflow", "coverage.yml"]);
    }

    #[test]
    fn test_parse_runs() {
        let json = r#"[
            {"databaseId": 42, "name": "CI", "status": "completed", "conclusion": "success",
             "createdAt": "2024-03-01T12:34:56Z", "updatedAt": "2024-03-01T12:40:00Z",
             "headBranch": "main", "event": "push"},
            {"databaseId": 43, "name": "Coverage", "status": "in_progress", "conclusion": "",
             "createdAt": "2024-03-01T13:00:00Z", "headBranch": "feature", "event": "pull_request"}
        ]"#;
        let runs = parse_runs(json).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].id, Some(42));
        assert_eq!(runs[0].conclusion, Some(RunConclusion::Success));
        assert_eq!(runs[1].status, RunStatus::InProgress);
        assert_eq!(runs[1].conclusion, None);
        assert_eq!(runs[1].branch, "feature");
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let runs = parse_runs("[{}]").unwrap();
        assert_eq!(runs[0].name, "Unknown");
        assert_eq!(runs[0].branch, "unknown");
        assert_eq!(runs[0].status, RunStatus::Other("unknown".to_owned()));
        assert_eq!(runs[0].id, None);
    }

    #[test]
    fn test_empty_output_is_empty_list() {
        assert!(parse_runs("[]").unwrap().is_empty());
        assert!(parse_runs("\n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_output() {
        let err = parse_runs("not json").unwrap_err();
        assert_eq!(err.code(), "decode_error");
    }

    #[test]
    fn test_missing_binary_is_tool_unavailable() {
        let gh = GhCli::with_program("statuscheck-no-such-gh-binary");
        let err = gh.ensure_available().unwrap_err();
        assert!(matches!(err, StatusError::ToolUnavailable { .. }));
        let err = gh.recent_runs(&query(None)).unwrap_err();
        assert!(matches!(err, StatusError::ToolUnavailable { .. }));
    }
}
