/// Workflow run records and their status vocabulary.
use serde::{Serialize, Serializer};

use crate::report::icon;

/// Lifecycle state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Queued,
    InProgress,
    Completed,
    /// Any state GitHub adds later (`waiting`, `requested`, ...), kept verbatim.
    Other(String),
}

impl RunStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for RunStatus {
    fn from(s: &str) -> Self {
        match s {
            "queued" => Self::Queued,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunConclusion {
    Success,
    Failure,
    Cancelled,
    Skipped,
    /// `timed_out`, `neutral`, `action_required`, ...
    Other(String),
}

impl RunConclusion {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Cancelled => "cancelled",
            Self::Skipped => "skipped",
            Self::Other(s) => s,
        }
    }

    /// `None` for the empty string `gh` reports while a run is unfinished.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "" => return None,
            "success" => Self::Success,
            "failure" => Self::Failure,
            "cancelled" => Self::Cancelled,
            "skipped" => Self::Skipped,
            other => Self::Other(other.to_owned()),
        })
    }
}

macro_rules! serialize_as_str {
    ($($ty:ty),*) => {$(
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    )*};
}

serialize_as_str!(RunStatus, RunConclusion);

/// One execution of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub id: Option<u64>,
    pub name: String,
    pub status: RunStatus,
    pub conclusion: Option<RunConclusion>,
    pub branch: String,
    pub event: String,
    /// Raw ISO-8601 creation time.
    pub created_at: String,
}

/// Icon and label for a run, e.g. `("✅", "SUCCESS")`.
///
/// Unrecognized states degrade to the unknown marker with the raw value
/// uppercased; this never fails.
#[must_use]
pub fn run_badge(status: &RunStatus, conclusion: Option<&RunConclusion>) -> (&'static str, String) {
    match status {
        RunStatus::Completed => match conclusion {
            Some(RunConclusion::Success) => (icon::OK, "SUCCESS".to_owned()),
            Some(RunConclusion::Failure) => (icon::FAIL, "FAILED".to_owned()),
            Some(RunConclusion::Cancelled) => (icon::WARN, "CANCELLED".to_owned()),
            Some(RunConclusion::Skipped) => (icon::WARN, "SKIPPED".to_owned()),
            Some(RunConclusion::Other(raw)) => (icon::UNKNOWN, raw.to_uppercase()),
            None => (icon::UNKNOWN, "UNKNOWN".to_owned()),
        },
        RunStatus::InProgress => (icon::RUNNING, "IN PROGRESS".to_owned()),
        RunStatus::Queued => (icon::QUEUED, "QUEUED".to_owned()),
        RunStatus::Other(raw) if raw.is_empty() => (icon::UNKNOWN, "UNKNOWN".to_owned()),
        RunStatus::Other(raw) => (icon::UNKNOWN, raw.to_uppercase()),
    }
}

/// Success / failure / other tallies over a list of runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub successful: usize,
    pub failed: usize,
    pub other: usize,
}

impl RunSummary {
    /// Count by scanning `runs` once; the three buckets always sum to `runs.len()`.
    #[must_use]
    pub fn tally(runs: &[RunRecord]) -> Self {
        runs.iter().fold(Self::default(), |mut acc, run| {
            match run.conclusion {
                Some(RunConclusion::Success) => acc.successful += 1,
                Some(RunConclusion::Failure) => acc.failed += 1,
                _ => acc.other += 1,
            }
            acc
        })
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.successful + self.failed + self.other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(conclusion: &str) -> RunRecord {
        RunRecord {
            id: Some(1),
            name: "CI".to_owned(),
            status: RunStatus::Completed,
            conclusion: RunConclusion::parse(conclusion),
            branch: "main".to_owned(),
            event: "push".to_owned(),
            created_at: "2024-03-01T12:34:56Z".to_owned(),
        }
    }

    #[test]
    fn test_badges_for_known_conclusions() {
        let cases = [
            ("success", icon::OK, "SUCCESS"),
            ("failure", icon::FAIL, "FAILED"),
            ("cancelled", icon::WARN, "CANCELLED"),
            ("skipped", icon::WARN, "SKIPPED"),
        ];
        for (raw, want_icon, want_label) in cases {
            let run = completed(raw);
            let (got_icon, got_label) = run_badge(&run.status, run.conclusion.as_ref());
            assert_eq!(got_icon, want_icon, "{raw}");
            assert_eq!(got_label, want_label, "{raw}");
        }
    }

    #[test]
    fn test_unknown_conclusion_degrades() {
        let run = completed("timed_out");
        assert_eq!(
            run_badge(&run.status, run.conclusion.as_ref()),
            (icon::UNKNOWN, "TIMED_OUT".to_owned())
        );
    }

    #[test]
    fn test_pending_states() {
        assert_eq!(
            run_badge(&RunStatus::InProgress, None),
            (icon::RUNNING, "IN PROGRESS".to_owned())
        );
        assert_eq!(
            run_badge(&RunStatus::Queued, None),
            (icon::QUEUED, "QUEUED".to_owned())
        );
        assert_eq!(
            run_badge(&RunStatus::from("waiting"), None),
            (icon::UNKNOWN, "WAITING".to_owned())
        );
    }

    #[test]
    fn test_empty_conclusion_is_none() {
        assert_eq!(RunConclusion::parse(""), None);
        assert_eq!(RunConclusion::parse("success"), Some(RunConclusion::Success));
    }

    #[test]
    fn test_summary_sums_to_len() {
        let mut runs: Vec<RunRecord> = ["success", "failure", "cancelled", "success", "neutral"]
            .into_iter()
            .map(completed)
            .collect();
        runs.push(RunRecord {
            status: RunStatus::InProgress,
            conclusion: None,
            ..completed("")
        });

        let summary = RunSummary::tally(&runs);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.other, 3);
        assert_eq!(summary.total(), runs.len());
    }

    #[test]
    fn test_serializes_as_wire_strings() {
        let json = serde_json::to_value(completed("skipped")).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["conclusion"], "skipped");
    }
}
