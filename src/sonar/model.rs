/// Quality gate, project metrics, and per-file coverage.
use serde::{Serialize, Serializer};

use crate::report::icon;

/// Quality gate verdict as reported by SonarCloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateStatus {
    Ok,
    Error,
    Warn,
    /// `NONE`, `UNKNOWN`, or anything else; shown with the warning marker.
    Other(String),
}

impl GateStatus {
    #[must_use]
    pub fn from_api(raw: &str) -> Self {
        match raw {
            "OK" => Self::Ok,
            "ERROR" => Self::Error,
            "WARN" => Self::Warn,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "OK",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Other(s) => s,
        }
    }

    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Ok => icon::OK,
            Self::Error => icon::FAIL,
            Self::Warn | Self::Other(_) => icon::WARN,
        }
    }

    /// Only `ERROR` fails a check; warnings and unknown states do not.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl Serialize for GateStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Project-level metrics. Missing counts are zero; missing coverage is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectMeasures {
    pub coverage: Option<f64>,
    pub bugs: u64,
    pub vulnerabilities: u64,
    pub code_smells: u64,
    pub security_hotspots: u64,
    pub lines: u64,
}

/// Coverage of one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileCoverage {
    pub path: String,
    pub coverage: Option<f64>,
    pub lines_to_cover: Option<u64>,
    pub uncovered_lines: Option<u64>,
}

/// Everything one `sonarcloud-check` invocation fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualitySnapshot {
    pub gate: GateStatus,
    pub measures: ProjectMeasures,
    /// Raw date of the most recent analysis, if the project was ever analysed.
    pub last_analysis: Option<String>,
    pub files: Vec<FileCoverage>,
}

/// What to fetch.
#[derive(Debug, Clone)]
pub struct QualityQuery {
    pub project_key: String,
    pub organization: Option<String>,
    /// Path prefix restricting the file coverage list.
    pub component: Option<String>,
    /// Page size for the file listing (SonarCloud caps it at 500).
    pub page_size: usize,
}

/// Files with / without coverage data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoverageSummary {
    pub total: usize,
    pub with_coverage: usize,
    pub without_coverage: usize,
}

impl CoverageSummary {
    #[must_use]
    pub fn tally(files: &[FileCoverage]) -> Self {
        let with_coverage = files.iter().filter(|f| f.coverage.is_some()).count();
        Self {
            total: files.len(),
            with_coverage,
            without_coverage: files.len() - with_coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_status_icons() {
        assert_eq!(GateStatus::from_api("OK").icon(), icon::OK);
        assert_eq!(GateStatus::from_api("ERROR").icon(), icon::FAIL);
        assert_eq!(GateStatus::from_api("WARN").icon(), icon::WARN);
        assert_eq!(GateStatus::from_api("NONE").icon(), icon::WARN);
    }

    #[test]
    fn test_only_error_is_error() {
        assert!(GateStatus::Error.is_error());
        for raw in ["OK", "WARN", "NONE", "UNKNOWN"] {
            assert!(!GateStatus::from_api(raw).is_error(), "{raw}");
        }
    }

    #[test]
    fn test_other_keeps_raw_text() {
        assert_eq!(GateStatus::from_api("NONE").as_str(), "NONE");
    }

    #[test]
    fn test_coverage_summary() {
        let file = |path: &str, coverage: Option<f64>| FileCoverage {
            path: path.to_owned(),
            coverage,
            lines_to_cover: None,
            uncovered_lines: None,
        };
        let files = [file("a", Some(10.0)), file("b", None), file("c", Some(0.0))];
        let summary = CoverageSummary::tally(&files);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.with_coverage, 2);
        assert_eq!(summary.without_coverage, 1);
    }
}
