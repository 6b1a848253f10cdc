/// SonarCloud Web API response shapes and their conversion to the model.
///
/// Every container is defaulted so a sparse but valid response decodes to
/// empty values instead of failing.
use std::collections::HashMap;

use serde::Deserialize;

use super::model::{FileCoverage, GateStatus, ProjectMeasures};

/// `qualitygates/project_status`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatusResponse {
    #[serde(default)]
    pub project_status: ProjectStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectStatus {
    #[serde(default)]
    pub status: Option<String>,
}

/// `measures/component`
#[derive(Debug, Default, Deserialize)]
pub struct ComponentMeasuresResponse {
    #[serde(default)]
    pub component: MeasuredComponent,
}

/// A component with its measures; also the element type of `components`.
#[derive(Debug, Default, Deserialize)]
pub struct MeasuredComponent {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub measures: Vec<Measure>,
}

#[derive(Debug, Deserialize)]
pub struct Measure {
    pub metric: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// `project_analyses/search`
#[derive(Debug, Default, Deserialize)]
pub struct AnalysesResponse {
    #[serde(default)]
    pub analyses: Vec<Analysis>,
}

#[derive(Debug, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub date: Option<String>,
}

/// `measures/component_tree`
#[derive(Debug, Default, Deserialize)]
pub struct ComponentTreeResponse {
    #[serde(default)]
    pub components: Vec<MeasuredComponent>,
}

impl ProjectStatusResponse {
    #[must_use]
    pub fn into_gate(self) -> GateStatus {
        GateStatus::from_api(self.project_status.status.as_deref().unwrap_or("UNKNOWN"))
    }
}

impl AnalysesResponse {
    /// Date of the first (most recent) analysis.
    #[must_use]
    pub fn into_latest_date(self) -> Option<String> {
        self.analyses.into_iter().next().map(|a| a.date.unwrap_or_else(|| "Unknown".to_owned()))
    }
}

/// Metric key to raw value.
struct MeasureMap(HashMap<String, String>);

impl MeasureMap {
    fn new(measures: Vec<Measure>) -> Self {
        Self(
            measures
                .into_iter()
                .filter_map(|m| m.value.map(|v| (m.metric, v)))
                .collect(),
        )
    }

    fn float(&self, metric: &str) -> Option<f64> {
        let raw = self.0.get(metric)?;
        match raw.trim().parse::<f64>() {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!(metric, raw = %raw, %err, "ignoring non-numeric measure");
                None
            }
        }
    }

    fn count(&self, metric: &str) -> Option<u64> {
        let raw = self.0.get(metric)?;
        match raw.trim().parse::<u64>() {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!(metric, raw = %raw, %err, "ignoring non-integer measure");
                None
            }
        }
    }
}

impl ComponentMeasuresResponse {
    #[must_use]
    pub fn into_measures(self) -> ProjectMeasures {
        let m = MeasureMap::new(self.component.measures);
        ProjectMeasures {
            coverage: m.float("coverage"),
            bugs: m.count("bugs").unwrap_or(0),
            vulnerabilities: m.count("vulnerabilities").unwrap_or(0),
            code_smells: m.count("code_smells").unwrap_or(0),
            security_hotspots: m.count("security_hotspots").unwrap_or(0),
            lines: m.count("lines").unwrap_or(0),
        }
    }
}

impl ComponentTreeResponse {
    #[must_use]
    pub fn into_files(self) -> Vec<FileCoverage> {
        self.components
            .into_iter()
            .map(|c| {
                let m = MeasureMap::new(c.measures);
                FileCoverage {
                    path: c.path.unwrap_or_else(|| "Unknown".to_owned()),
                    coverage: m.float("coverage"),
                    lines_to_cover: m.count("lines_to_cover"),
                    uncovered_lines: m.count("uncovered_lines"),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_status() {
        let resp: ProjectStatusResponse =
            serde_json::from_str(r#"{"projectStatus": {"status": "ERROR", "conditions": []}}"#)
                .unwrap();
        assert_eq!(resp.into_gate(), GateStatus::Error);
    }

    #[test]
    fn test_missing_gate_is_unknown() {
        let resp: ProjectStatusResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.into_gate(), GateStatus::Other("UNKNOWN".to_owned()));
    }

    #[test]
    fn test_project_measures() {
        let resp: ComponentMeasuresResponse = serde_json::from_str(
            r#"{"component": {"key": "p", "measures": [
                {"metric": "coverage", "value": "85.3"},
                {"metric": "bugs", "value": "0"},
                {"metric": "vulnerabilities", "value": "2"},
                {"metric": "code_smells", "value": "14"},
                {"metric": "lines", "value": "1200"}
            ]}}"#,
        )
        .unwrap();
        let m = resp.into_measures();
        assert_eq!(m.coverage, Some(85.3));
        assert_eq!(m.vulnerabilities, 2);
        assert_eq!(m.code_smells, 14);
        assert_eq!(m.security_hotspots, 0);
        assert_eq!(m.lines, 1200);
    }

    #[test]
    fn test_missing_coverage_is_none_not_zero() {
        let json = r#"{"component": {"measures": [{"metric": "bugs", "value": "1"}]}}"#;
        let resp: ComponentMeasuresResponse = serde_json::from_str(json).unwrap();
        let m = resp.into_measures();
        assert_eq!(m.coverage, None);
        assert_eq!(m.bugs, 1);
    }

    #[test]
    fn test_latest_analysis() {
        let resp: AnalysesResponse = serde_json::from_str(
            r#"{"analyses": [{"key": "a1", "date": "2024-01-15T10:30:00+0000"}]}"#,
        )
        .unwrap();
        assert_eq!(
            resp.into_latest_date().as_deref(),
            Some("2024-01-15T10:30:00+0000")
        );

        let none: AnalysesResponse = serde_json::from_str(r#"{"analyses": []}"#).unwrap();
        assert_eq!(none.into_latest_date(), None);
    }

    #[test]
    fn test_component_tree() {
        let resp: ComponentTreeResponse = serde_json::from_str(
            r#"{"paging": {"total": 2}, "components": [
                {"path": "src/a.cpp", "measures": [
                    {"metric": "coverage", "value": "90.0"},
                    {"metric": "lines_to_cover", "value": "20"},
                    {"metric": "uncovered_lines", "value": "2"}
                ]},
                {"path": "include/a.h", "measures": []}
            ]}"#,
        )
        .unwrap();
        let files = resp.into_files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].coverage, Some(90.0));
        assert_eq!(files[0].lines_to_cover, Some(20));
        assert_eq!(files[1].path, "include/a.h");
        assert_eq!(files[1].coverage, None);
        assert_eq!(files[1].uncovered_lines, None);
    }
}
