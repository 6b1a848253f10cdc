/// Blocking SonarCloud Web API client.
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use super::model::{FileCoverage, GateStatus, ProjectMeasures, QualityQuery, QualitySnapshot};
use super::wire::{
    AnalysesResponse, ComponentMeasuresResponse, ComponentTreeResponse, ProjectStatusResponse,
};
use crate::errors::StatusError;

/// Public SonarCloud API root.
pub const DEFAULT_API_URL: &str = "https://sonarcloud.io/api";

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest page `measures/component_tree` serves.
pub const MAX_PAGE_SIZE: usize = 500;

const PROJECT_METRICS: &str = "coverage,bugs,vulnerabilities,code_smells,security_hotspots,lines";
const FILE_METRICS: &str = "coverage,lines_to_cover,uncovered_lines";

/// Read-only quality queries, one method per endpoint.
pub trait QualitySource {
    /// # Errors
    ///
    /// Returns `StatusError::Transport` or `StatusError::Decode` on failure.
    fn gate_status(&self, project_key: &str) -> Result<GateStatus, StatusError>;

    /// # Errors
    ///
    /// Returns `StatusError::Transport` or `StatusError::Decode` on failure.
    fn project_measures(&self, project_key: &str) -> Result<ProjectMeasures, StatusError>;

    /// Date of the most recent analysis; `None` if the project was never analysed.
    ///
    /// # Errors
    ///
    /// Returns `StatusError::Transport` or `StatusError::Decode` on failure.
    fn latest_analysis(&self, project_key: &str) -> Result<Option<String>, StatusError>;

    /// # Errors
    ///
    /// Returns `StatusError::Transport` or `StatusError::Decode` on failure.
    fn file_coverage(
        &self,
        project_key: &str,
        page_size: usize,
    ) -> Result<Vec<FileCoverage>, StatusError>;
}

/// Fetch everything the report needs, in report order.
///
/// The component filter is applied here, to file paths, by prefix.
///
/// # Errors
///
/// Propagates the first fetch failure; there is no retry.
pub fn fetch_snapshot(
    source: &dyn QualitySource,
    query: &QualityQuery,
) -> Result<QualitySnapshot, StatusError> {
    let key = query.project_key.as_str();
    let last_analysis = source.latest_analysis(key)?;
    let gate = source.gate_status(key)?;
    let measures = source.project_measures(key)?;
    let mut files = source.file_coverage(key, query.page_size.min(MAX_PAGE_SIZE))?;

    if let Some(prefix) = &query.component {
        files.retain(|f| f.path.starts_with(prefix.as_str()));
    }

    Ok(QualitySnapshot {
        gate,
        measures,
        last_analysis,
        files,
    })
}

/// HTTP implementation of [`QualitySource`].
#[derive(Debug, Clone)]
pub struct SonarClient {
    http: Client,
    base_url: String,
}

impl SonarClient {
    /// Build a client against `base_url` (usually [`DEFAULT_API_URL`]).
    ///
    /// # Errors
    ///
    /// Returns `StatusError::Transport` if the TLS backend cannot initialise.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StatusError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("statuscheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StatusError::Transport {
                endpoint: base_url.to_owned(),
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, StatusError> {
        let url = format!("{}/{endpoint}", self.base_url);
        tracing::debug!(%url, ?params, "GET");

        let transport = |message: String| StatusError::Transport {
            endpoint: url.clone(),
            message,
        };

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(transport(format!("HTTP {status}")));
        }

        response.json().map_err(|e| StatusError::Decode {
            what: endpoint.to_owned(),
            message: e.to_string(),
        })
    }
}

impl QualitySource for SonarClient {
    fn gate_status(&self, project_key: &str) -> Result<GateStatus, StatusError> {
        let resp: ProjectStatusResponse = self.get(
            "qualitygates/project_status",
            &[("projectKey", project_key.to_owned())],
        )?;
        Ok(resp.into_gate())
    }

    fn project_measures(&self, project_key: &str) -> Result<ProjectMeasures, StatusError> {
        let resp: ComponentMeasuresResponse = self.get(
            "measures/component",
            &[
                ("component", project_key.to_owned()),
                ("metricKeys", PROJECT_METRICS.to_owned()),
            ],
        )?;
        Ok(resp.into_measures())
    }

    fn latest_analysis(&self, project_key: &str) -> Result<Option<String>, StatusError> {
        let resp: AnalysesResponse = self.get(
            "project_analyses/search",
            &[("project", project_key.to_owned()), ("ps", "1".to_owned())],
        )?;
        Ok(resp.into_latest_date())
    }

    fn file_coverage(
        &self,
        project_key: &str,
        page_size: usize,
    ) -> Result<Vec<FileCoverage>, StatusError> {
        let resp: ComponentTreeResponse = self.get(
            "measures/component_tree",
            &[
                ("component", project_key.to_owned()),
                ("metricKeys", FILE_METRICS.to_owned()),
                ("qualifiers", "FIL".to_owned()),
                ("ps", page_size.to_string()),
            ],
        )?;
        Ok(resp.into_files())
    }
}
