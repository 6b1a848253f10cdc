/// SonarCloud layer: API client, response decoding, report formatting.
pub mod client;
pub mod model;
pub mod report;
pub mod wire;

pub use client::{QualitySource, SonarClient, fetch_snapshot};
pub use model::{FileCoverage, GateStatus, ProjectMeasures, QualityQuery, QualitySnapshot};
pub use report::{format_quality_report, quality_verdict};
