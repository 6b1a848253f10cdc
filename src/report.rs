/// Building blocks shared by the text reports: line buffer, icons, tiers, timestamps.
use std::fmt;

use chrono::{DateTime, Utc};

/// Width of the `=` and `-` rules framing every report.
pub const RULE_WIDTH: usize = 70;

/// Timestamp pattern for workflow runs.
pub const RUN_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp pattern for quality analyses.
pub const ANALYSIS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Status markers.
pub mod icon {
    pub const OK: &str = "✅";
    pub const FAIL: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const RUNNING: &str = "🔄";
    pub const QUEUED: &str = "⏳";
    pub const UNKNOWN: &str = "❓";
}

/// An ordered sequence of report lines, built incrementally and printed once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line.
    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(text.into());
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.line(String::new())
    }

    /// `=` rule.
    pub fn heavy_rule(&mut self) -> &mut Self {
        self.line("=".repeat(RULE_WIDTH))
    }

    /// `-` rule.
    pub fn light_rule(&mut self) -> &mut Self {
        self.line("-".repeat(RULE_WIDTH))
    }

    /// A title framed by heavy rules.
    pub fn banner(&mut self, title: &str) -> &mut Self {
        self.heavy_rule().line(title).heavy_rule()
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether any line contains `needle`.
    #[cfg(test)]
    pub(crate) fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Coverage classification.
///
/// Each threshold is inclusive: 80.0 is `Good`, 79.9 is `Warn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageTier {
    /// 80% and above.
    Good,
    /// 60% up to 80%.
    Warn,
    /// Below 60%.
    Poor,
    /// The service reported no coverage at all.
    NoData,
}

impl CoverageTier {
    pub const GOOD_THRESHOLD: f64 = 80.0;
    pub const WARN_THRESHOLD: f64 = 60.0;

    #[must_use]
    pub fn of(percent: Option<f64>) -> Self {
        match percent {
            None => Self::NoData,
            Some(p) if p >= Self::GOOD_THRESHOLD => Self::Good,
            Some(p) if p >= Self::WARN_THRESHOLD => Self::Warn,
            Some(_) => Self::Poor,
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Good => icon::OK,
            Self::Warn => icon::WARN,
            Self::Poor | Self::NoData => icon::FAIL,
        }
    }
}

/// Binary marker for issue counts: zero is good, anything else is bad.
#[must_use]
pub fn count_icon(count: u64) -> &'static str {
    if count == 0 { icon::OK } else { icon::FAIL }
}

/// Parse an ISO-8601 timestamp into UTC.
///
/// A trailing `Z` is normalized to `+00:00`; numeric offsets with or without a
/// colon (`+0000`, `+02:00`) are accepted.
///
/// # Errors
///
/// Returns the `chrono` parse error when neither RFC 3339 nor the compact
/// offset form matches.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let raw = raw.trim();
    let normalized = match raw.strip_suffix('Z') {
        Some(stem) => format!("{stem}+00:00"),
        None => raw.to_owned(),
    };
    DateTime::parse_from_rfc3339(&normalized)
        .or_else(|_| DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.with_timezone(&Utc))
}

/// Reformat `raw` with `pattern`, or return it untouched if it does not parse.
#[must_use]
pub fn format_timestamp(raw: &str, pattern: &str) -> String {
    match parse_timestamp(raw) {
        Ok(dt) => dt.format(pattern).to_string(),
        Err(err) => {
            tracing::debug!(raw, %err, "timestamp passed through verbatim");
            raw.to_owned()
        }
    }
}
