/// CLI argument definitions via clap derive.
use clap::{Args, Parser, ValueEnum};

use crate::sonar::client::{DEFAULT_API_URL, DEFAULT_TIMEOUT};

/// Flags every reporting tool accepts.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Output format.
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, conflicts_with = "output")]
    pub json: bool,

    /// Omit table headers (with --output table).
    #[arg(long)]
    pub no_header: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Fixed-width human-readable report.
    #[default]
    Text,
    /// Aligned table of the individual records.
    Table,
    /// JSON object (pretty-printed).
    Json,
    /// Compact single-line JSON.
    Compact,
}

const CI_EXAMPLES: &str = concat!(
    "Examples:\n",
    "  ci-check\n",
    "  ci-check --limit 10\n",
    "  ci-check --workflow coverage.yml",
);

const SONAR_EXAMPLES: &str = concat!(
    "Examples:\n",
    "  sonarcloud-check --project acme_widgets\n",
    "  sonarcloud-check --project acme_widgets --component src",
);

const PROJECT_STATUS_EXAMPLES: &str = concat!(
    "Examples:\n",
    "  project-status --project acme_widgets\n",
    "  project-status --project acme_widgets --ci-limit 10\n",
    "  project-status --skip-sonarcloud",
);

/// `ci-check`: report recent GitHub Actions workflow runs.
#[derive(Debug, Parser)]
#[command(
    name = "ci-check",
    about = "Check GitHub Actions CI status",
    version,
    after_help = CI_EXAMPLES
)]
pub struct CiCheckArgs {
    /// Number of runs to show.
    #[arg(
        long,
        env = "CI_CHECK_LIMIT",
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub limit: u32,

    /// Filter by workflow name (e.g. coverage.yml).
    #[arg(long, env = "CI_CHECK_WORKFLOW")]
    pub workflow: Option<String>,

    /// Repository to query instead of the origin remote.
    #[arg(long, env = "CI_CHECK_REPO", value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// `sonarcloud-check`: report SonarCloud quality gate, metrics, and coverage.
#[derive(Debug, Parser)]
#[command(
    name = "sonarcloud-check",
    about = "Check SonarCloud project status",
    version,
    after_help = SONAR_EXAMPLES
)]
pub struct SonarCheckArgs {
    /// SonarCloud project key.
    #[arg(long, env = "SONAR_PROJECT")]
    pub project: String,

    /// SonarCloud organization.
    #[arg(long, env = "SONAR_ORGANIZATION")]
    pub organization: Option<String>,

    /// Only list files under this path prefix (e.g. src).
    #[arg(long, env = "SONAR_COMPONENT")]
    pub component: Option<String>,

    /// Maximum number of file coverage entries to fetch (at most 500).
    #[arg(
        long,
        default_value_t = 500,
        value_parser = clap::value_parser!(u32).range(1..=500)
    )]
    pub limit: u32,

    /// API base URL.
    #[arg(long, env = "SONAR_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Per-request timeout in seconds.
    #[arg(
        long,
        env = "SONAR_TIMEOUT",
        value_name = "SECS",
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// `project-status`: run CI and SonarCloud checks and combine their verdicts.
#[derive(Debug, Parser)]
#[command(
    name = "project-status",
    about = "Check overall project status (CI + SonarCloud)",
    version,
    after_help = PROJECT_STATUS_EXAMPLES
)]
pub struct ProjectStatusArgs {
    /// SonarCloud project key.
    #[arg(long, env = "SONAR_PROJECT", required_unless_present = "skip_sonarcloud")]
    pub project: Option<String>,

    /// SonarCloud organization.
    #[arg(long, env = "SONAR_ORGANIZATION")]
    pub organization: Option<String>,

    /// Path prefix for the SonarCloud file listing.
    #[arg(long, env = "SONAR_COMPONENT")]
    pub component: Option<String>,

    /// SonarCloud API base URL.
    #[arg(long, env = "SONAR_API_URL")]
    pub api_url: Option<String>,

    /// Number of CI runs to show.
    #[arg(
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub ci_limit: u32,

    /// Filter CI runs by workflow.
    #[arg(long, env = "CI_CHECK_WORKFLOW")]
    pub workflow: Option<String>,

    /// Repository to query instead of the origin remote.
    #[arg(long, env = "CI_CHECK_REPO", value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// Skip the CI check.
    #[arg(long)]
    pub skip_ci: bool,

    /// Skip the SonarCloud check.
    #[arg(long)]
    pub skip_sonarcloud: bool,

    /// Increase log verbosity on stderr; forwarded to the sub-checks.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_definitions_are_consistent() {
        CiCheckArgs::command().debug_assert();
        SonarCheckArgs::command().debug_assert();
        ProjectStatusArgs::command().debug_assert();
    }

    #[test]
    fn test_ci_defaults() {
        let args = CiCheckArgs::try_parse_from(["ci-check"]).unwrap();
        assert_eq!(args.limit, 5);
        assert_eq!(args.common.output, OutputFormat::Text);
        assert!(args.workflow.is_none());
    }

    #[test]
    fn test_ci_limit_must_be_positive() {
        assert!(CiCheckArgs::try_parse_from(["ci-check", "--limit", "0"]).is_err());
    }

    #[test]
    fn test_json_conflicts_with_output() {
        let res = CiCheckArgs::try_parse_from(["ci-check", "--json", "--output", "table"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_sonar_defaults() {
        let args = SonarCheckArgs::try_parse_from(["sonarcloud-check", "--project", "p"]).unwrap();
        assert_eq!(args.project, "p");
        assert_eq!(args.limit, 500);
        assert_eq!(args.timeout, 10);
        assert_eq!(args.api_url, "https://sonarcloud.io/api");
    }

    #[test]
    fn test_sonar_page_size_bounded() {
        let res = SonarCheckArgs::try_parse_from([
            "sonarcloud-check",
            "--project",
            "p",
            "--limit",
            "501",
        ]);
        assert!(res.is_err());
        assert_eq!(crate::sonar::client::MAX_PAGE_SIZE, 500);
    }

    #[test]
    fn test_sonar_timeout_must_be_positive() {
        let res = SonarCheckArgs::try_parse_from([
            "sonarcloud-check",
            "--project",
            "p",
            "--timeout",
            "0",
        ]);
        assert!(res.is_err());
        let args = SonarCheckArgs::try_parse_from([
            "sonarcloud-check",
            "--project",
            "p",
            "--timeout",
            "1",
        ])
        .unwrap();
        assert_eq!(args.timeout, 1);
    }

    #[test]
    fn test_project_optional_when_sonar_skipped() {
        let args =
            ProjectStatusArgs::try_parse_from(["project-status", "--skip-sonarcloud"]).unwrap();
        assert!(args.project.is_none());
        assert!(args.skip_sonarcloud);
    }
}
