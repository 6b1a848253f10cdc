//! Repository identity resolution from git remotes.
//!
//! An explicit `--repo OWNER/REPO` wins; otherwise the `origin` remote of the
//! working directory is decomposed into an owner and a repository.
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::StatusError;

/// The only remote host the CI checker understands.
pub const GITHUB_HOST: &str = "github.com";

/// An `owner/repo` pair on GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoIdentity {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoIdentity {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_slug(s).ok_or_else(|| {
            StatusError::configuration(format!("'{s}' is not of the form OWNER/REPO"))
        })
    }
}

/// Source of the remote URL for the current checkout.
///
/// Abstracted so resolution can be exercised without a git binary.
pub trait RemoteSource {
    /// Return the URL of the remote to inspect.
    ///
    /// # Errors
    ///
    /// Returns `StatusError::Configuration` when no remote is configured.
    fn remote_url(&self) -> Result<String, StatusError>;
}

/// Reads a remote URL by running `git remote get-url`.
#[derive(Debug, Clone)]
pub struct GitRemote {
    dir: Option<PathBuf>,
    name: String,
}

impl GitRemote {
    /// The `origin` remote of the process working directory.
    #[must_use]
    pub fn origin() -> Self {
        Self {
            dir: None,
            name: "origin".to_owned(),
        }
    }

    /// The `origin` remote of a specific checkout.
    #[must_use]
    pub fn origin_in(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            name: "origin".to_owned(),
        }
    }
}

impl RemoteSource for GitRemote {
    fn remote_url(&self) -> Result<String, StatusError> {
        let mut cmd = Command::new("git");
        cmd.args(["remote", "get-url", &self.name]);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .map_err(|e| StatusError::configuration(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(StatusError::configuration(if stderr.is_empty() {
                format!("no '{}' remote configured", self.name)
            } else {
                stderr.to_owned()
            }));
        }

        let url = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        if url.is_empty() {
            return Err(StatusError::configuration(format!(
                "'{}' remote has an empty URL",
                self.name
            )));
        }
        Ok(url)
    }
}

/// Resolve the repository to query.
///
/// # Errors
///
/// Returns `StatusError::Configuration` if `explicit` is malformed, no remote
/// is configured, the remote is not on GitHub, or its path is not exactly
/// `owner/repo`.
pub fn resolve_identity(
    explicit: Option<&str>,
    source: &dyn RemoteSource,
) -> Result<RepoIdentity, StatusError> {
    if let Some(slug) = explicit {
        return slug.parse();
    }
    let url = source.remote_url()?;
    tracing::debug!(%url, "resolving repository from remote");
    parse_remote_url(&url)
}

/// Decompose an SSH (`git@github.com:o/r.git`, `ssh://git@github.com/o/r`) or
/// HTTPS (`https://github.com/o/r.git`) remote URL.
///
/// # Errors
///
/// Returns `StatusError::Configuration` for non-GitHub hosts and URLs whose
/// path is not exactly two segments.
pub fn parse_remote_url(url: &str) -> Result<RepoIdentity, StatusError> {
    let url = url.trim();
    let (host, path) = split_host_path(url)
        .ok_or_else(|| StatusError::configuration(format!("Cannot parse remote URL '{url}'")))?;

    if !host.eq_ignore_ascii_case(GITHUB_HOST) {
        return Err(StatusError::configuration("Not a GitHub repository"));
    }

    parse_slug(path)
        .ok_or_else(|| StatusError::configuration(format!("Cannot parse GitHub URL '{url}'")))
}

fn split_host_path(url: &str) -> Option<(&str, &str)> {
    let (authority, path) = match url.split_once("://") {
        Some((_, rest)) => {
            let (authority, path) = rest.split_once('/')?;
            // Drop an explicit port, `ssh://git@github.com:22/o/r`.
            (authority.split(':').next()?, path)
        }
        // scp-like syntax, `git@github.com:o/r.git`
        None => url.split_once(':')?,
    };
    let host = authority.rsplit('@').next()?;
    if host.is_empty() {
        return None;
    }
    Some((host, path))
}

fn parse_slug(path: &str) -> Option<RepoIdentity> {
    let path = path.trim().trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut segments = path.split('/');
    let owner = segments.next()?.trim();
    let repo = segments.next()?.trim();
    if segments.next().is_some() || owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some(RepoIdentity {
        owner: owner.to_owned(),
        repo: repo.to_owned(),
    })
}
