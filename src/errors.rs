/// Errors shared by the three status tools.
use thiserror::Error;

/// Exit code for any unhealthy check or fatal error.
pub const FAILURE_EXIT: i32 = 1;

/// Fatal errors that abort a status check.
///
/// Malformed timestamps are deliberately absent: the formatter passes the raw
/// value through instead of failing.
#[derive(Debug, Error)]
pub enum StatusError {
    /// The project or repository identity could not be determined.
    #[error("Unable to detect GitHub repository: {reason}")]
    Configuration {
        /// What went wrong while resolving the identity.
        reason: String,
    },

    /// A required external command-line client is not installed.
    #[error("{tool} CLI not found")]
    ToolUnavailable {
        /// Executable name, e.g. `gh`.
        tool: String,
        /// Installation guidance shown to the user.
        hint: String,
    },

    /// The external client ran but exited unsuccessfully.
    #[error("Error running {tool} CLI: {stderr}")]
    ToolFailed {
        /// Executable name.
        tool: String,
        /// Trimmed stderr of the failed invocation.
        stderr: String,
    },

    /// Network failure, timeout, or non-2xx response.
    #[error("Failed to communicate with {endpoint}: {message}")]
    Transport {
        /// Endpoint or resource that was requested.
        endpoint: String,
        /// Underlying cause.
        message: String,
    },

    /// A response arrived but its body was not the expected JSON shape.
    #[error("Malformed {what} response: {message}")]
    Decode {
        /// Which response failed to decode.
        what: String,
        /// Underlying parser message.
        message: String,
    },
}

impl StatusError {
    /// Machine-readable error code (`snake_case`).
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration_error",
            Self::ToolUnavailable { .. } => "tool_unavailable",
            Self::ToolFailed { .. } => "tool_failed",
            Self::Transport { .. } => "transport_error",
            Self::Decode { .. } => "decode_error",
        }
    }

    /// Guidance line printed under the error message, if any.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Configuration { .. } => {
                Some("Make sure you're in a git repository with a GitHub remote.".to_owned())
            }
            Self::ToolUnavailable { hint, .. } => Some(hint.clone()),
            Self::ToolFailed { .. } => {
                Some("Make sure gh CLI is installed and authenticated.".to_owned())
            }
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }

    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        FAILURE_EXIT
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}
