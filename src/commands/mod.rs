/// Command implementations, one per binary.
pub mod ci_check;
pub mod project_status;
pub mod sonarcloud_check;

use crate::aggregate::Verdict;
use crate::cli::{OutputCtx, write_error};
use crate::errors::StatusError;
use crate::types::ErrorOutput;

/// Turn a check result into the process exit code, reporting fatal errors.
#[must_use]
pub fn finish(result: Result<Verdict, StatusError>, ctx: &OutputCtx) -> i32 {
    match result {
        Ok(verdict) => verdict.exit_code(),
        Err(err) => {
            tracing::debug!(code = err.code(), "check aborted");
            write_error(&ErrorOutput::from_status_error(&err), ctx.format);
            err.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_maps_verdicts_and_errors() {
        let ctx = OutputCtx::default();
        assert_eq!(finish(Ok(Verdict::Healthy), &ctx), 0);
        assert_eq!(finish(Ok(Verdict::Unhealthy), &ctx), 1);
        let err = StatusError::Decode {
            what: "runs".to_owned(),
            message: "expected array".to_owned(),
        };
        assert_eq!(finish(Err(err), &ctx), 1);
    }
}
