/// Running sub-checks as child processes.
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

use crate::aggregate::{CheckName, CheckOutcomes};
use crate::errors::FAILURE_EXIT;

/// A sub-check and the arguments to pass it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCheck {
    pub check: CheckName,
    pub args: Vec<String>,
}

/// Runs one sub-check to completion and reports its exit code.
pub trait ToolRunner {
    /// # Errors
    ///
    /// Returns an error if the check could not be started at all.
    fn run(&self, check: CheckName, args: &[String]) -> Result<i32>;
}

/// Spawns sibling executables, inheriting stdout and stderr.
#[derive(Debug, Clone, Default)]
pub struct SubprocessRunner {
    bin_dir: Option<PathBuf>,
}

impl SubprocessRunner {
    /// Look for sub-check binaries next to the running executable.
    #[must_use]
    pub fn beside_current_exe() -> Self {
        let bin_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self { bin_dir }
    }

    /// Sibling path if it exists, otherwise the bare name for a `PATH` lookup.
    fn program(&self, check: CheckName) -> PathBuf {
        let file = format!("{}{}", check.binary(), env::consts::EXE_SUFFIX);
        self.bin_dir
            .as_ref()
            .map(|dir| dir.join(&file))
            .filter(|path| path.is_file())
            .unwrap_or_else(|| PathBuf::from(file))
    }
}

impl ToolRunner for SubprocessRunner {
    fn run(&self, check: CheckName, args: &[String]) -> Result<i32> {
        let program = self.program(check);
        tracing::info!(program = %program.display(), ?args, "running sub-check");

        // Our own output must land before the child's.
        std::io::stdout().flush().ok();

        let status = Command::new(&program)
            .args(args)
            .status()
            .with_context(|| format!("failed to start {}", program.display()))?;

        // Killed by a signal: no code, counts as a failure.
        Ok(status.code().unwrap_or(FAILURE_EXIT))
    }
}

/// Run every planned check in order, never short-circuiting.
///
/// `before_each` is called ahead of each check (to print its heading). A check
/// that cannot be started is reported on stderr and recorded as a failure.
pub fn run_checks(
    plan: &[PlannedCheck],
    runner: &dyn ToolRunner,
    mut before_each: impl FnMut(CheckName),
) -> CheckOutcomes {
    let mut outcomes = CheckOutcomes::new();
    for planned in plan {
        before_each(planned.check);
        let code = match runner.run(planned.check, &planned.args) {
            Ok(code) => code,
            Err(err) => {
                eprintln!("Error running {}: {err:#}", planned.check.binary());
                FAILURE_EXIT
            }
        };
        tracing::debug!(check = planned.check.label(), code, "sub-check finished");
        outcomes.record(planned.check, code);
    }
    outcomes
}
