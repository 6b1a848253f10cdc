/// `project-status`: run both checks as child processes and combine them.
use crate::aggregate::{CheckName, CheckOutcomes, format_overall, format_section_header};
use crate::cli::ProjectStatusArgs;
use crate::report::Report;
use crate::runner::{PlannedCheck, SubprocessRunner, ToolRunner, run_checks};

/// Run the plan with sibling binaries and return the overall exit code.
#[must_use]
pub fn run(args: &ProjectStatusArgs) -> i32 {
    run_with(args, &SubprocessRunner::beside_current_exe()).overall().exit_code()
}

/// Print the header, each section, and the overall block.
#[must_use]
pub fn run_with(args: &ProjectStatusArgs, runner: &dyn ToolRunner) -> CheckOutcomes {
    println!("{}", format_header(args.project.as_deref()));

    let plan = build_plan(args);
    tracing::debug!(checks = plan.len(), "running project status plan");
    let outcomes = run_checks(&plan, runner, |check| {
        println!("{}", format_section_header(check));
    });

    println!("{}", format_overall(&outcomes));
    outcomes
}

/// The `PROJECT STATUS CHECK` banner.
#[must_use]
pub fn format_header(project: Option<&str>) -> Report {
    let mut report = Report::new();
    report.banner("PROJECT STATUS CHECK");
    if let Some(project) = project {
        report.line(format!("Project: {project}")).heavy_rule();
    }
    report
}

/// Sub-checks to run, in order, with the flags forwarded to each.
#[must_use]
pub fn build_plan(args: &ProjectStatusArgs) -> Vec<PlannedCheck> {
    let mut plan = Vec::new();
    let verbose = (args.verbose > 0)
        .then(|| format!("-{}", "v".repeat(usize::from(args.verbose))));

    if !args.skip_ci {
        let mut ci = vec!["--limit".to_owned(), args.ci_limit.to_string()];
        push_opt(&mut ci, "--workflow", args.workflow.as_deref());
        push_opt(&mut ci, "--repo", args.repo.as_deref());
        ci.extend(verbose.clone());
        plan.push(PlannedCheck {
            check: CheckName::Ci,
            args: ci,
        });
    }

    if let Some(project) = args.project.as_ref().filter(|_| !args.skip_sonarcloud) {
        let mut sonar = vec!["--project".to_owned(), project.clone()];
        push_opt(&mut sonar, "--organization", args.organization.as_deref());
        push_opt(&mut sonar, "--component", args.component.as_deref());
        push_opt(&mut sonar, "--api-url", args.api_url.as_deref());
        sonar.extend(verbose);
        plan.push(PlannedCheck {
            check: CheckName::SonarCloud,
            args: sonar,
        });
    }

    plan
}

fn push_opt(args: &mut Vec<String>, flag: &str, value: Option<&str>) {
    if let Some(value) = value {
        args.push(flag.to_owned());
        args.push(value.to_owned());
    }
}
