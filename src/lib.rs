#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! statuscheck: GitHub Actions, SonarCloud, and combined project status from the CLI.
//!
//! Three binaries share this library: `ci-check`, `sonarcloud-check`, and
//! `project-status`. Each exits 0 when healthy and 1 otherwise.

pub mod aggregate;
pub mod ci;
pub mod cli;
pub mod commands;
pub mod errors;
pub mod identity;
pub mod logging;
pub mod report;
pub mod runner;
pub mod sonar;
pub mod types;
