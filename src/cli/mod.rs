/// CLI layer: argument parsing and output formatting.
pub mod args;
pub mod output;

pub use args::{CiCheckArgs, CommonArgs, OutputFormat, ProjectStatusArgs, SonarCheckArgs};
pub use output::{OutputCtx, write_error};
