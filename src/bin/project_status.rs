use clap::Parser;

use statuscheck::cli::ProjectStatusArgs;
use statuscheck::{commands, logging};

fn main() {
    let args = ProjectStatusArgs::parse();
    logging::init(args.verbose);
    std::process::exit(commands::project_status::run(&args));
}
