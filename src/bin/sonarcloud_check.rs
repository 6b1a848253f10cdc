use clap::Parser;

use statuscheck::cli::{OutputCtx, SonarCheckArgs};
use statuscheck::{commands, logging};

fn main() {
    let args = SonarCheckArgs::parse();
    logging::init(args.common.verbose);
    let ctx = OutputCtx::new(&args.common);

    let result = commands::sonarcloud_check::run(&args, &ctx);
    std::process::exit(commands::finish(result, &ctx));
}
