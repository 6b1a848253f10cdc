use clap::Parser;

use statuscheck::cli::{CiCheckArgs, OutputCtx};
use statuscheck::{commands, logging};

fn main() {
    let args = CiCheckArgs::parse();
    logging::init(args.common.verbose);
    let ctx = OutputCtx::new(&args.common);

    let result = commands::ci_check::run(&args, &ctx);
    std::process::exit(commands::finish(result, &ctx));
}
