mod args;
mod report;

use clap::Parser;
use log::{error, info, LevelFilter};
use snafu::ErrorCompat;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    info!("args: {:?}", args);

    if let Err(e) = report::run_report(&args) {
        error!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        for cause in ErrorCompat::iter_chain(&e).skip(1) {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
