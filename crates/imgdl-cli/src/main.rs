use imgdl_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Fall back to stderr so an unwritable state dir never blocks a download run.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = Cli::run_from_args() {
        eprintln!("imgdl error: {:#}", err);
        std::process::exit(1);
    }
}
