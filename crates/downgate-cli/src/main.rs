use downgate_core::logging;

mod cli;

use crate::cli::CliCommand;

const LOG_FILTER: &str = "info,downgate=debug";

#[tokio::main]
async fn main() {
    // File logging first; stderr when the state dir is unwritable.
    if logging::init(LOG_FILTER).is_err() {
        logging::init_stderr(LOG_FILTER);
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("downgate error: {:#}", err);
        std::process::exit(1);
    }
}
