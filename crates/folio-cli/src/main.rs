use folio_core::logging;
use folio_core::publish::PublishError;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Initialize logging as early as possible; stderr if the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("folio error: {:#}", err);
        // Publish failures happen after the page is written; report them apart.
        let code = if err.downcast_ref::<PublishError>().is_some() {
            2
        } else {
            1
        };
        std::process::exit(code);
    }
}
