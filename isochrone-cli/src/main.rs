//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use isochrone_cli::CliError;

fn main() {
    match isochrone_cli::run() {
        Ok(()) => {}
        // Clap renders help, version and usage errors itself.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("isochrone: {err}");
            std::process::exit(1);
        }
    }
}
