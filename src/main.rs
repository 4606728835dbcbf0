//! csv-server entry point
//!
//! Parses arguments and dispatches through `cli::run`; errors are printed
//! to stderr and end the process with status 1.

use csv_server::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
