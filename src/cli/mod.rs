//! Command-line interface
//!
//! - serve: expose CSV files in a directory as a REST API
//! - discover: print the configuration auto-discovery would use

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    discover, init_logging, resolve_config, run, run_command, serve, DEFAULT_LOG_FILTER,
};
pub use errors::{CliError, CliResult};
