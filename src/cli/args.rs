//! CLI argument definitions using clap
//!
//! Commands:
//! - csv-server serve <DATA_DIR> [--host] [--port] [--readonly] [--config]
//! - csv-server discover <DATA_DIR> [--output] [--readonly]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CSV Server - REST API for CSV files
#[derive(Parser, Debug)]
#[command(name = "csv-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve CSV files as a REST API
    Serve {
        /// Directory containing the CSV files
        data_dir: PathBuf,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to bind to
        #[arg(long, default_value_t = 8000)]
        port: u16,

        /// Only allow GET requests
        #[arg(long)]
        readonly: bool,

        /// JSON config file; CSV files are auto-discovered when omitted
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Seconds a writer waits for a busy table
        #[arg(long, default_value_t = 5)]
        lock_timeout: u64,

        /// Reject explicit primary keys that already exist
        #[arg(long)]
        strict_keys: bool,
    },

    /// Discover CSV files and print a configuration
    Discover {
        /// Directory to scan
        data_dir: PathBuf,

        /// Write the configuration here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Mark discovered resources read-only
        #[arg(long)]
        readonly: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["csv-server", "serve", "./data"]).unwrap();
        match cli.command {
            Command::Serve {
                data_dir,
                host,
                port,
                readonly,
                config,
                lock_timeout,
                strict_keys,
            } => {
                assert_eq!(data_dir, PathBuf::from("./data"));
                assert_eq!(host, "0.0.0.0");
                assert_eq!(port, 8000);
                assert!(!readonly);
                assert!(config.is_none());
                assert_eq!(lock_timeout, 5);
                assert!(!strict_keys);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_discover_flags() {
        let cli = Cli::try_parse_from(["csv-server", "discover", "data", "-o", "cfg.json", "--readonly"])
            .unwrap();
        match cli.command {
            Command::Discover { output, readonly, .. } => {
                assert_eq!(output, Some(PathBuf::from("cfg.json")));
                assert!(readonly);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
