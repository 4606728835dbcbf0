//! CLI command implementations
//!
//! `serve` resolves a configuration, builds the resource registry and runs
//! the HTTP server on a tokio runtime until Ctrl+C. `discover` prints or
//! saves the configuration auto-discovery would produce.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{
    discover_csv_files, load_config, save_config, to_json, HttpServerConfig, ResourceRegistry,
    ServerConfig,
};
use crate::rest_api::RestServer;
use crate::storage::{KeyPolicy, StoreOptions};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_notice, write_stdout};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "csv_server=info,tower_http=info";

/// Run the CLI with parsed arguments
pub fn run() -> CliResult<()> {
    init_logging();
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Execute a CLI command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve {
            data_dir,
            host,
            port,
            readonly,
            config,
            lock_timeout,
            strict_keys,
        } => {
            let http = HttpServerConfig {
                host,
                port,
                readonly,
            };
            let options = StoreOptions {
                lock_timeout: Duration::from_secs(lock_timeout),
                key_policy: if strict_keys {
                    KeyPolicy::Strict
                } else {
                    KeyPolicy::Permissive
                },
            };
            serve(&data_dir, config.as_deref(), &http, options)
        }
        Command::Discover {
            data_dir,
            output,
            readonly,
        } => discover(&data_dir, output, readonly),
    }
}

/// Logs go to stderr, filtered by `RUST_LOG`.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve the configuration for `serve`: the file when given, otherwise
/// whatever CSV files sit in the data directory.
pub fn resolve_config(
    data_dir: &Path,
    config_path: Option<&Path>,
    readonly: bool,
) -> CliResult<ServerConfig> {
    if !data_dir.is_dir() {
        return Err(CliError::DataDirNotFound(data_dir.to_path_buf()));
    }

    let config = match config_path {
        Some(path) => {
            info!(config = %path.display(), "loading configuration");
            load_config(path)?
        }
        None => {
            let config = discover_csv_files(data_dir, readonly)?;
            info!(
                dir = %data_dir.display(),
                found = config.resources.len(),
                "auto-discovered csv files"
            );
            config
        }
    };

    if config.resources.is_empty() {
        warn!(dir = %data_dir.display(), "no resources configured; only 404s will be served");
    }
    Ok(config)
}

/// Serve the resources until interrupted
pub fn serve(
    data_dir: &Path,
    config_path: Option<&Path>,
    http: &HttpServerConfig,
    options: StoreOptions,
) -> CliResult<()> {
    let config = resolve_config(data_dir, config_path, http.readonly)?;
    let registry = ResourceRegistry::from_config(data_dir, &config, http.readonly, options)?;
    let server = RestServer::new(registry);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(server.start(http))
        .map_err(|e| CliError::Server(e.to_string()))?;

    info!("server stopped");
    Ok(())
}

/// Print or save the discovered configuration
pub fn discover(data_dir: &Path, output: Option<PathBuf>, readonly: bool) -> CliResult<()> {
    if !data_dir.is_dir() {
        return Err(CliError::DataDirNotFound(data_dir.to_path_buf()));
    }

    let config = discover_csv_files(data_dir, readonly)?;
    if config.resources.is_empty() {
        write_notice(&format!("No CSV files found in {}", data_dir.display()))?;
        return Ok(());
    }

    match output {
        Some(path) => {
            save_config(&config, &path)?;
            write_notice(&format!(
                "Wrote {} resource(s) to {}",
                config.resources.len(),
                path.display()
            ))?;
        }
        None => write_stdout(&to_json(&config))?,
    }
    Ok(())
}
