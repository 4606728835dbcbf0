//! Configuration: which CSV files are served, under what names, and how.

mod errors;
mod registry;
mod resources;
mod server;

pub use errors::{ConfigError, ConfigResult};
pub use registry::{Resource, ResourceRegistry};
pub use resources::{
    discover_csv_files, load_config, save_config, to_json, validate_config, ResourceConfig,
    ServerConfig, DEFAULT_PRIMARY_KEY,
};
pub use server::HttpServerConfig;
