//! Runtime settings for the lodestone mesher, persisted to disk as RON.
//!
//! Values load from `config.ron` and can be overridden from the command line.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AtlasConfig, Config, DebugConfig, MeshingConfig, PlaceholderConfig, ResourcePackConfig,
    default_config_dir,
};
pub use error::ConfigError;
