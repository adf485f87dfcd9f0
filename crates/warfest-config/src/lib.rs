//! Configuration for the Warfest mesher.
//!
//! Settings persist to disk as `config.ron`, can be overridden from the
//! command line via clap, and tolerate missing or unknown fields so older
//! and newer config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{AtlasConfig, CONFIG_FILE, Config, DebugConfig, DemoConfig, MesherConfig};
pub use error::ConfigError;
