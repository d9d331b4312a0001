//! Configuration for the instancer client
//!
//! Supports:
//! - `<config_dir>/instancer/config.toml` (or `--config`) - Global settings
//! - A JSON client configuration blob (`--client-conf`)

pub mod settings;
pub mod types;

pub use settings::{default_config_path, load_settings};
pub use types::*;
