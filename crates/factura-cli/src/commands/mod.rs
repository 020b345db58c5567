//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::Path;

use factura_core::PipelineConfig;

/// Loads configuration from an explicit path, the default location, or
/// built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PipelineConfig> {
    if let Some(path) = config_path {
        return Ok(PipelineConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(PipelineConfig::from_file(&default_path)?)
    } else {
        Ok(PipelineConfig::default())
    }
}
