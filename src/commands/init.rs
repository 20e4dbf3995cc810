//! Init command implementation

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing::info;

/// Write a default configuration file to `config_path`
pub async fn cmd_init(config_path: PathBuf, force: bool) -> Result<Config> {
    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    let config = Config {
        config_file: config_path,
        ..Config::default()
    };
    config.validate()?;
    config.save()?;

    info!("Initialized config at {:?}", config.config_file);
    Ok(config)
}
