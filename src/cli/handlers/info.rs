//! Information display handlers

use crate::cli::output::*;
use crate::AppConfig;
use crate::Result;

pub fn handle_config_command(config: &AppConfig, toml: bool) -> Result<()> {
    if toml {
        println!("{}", config.to_masked_toml()?);
    } else {
        print_config(config);
    }
    Ok(())
}
