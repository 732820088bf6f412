use std::path::PathBuf;

use crate::cli::ConfigCommands;
use crate::config::{default_config_path, AppPaths, CliConfig};
use crate::error::CliError;

pub fn run_config(
    command: ConfigCommands,
    config: CliConfig,
    paths: &AppPaths,
) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => {
            run_config_show(&config, paths);
            Ok(())
        }
        ConfigCommands::Set {
            db_path,
            widget_path,
            reset,
        } => run_config_set(config, db_path, widget_path, reset),
    }
}

pub fn run_config_show(config: &CliConfig, paths: &AppPaths) {
    println!("config file:  {}", default_config_path().display());
    println!("database:     {}", paths.db_path.display());
    println!("widget store: {}", paths.widget_path.display());

    if config.db_path.is_none() && config.widget_path.is_none() {
        println!("(no stored paths; using defaults)");
    }
}

/// Merge `config set` options into the stored config
pub fn apply_config_changes(
    mut config: CliConfig,
    db_path: Option<PathBuf>,
    widget_path: Option<PathBuf>,
    reset: bool,
) -> Result<CliConfig, CliError> {
    if reset {
        config.db_path = None;
        config.widget_path = None;
        return Ok(config);
    }

    if db_path.is_none() && widget_path.is_none() {
        return Err(CliError::NothingToChange("config set"));
    }

    if db_path.is_some() {
        config.db_path = db_path;
    }
    if widget_path.is_some() {
        config.widget_path = widget_path;
    }
    Ok(config)
}

pub fn run_config_set(
    config: CliConfig,
    db_path: Option<PathBuf>,
    widget_path: Option<PathBuf>,
    reset: bool,
) -> Result<(), CliError> {
    let updated = apply_config_changes(config, db_path, widget_path, reset)?;
    let saved_to = updated.save().map_err(CliError::Config)?;
    println!("Saved config to {}", saved_to.display());
    Ok(())
}
