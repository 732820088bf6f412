//! Affirm CLI - a fresh affirmation every time you open a terminal
//!
//! Manages the affirmation library and keeps the home-screen widget current.

mod cli;
mod commands;
mod config;
mod error;


use affirm_core::util::normalize_text_option;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, SettingsCommands, WidgetCommands};
use crate::commands::add::run_add;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::export::run_export;
use crate::commands::list::run_list;
use crate::commands::settings::{run_settings_set, run_settings_show, SettingsChanges};
use crate::commands::show::run_show;
use crate::commands::toggle::run_set_active;
use crate::commands::widget::{run_widget_clear, run_widget_refresh, run_widget_show};
use crate::config::CliConfig;
use crate::error::CliError;

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,affirm_core=info,affirm_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load().map_err(CliError::Config)?;
    let paths = config.resolve_paths(cli.db_path, cli.widget_path);
    tracing::debug!(db_path = %paths.db_path.display(), "Resolved paths");

    match cli.command {
        Some(Commands::Add { text }) => run_add(&text, &paths.db_path)?,
        Some(Commands::List { limit, all, json }) => {
            run_list(limit, all, json, &paths.db_path)?;
        }
        Some(Commands::Show { json, no_widget }) => run_show(json, !no_widget, &paths)?,
        Some(Commands::Edit { id, text }) => run_edit(&id, text.as_deref(), &paths.db_path)?,
        Some(Commands::Delete { id }) => run_delete(&id, &paths.db_path)?,
        Some(Commands::Enable { id }) => run_set_active(&id, true, &paths.db_path)?,
        Some(Commands::Disable { id }) => run_set_active(&id, false, &paths.db_path)?,
        Some(Commands::Settings { command }) => match command {
            SettingsCommands::Show { json } => run_settings_show(json, &paths)?,
            SettingsCommands::Set {
                theme,
                refresh,
                language,
                font_size,
                high_contrast,
                show_on_widget,
            } => {
                let changes = SettingsChanges {
                    theme,
                    refresh_interval: refresh,
                    language: normalize_text_option(language),
                    font_size,
                    high_contrast,
                    show_on_widget,
                };
                run_settings_set(changes, &paths)?;
            }
        },
        Some(Commands::Widget { command }) => match command {
            WidgetCommands::Show { json } => run_widget_show(json, &paths)?,
            WidgetCommands::Refresh { force } => run_widget_refresh(force, &paths)?,
            WidgetCommands::Clear => run_widget_clear(&paths)?,
        },
        Some(Commands::Export { format, output }) => {
            run_export(format, output.as_deref(), &paths.db_path)?;
        }
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        Some(Commands::Config { command }) => run_config(command, config, &paths)?,
        None => run_show(false, true, &paths)?,
    }

    Ok(())
}
