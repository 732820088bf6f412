use std::path::PathBuf;

use affirm_core::models::{parse_flag, RefreshInterval, ThemeMode};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "affirm")]
#[command(about = "A fresh affirmation every time you open a terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the widget shared store file
    #[arg(long, global = true, value_name = "PATH")]
    pub widget_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new affirmation
    #[command(alias = "new")]
    Add {
        /// Affirmation text
        text: Vec<String>,
    },
    /// List affirmations
    List {
        /// Number of affirmations to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Include paused affirmations
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the next random affirmation (default when no command is given)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Do not update the home-screen widget
        #[arg(long)]
        no_widget: bool,
    },
    /// Edit an existing affirmation
    Edit {
        /// Affirmation ID or unique ID prefix
        id: String,
        /// New text (opens $EDITOR when omitted)
        #[arg(long)]
        text: Option<String>,
    },
    /// Delete an affirmation
    Delete {
        /// Affirmation ID or unique ID prefix
        id: String,
    },
    /// Include an affirmation in random selection again
    Enable {
        /// Affirmation ID or unique ID prefix
        id: String,
    },
    /// Pause an affirmation so it is never selected
    Disable {
        /// Affirmation ID or unique ID prefix
        id: String,
    },
    /// View or change app settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Inspect or drive the home-screen widget
    Widget {
        #[command(subcommand)]
        command: WidgetCommands,
    },
    /// Export affirmations
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure where the CLI keeps its files
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change one or more settings
    Set {
        /// light, dark, or system
        #[arg(long, value_parser = parse_theme)]
        theme: Option<ThemeMode>,
        /// Widget refresh cadence: 15m, 1h, 6h, or 1d
        #[arg(long, value_parser = parse_refresh_interval)]
        refresh: Option<RefreshInterval>,
        /// Language tag, e.g. en or pt-BR
        #[arg(long)]
        language: Option<String>,
        /// Accessibility text size in points
        #[arg(long)]
        font_size: Option<u32>,
        /// Use the high-contrast palette
        #[arg(long, value_name = "BOOL", value_parser = parse_bool)]
        high_contrast: Option<bool>,
        /// Show affirmations on the home-screen widget
        #[arg(long, value_name = "BOOL", value_parser = parse_bool)]
        show_on_widget: Option<bool>,
    },
}

#[derive(Subcommand)]
pub enum WidgetCommands {
    /// Print what the widget currently displays
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pick a new affirmation for the widget if its refresh time has passed
    Refresh {
        /// Refresh even if the current affirmation is not due yet
        #[arg(long)]
        force: bool,
    },
    /// Empty the widget
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved configuration
    Show,
    /// Persist default paths
    Set {
        /// Database file used when --db-path is not given
        #[arg(long, value_name = "PATH")]
        db_path: Option<PathBuf>,
        /// Widget store file used when --widget-path is not given
        #[arg(long, value_name = "PATH")]
        widget_path: Option<PathBuf>,
        /// Forget both stored paths
        #[arg(long, conflicts_with_all = ["db_path", "widget_path"])]
        reset: bool,
    },
}

pub fn parse_theme(value: &str) -> Result<ThemeMode, String> {
    value.parse().map_err(|error: affirm_core::Error| error.to_string())
}

pub fn parse_refresh_interval(value: &str) -> Result<RefreshInterval, String> {
    value
        .parse()
        .map_err(|error: affirm_core::Error| error.to_string())
}

pub fn parse_bool(value: &str) -> Result<bool, String> {
    parse_flag(value).ok_or_else(|| format!("expected true/false, got '{value}'"))
}
