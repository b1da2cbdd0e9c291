//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// deskkit: calculator, countdown timer, stopwatch and clock in the terminal
#[derive(Parser, Debug)]
#[command(name = "deskkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log output format
    #[arg(long, default_value = "compact", global = true)]
    pub log_format: LogFormatArg,

    /// Directory holding persisted history, laps and themes
    #[arg(long, env = "DESKKIT_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Engine configuration file (YAML)
    #[arg(long, env = "DESKKIT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Feed key presses to the calculator
    Calc(CalcArgs),

    /// Run a live countdown
    Timer(TimerArgs),

    /// Run the stopwatch and record laps
    Stopwatch(StopwatchArgs),

    /// Show the wall clock
    Clock(ClockArgs),

    /// Show or clear the calculator history
    History(HistoryArgs),

    /// Show or toggle a page theme
    Theme(ThemeArgs),

    /// Show the effective engine configuration
    Config,
}

/// Arguments for the calc command
#[derive(Parser, Debug)]
pub struct CalcArgs {
    /// Keys to press: characters such as `12+3=` or key names
    /// (`Enter`, `Escape`, `Backspace`)
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub keys: Vec<String>,
}

/// Arguments for the timer command
#[derive(Parser, Debug)]
pub struct TimerArgs {
    /// Minutes (0-60)
    #[arg(short, long, allow_negative_numbers = true)]
    pub minutes: Option<i64>,

    /// Seconds (0-59)
    #[arg(short, long, allow_negative_numbers = true)]
    pub seconds: Option<i64>,
}

/// Arguments for the stopwatch command
#[derive(Parser, Debug)]
pub struct StopwatchArgs {
    /// Number of laps to record
    #[arg(short, long, default_value = "3")]
    pub laps: u32,

    /// Milliseconds between laps
    #[arg(short, long, default_value = "1000")]
    pub every: u64,

    /// Forget saved laps before starting
    #[arg(long)]
    pub reset: bool,
}

/// Arguments for the clock command
#[derive(Parser, Debug)]
pub struct ClockArgs {
    /// Keep refreshing for this many seconds (0 prints once)
    #[arg(short, long, default_value = "0")]
    pub watch: u64,
}

/// Arguments for the history command
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Clear the history
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for the theme command
#[derive(Parser, Debug)]
pub struct ThemeArgs {
    /// Page whose theme to show or toggle
    #[arg(long, default_value = "calculator")]
    pub page: PageArg,

    /// Flip between light and dark
    #[arg(long)]
    pub toggle: bool,
}

/// Page selector for the theme command
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PageArg {
    /// Calculator page
    #[default]
    Calculator,
    /// Clock page
    Clock,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Log format argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormatArg {
    /// Single-line text
    #[default]
    Compact,
    /// JSON lines
    Json,
}

impl From<LogFormatArg> for crate::logging::LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
