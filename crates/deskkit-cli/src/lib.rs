//! deskkit CLI library
//!
//! Terminal front-end for the deskkit engines: argument parsing, logging
//! setup, a tokio-backed scheduler and terminal rendering.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;
pub mod runtime;

pub use commands::{
    CalcArgs, Cli, ClockArgs, ColorArg, Commands, HistoryArgs, LogFormatArg, PageArg,
    StopwatchArgs, ThemeArgs, TimerArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity, DEFAULT_DATA_DIR};
pub use error::{CliError, CliResult};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use output::{calculator_lines, clock_lines, history_lines, lap_lines, TerminalSink};
pub use runtime::{block_on_local, TokioScheduler};
