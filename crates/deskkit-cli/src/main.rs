//! deskkit CLI: calculator, countdown timer, stopwatch and clock
//!
//! ## Usage
//!
//! ```bash
//! deskkit calc 5+3*2=              # Press keys, print display and history
//! deskkit timer -m 1 -s 30         # Live countdown
//! deskkit stopwatch --laps 3       # Record three laps, one per second
//! deskkit clock --watch 10         # Live clock for ten seconds
//! deskkit history --clear          # Forget calculator history
//! deskkit theme --page clock --toggle
//! ```

use clap::Parser;
use deskkit_cli::handlers::{calc, store, timing};
use deskkit_cli::{
    init_logging, Cli, CliConfig, CliResult, ColorChoice, Commands, LogConfig, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);
    init_logging(&log_config(&config))?;
    tracing::debug!(?config, "Starting");

    match cli.command {
        Commands::Calc(args) => calc::run_calc(&config, &args),
        Commands::Timer(args) => timing::run_timer(&config, &args),
        Commands::Stopwatch(args) => timing::run_stopwatch(&config, &args),
        Commands::Clock(args) => timing::run_clock(&config, &args),
        Commands::History(args) => store::run_history(&config, &args),
        Commands::Theme(args) => store::run_theme(&config, &args),
        Commands::Config => store::run_config(&config),
    }
}

// Module paths only help once the user asked for detail
fn log_config(config: &CliConfig) -> LogConfig {
    LogConfig::new(config.verbosity.log_level())
        .with_format(config.log_format)
        .with_ansi(config.color.should_color())
        .with_target(config.verbosity.is_verbose())
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();

    let mut config = CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_log_format(cli.log_format.into())
        .with_config_path(cli.config.clone());
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }
    config
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use deskkit_cli::LogFormat;

    #[test]
    fn test_build_config_verbosity() {
        let cli = Cli::parse_from(["deskkit", "-v", "config"]);
        assert_eq!(build_config(&cli).verbosity, Verbosity::Verbose);
        let cli = Cli::parse_from(["deskkit", "-vvv", "config"]);
        assert_eq!(build_config(&cli).verbosity, Verbosity::Debug);
        let cli = Cli::parse_from(["deskkit", "-q", "-v", "config"]);
        assert_eq!(build_config(&cli).verbosity, Verbosity::Quiet);
    }

    #[test]
    fn test_log_config_shows_targets_when_verbose() {
        let cli = Cli::parse_from(["deskkit", "--color", "never", "config"]);
        let log = log_config(&build_config(&cli));
        assert!(!log.with_target);
        assert!(!log.with_ansi);

        let cli = Cli::parse_from(["deskkit", "-vv", "config"]);
        let log = log_config(&build_config(&cli));
        assert!(log.with_target);
        assert_eq!(log.level, tracing::Level::DEBUG);
    }

    #[test]
    fn test_build_config_paths_and_format() {
        let cli = Cli::parse_from([
            "deskkit",
            "--data-dir",
            "/tmp/desk-data",
            "--config",
            "/tmp/desk.yaml",
            "--log-format",
            "json",
            "config",
        ]);
        let config = build_config(&cli);
        assert_eq!(config.data_dir(), std::path::Path::new("/tmp/desk-data"));
        assert_eq!(config.config_path, Some("/tmp/desk.yaml".into()));
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
