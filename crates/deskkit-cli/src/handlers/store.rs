//! `history`, `theme` and `config` commands

use super::{file_storage, local_offset, replay_ports};
use crate::commands::{HistoryArgs, PageArg, ThemeArgs};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{history_lines, theme_label};
use deskkit::{CalculatorEngine, ClockPage, Theme};

/// Print the stored calculator history, or clear it
pub fn run_history(config: &CliConfig, args: &HistoryArgs) -> CliResult<()> {
    let desk = config.desk_config()?;
    let calc = CalculatorEngine::new(replay_ports(file_storage(config)?), desk.calculator);

    if args.clear {
        calc.clear_history();
        if !config.verbosity.is_quiet() {
            println!("History cleared");
        }
        return Ok(());
    }

    let lines: Vec<String> = calc.history().iter().map(ToString::to_string).collect();
    println!("{}", history_lines(&lines));
    Ok(())
}

/// Current or toggled theme for `page`
pub fn resolve_theme(config: &CliConfig, page: PageArg, toggle: bool) -> CliResult<Theme> {
    let ports = replay_ports(file_storage(config)?);
    let theme = match page {
        PageArg::Calculator => {
            let calc = CalculatorEngine::new(ports, config.desk_config()?.calculator);
            if toggle {
                calc.toggle_theme()
            } else {
                calc.theme()
            }
        }
        PageArg::Clock => {
            let page = ClockPage::new(ports, local_offset());
            if toggle {
                page.toggle_theme()
            } else {
                page.theme()
            }
        }
    };
    Ok(theme)
}

/// Print the theme of a page, toggling it first if asked
pub fn run_theme(config: &CliConfig, args: &ThemeArgs) -> CliResult<()> {
    let theme = resolve_theme(config, args.page, args.toggle)?;
    let page = match args.page {
        PageArg::Calculator => "calculator",
        PageArg::Clock => "clock",
    };
    println!("{page} theme: {}", theme_label(theme, config.color.should_color()));
    Ok(())
}

/// Print the effective engine configuration as YAML
pub fn run_config(config: &CliConfig) -> CliResult<()> {
    print!("{}", config.desk_config()?.to_yaml()?);
    Ok(())
}
