//! `calc` command

use super::{file_storage, replay_ports};
use crate::commands::CalcArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{calculator_lines, history_lines};
use deskkit::calculator::action_for_key;
use deskkit::CalculatorEngine;

/// Split arguments into individual key names.
///
/// Whole arguments that name a key (`Enter`, `Escape`, `Backspace`, `7`) are
/// kept; anything else is split into characters, with `×` and `÷` accepted
/// for `*` and `/`.
pub fn expand_keys(args: &[String]) -> CliResult<Vec<String>> {
    let mut keys = Vec::new();
    for arg in args {
        if action_for_key(arg).is_some() {
            keys.push(arg.clone());
            continue;
        }
        for c in arg.chars().filter(|c| !c.is_whitespace()) {
            let key = match c {
                '×' | 'x' => "*".to_string(),
                '÷' => "/".to_string(),
                _ => c.to_string(),
            };
            if action_for_key(&key).is_none() {
                return Err(CliError::invalid_argument(format!(
                    "unknown key {c:?} in {arg:?}"
                )));
            }
            keys.push(key);
        }
    }
    Ok(keys)
}

/// Press every key, then print the display and history
pub fn run_calc(config: &CliConfig, args: &CalcArgs) -> CliResult<()> {
    let desk = config.desk_config()?;
    let keys = expand_keys(&args.keys)?;
    let calc = CalculatorEngine::new(replay_ports(file_storage(config)?), desk.calculator);

    for key in &keys {
        calc.handle_key(key);
    }
    tracing::info!(keys = keys.len(), result = %calc.current_operand(), "Replayed keys");

    if config.verbosity.is_quiet() {
        println!("{}", calc.current_operand());
        return Ok(());
    }

    let use_color = config.color.should_color();
    println!("{}", calculator_lines(&calc.view(), use_color));
    println!();
    let lines: Vec<String> = calc.history().iter().map(ToString::to_string).collect();
    println!("{}", history_lines(&lines));
    Ok(())
}
