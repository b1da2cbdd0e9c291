//! Terminal rendering

use console::{style, Term};
use deskkit::stopwatch::Lap;
use deskkit::{CalculatorView, ClockFaceView, DisplaySink, DisplayUpdate, Theme, TimerView};
use std::io::Write;

/// Format the calculator display as two lines: previous over current
#[must_use]
pub fn calculator_lines(view: &CalculatorView, use_color: bool) -> String {
    let previous = if view.previous.is_empty() { " " } else { view.previous.as_str() };
    if use_color {
        format!("{}\n{}", style(previous).dim(), style(&view.current).bold())
    } else {
        format!("{previous}\n{}", view.current)
    }
}

/// Format history entries, newest first, or a placeholder when empty
#[must_use]
pub fn history_lines(entries: &[String]) -> String {
    if entries.is_empty() {
        return "No calculations yet".to_string();
    }
    entries.join("\n")
}

/// Format a lap table, newest first
#[must_use]
pub fn lap_lines(laps: &[Lap]) -> String {
    if laps.is_empty() {
        return "No lap times recorded yet".to_string();
    }
    laps.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the clock face
#[must_use]
pub fn clock_lines(face: &ClockFaceView) -> String {
    format!("{}\n{}\n{}", face.time, face.date, face.timezone)
}

fn timer_line(view: &TimerView, use_color: bool) -> String {
    if !use_color {
        return format!("{}  {}", view.display, view.status);
    }
    let display = if view.flash_on {
        style(&view.display).red().reverse()
    } else if view.warning {
        style(&view.display).yellow().bold()
    } else {
        style(&view.display).bold()
    };
    format!("{display}  {}", style(&view.status).dim())
}

/// Sink that redraws live displays in place on stdout.
///
/// Timer, stopwatch and clock views overwrite the current line; the expiry
/// alert rings the terminal bell. Calculator, history and lap updates are
/// left to the command handlers, which print a summary at the end.
#[derive(Debug)]
pub struct TerminalSink {
    term: Term,
    use_color: bool,
    quiet: bool,
}

impl TerminalSink {
    /// Create a sink writing to stdout
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            quiet,
        }
    }

    // Live lines only make sense on a terminal; piped output gets the summary
    fn redraw(&self, line: &str) {
        let mut term = &self.term;
        if !term.is_term() {
            return;
        }
        let _ = term.clear_line();
        let _ = write!(term, "{line}");
        let _ = term.flush();
    }

    /// End the live line so following output starts on a fresh one
    pub fn finish_line(&self) {
        if !self.quiet && self.term.is_term() {
            let _ = self.term.write_line("");
        }
    }
}

impl DisplaySink for TerminalSink {
    fn render(&self, update: DisplayUpdate) {
        if self.quiet {
            return;
        }
        match update {
            DisplayUpdate::Timer(view) => self.redraw(&timer_line(&view, self.use_color)),
            DisplayUpdate::TimerAlert if self.term.is_term() => {
                let mut term = &self.term;
                let _ = write!(term, "\x07");
            }
            DisplayUpdate::TimerAlert => {}
            DisplayUpdate::Stopwatch(view) => self.redraw(&view.display),
            DisplayUpdate::ClockFace(face) => {
                self.redraw(&format!("{}  {}", face.time, face.date));
            }
            DisplayUpdate::Calculator(_)
            | DisplayUpdate::History(_)
            | DisplayUpdate::Theme { .. }
            | DisplayUpdate::Laps(_) => {}
        }
    }
}

/// Human label for a theme
#[must_use]
pub fn theme_label(theme: Theme, use_color: bool) -> String {
    if !use_color {
        return theme.to_string();
    }
    match theme {
        Theme::Light => style(theme).yellow().to_string(),
        Theme::Dark => style(theme).blue().to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use deskkit::{Phase, TimerPhase};

    #[test]
    fn test_calculator_lines_plain() {
        let view = CalculatorView {
            current: "3".into(),
            previous: "12 ×".into(),
            phase: Phase::EnteringSecondOperand,
        };
        assert_eq!(calculator_lines(&view, false), "12 ×\n3");
    }

    #[test]
    fn test_calculator_lines_keeps_blank_previous() {
        let view = CalculatorView {
            current: "0".into(),
            previous: String::new(),
            phase: Phase::Idle,
        };
        assert_eq!(calculator_lines(&view, false), " \n0");
    }

    #[test]
    fn test_history_lines() {
        assert_eq!(history_lines(&[]), "No calculations yet");
        let lines = vec!["2 + 2 = 4".to_string(), "1 + 1 = 2".to_string()];
        assert_eq!(history_lines(&lines), "2 + 2 = 4\n1 + 1 = 2");
    }

    #[test]
    fn test_lap_lines() {
        assert_eq!(lap_lines(&[]), "No lap times recorded yet");
        let lap = Lap {
            index: 1,
            lap_ms: 500,
            total_ms: 500,
            timestamp: 0,
        };
        assert!(lap_lines(&[lap]).starts_with("Lap 1"));
    }

    #[test]
    fn test_timer_line_plain() {
        let view = TimerView {
            display: "00:05".into(),
            remaining_seconds: 5,
            phase: TimerPhase::Running,
            warning: true,
            flash_on: false,
            status: "Timer started...".into(),
        };
        assert_eq!(timer_line(&view, false), "00:05  Timer started...");
    }

    #[test]
    fn test_clock_lines() {
        let face = ClockFaceView {
            time: "09:30:00".into(),
            date: "Monday, January 1, 2024".into(),
            timezone: "Timezone: UTC+00:00".into(),
        };
        assert_eq!(
            clock_lines(&face),
            "09:30:00\nMonday, January 1, 2024\nTimezone: UTC+00:00"
        );
    }

    #[test]
    fn test_quiet_sink_ignores_updates() {
        let sink = TerminalSink::new(false, true);
        sink.render(DisplayUpdate::TimerAlert);
        sink.finish_line();
    }
}
