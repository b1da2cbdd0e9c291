//! Display port
//!
//! Engines push a [`DisplayUpdate`] after every visible state change. Hosts
//! render it however they like; [`RecordingSink`] keeps everything for
//! assertions.

use crate::calculator::CalculatorView;
use crate::clock_page::ClockFaceView;
use crate::stopwatch::{Lap, StopwatchView};
use crate::theme::Theme;
use crate::timer::TimerView;
use std::cell::RefCell;

/// Which page a theme change belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeScope {
    /// Calculator page
    Calculator,
    /// Clock/timer/stopwatch page
    Clock,
}

/// A visible change produced by an engine
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayUpdate {
    /// Calculator operand lines
    Calculator(CalculatorView),
    /// Calculator history, newest first
    History(Vec<String>),
    /// Theme changed or restored
    Theme {
        /// Page the theme applies to
        scope: ThemeScope,
        /// New theme
        theme: Theme,
    },
    /// Timer display
    Timer(TimerView),
    /// Timer reached zero; hosts play a sound or show an alert
    TimerAlert,
    /// Stopwatch display
    Stopwatch(StopwatchView),
    /// Stopwatch laps, newest first
    Laps(Vec<Lap>),
    /// Wall clock face
    ClockFace(ClockFaceView),
}

/// Receiver of display updates
pub trait DisplaySink {
    /// Render one update
    fn render(&self, update: DisplayUpdate);
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn render(&self, _update: DisplayUpdate) {}
}

/// Sink that records every update in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    updates: RefCell<Vec<DisplayUpdate>>,
}

impl RecordingSink {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All updates so far
    #[must_use]
    pub fn updates(&self) -> Vec<DisplayUpdate> {
        self.updates.borrow().clone()
    }

    /// Number of updates so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.borrow().len()
    }

    /// Whether nothing was rendered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.borrow().is_empty()
    }

    /// Forget recorded updates
    pub fn clear(&self) {
        self.updates.borrow_mut().clear();
    }

    /// Most recent calculator view
    #[must_use]
    pub fn last_calculator(&self) -> Option<CalculatorView> {
        self.find_last(|u| match u {
            DisplayUpdate::Calculator(view) => Some(view.clone()),
            _ => None,
        })
    }

    /// Most recent history list
    #[must_use]
    pub fn last_history(&self) -> Option<Vec<String>> {
        self.find_last(|u| match u {
            DisplayUpdate::History(items) => Some(items.clone()),
            _ => None,
        })
    }

    /// Most recent timer view
    #[must_use]
    pub fn last_timer(&self) -> Option<TimerView> {
        self.find_last(|u| match u {
            DisplayUpdate::Timer(view) => Some(view.clone()),
            _ => None,
        })
    }

    /// Most recent stopwatch view
    #[must_use]
    pub fn last_stopwatch(&self) -> Option<StopwatchView> {
        self.find_last(|u| match u {
            DisplayUpdate::Stopwatch(view) => Some(view.clone()),
            _ => None,
        })
    }

    /// Most recent lap list
    #[must_use]
    pub fn last_laps(&self) -> Option<Vec<Lap>> {
        self.find_last(|u| match u {
            DisplayUpdate::Laps(laps) => Some(laps.clone()),
            _ => None,
        })
    }

    /// Most recent clock face
    #[must_use]
    pub fn last_clock_face(&self) -> Option<ClockFaceView> {
        self.find_last(|u| match u {
            DisplayUpdate::ClockFace(view) => Some(view.clone()),
            _ => None,
        })
    }

    /// Number of timer alerts raised
    #[must_use]
    pub fn alert_count(&self) -> usize {
        self.updates
            .borrow()
            .iter()
            .filter(|u| matches!(u, DisplayUpdate::TimerAlert))
            .count()
    }

    fn find_last<T>(&self, pick: impl Fn(&DisplayUpdate) -> Option<T>) -> Option<T> {
        self.updates.borrow().iter().rev().find_map(pick)
    }
}

impl DisplaySink for RecordingSink {
    fn render(&self, update: DisplayUpdate) {
        self.updates.borrow_mut().push(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink_accepts_anything() {
        NullSink.render(DisplayUpdate::TimerAlert);
    }

    #[test]
    fn test_recording_sink_order_and_lookup() {
        let sink = RecordingSink::new();
        sink.render(DisplayUpdate::History(vec!["1 + 1 = 2".into()]));
        sink.render(DisplayUpdate::TimerAlert);
        sink.render(DisplayUpdate::History(vec![]));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.last_history(), Some(vec![]));
        assert_eq!(sink.alert_count(), 1);
        assert!(sink.last_timer().is_none());

        sink.clear();
        assert!(sink.is_empty());
    }
}
