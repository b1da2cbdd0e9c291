//! Stopwatch with laps
//!
//! Elapsed time is always derived from the clock (`now - start_anchor`), so
//! the periodic refresh is presentation only and pause/resume is additive.

use crate::config::StopwatchConfig;
use crate::display::DisplayUpdate;
use crate::format::format_millis;
use crate::ports::Ports;
use crate::scheduler::TaskHandle;
use crate::storage::{self, STOPWATCH_LAPS_KEY};
use serde::{Deserialize, Deserializer, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// One recorded lap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lap {
    /// 1-based lap number
    #[serde(rename = "lapNumber")]
    pub index: u32,
    /// Time since the previous lap
    #[serde(rename = "lapTime")]
    pub lap_ms: u64,
    /// Elapsed time when the lap was taken
    #[serde(rename = "totalTime")]
    pub total_ms: u64,
    /// Clock time the lap was taken, in milliseconds
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: u64,
}

// Older payloads store a locale time string here; keep the lap, drop the value
fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64().unwrap_or(0))
}

impl fmt::Display for Lap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lap {:<3} {:>11} {:>11}",
            self.index,
            format_millis(self.lap_ms),
            format_millis(self.total_ms)
        )
    }
}

/// What the stopwatch display shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopwatchView {
    /// `MM:SS.hh`, or `HH:MM:SS` from one hour up
    pub display: String,
    pub elapsed_ms: u64,
    pub running: bool,
}

#[derive(Debug)]
struct StopwatchState {
    running: bool,
    start_anchor: u64,
    // Frozen elapsed time while paused
    elapsed: u64,
    last_lap_total: u64,
    laps: VecDeque<Lap>,
    refresh: Option<TaskHandle>,
}

impl StopwatchState {
    fn elapsed_at(&self, now_ms: u64) -> u64 {
        if self.running {
            now_ms.saturating_sub(self.start_anchor)
        } else {
            self.elapsed
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: RefCell<StopwatchState>,
    ports: Ports,
    config: StopwatchConfig,
}

impl Inner {
    fn view(&self) -> StopwatchView {
        let state = self.state.borrow();
        let elapsed_ms = state.elapsed_at(self.ports.now_ms());
        StopwatchView {
            display: format_millis(elapsed_ms),
            elapsed_ms,
            running: state.running,
        }
    }

    fn publish(&self) {
        let view = self.view();
        self.ports.render(DisplayUpdate::Stopwatch(view));
    }

    fn publish_laps(&self) {
        let laps = self.state.borrow().laps.iter().cloned().collect();
        self.ports.render(DisplayUpdate::Laps(laps));
    }

    fn save_laps(&self, laps: &VecDeque<Lap>) {
        storage::save_json(self.ports.storage.as_ref(), STOPWATCH_LAPS_KEY, laps);
    }
}

/// Stopwatch handle. Clones share the same stopwatch.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    inner: Rc<Inner>,
}

impl Stopwatch {
    /// Create a stopped stopwatch, restoring saved laps
    #[must_use]
    pub fn new(ports: Ports, config: StopwatchConfig) -> Self {
        let mut laps: VecDeque<Lap> =
            storage::load_json::<Vec<Lap>>(ports.storage.as_ref(), STOPWATCH_LAPS_KEY)
                .unwrap_or_default()
                .into();
        laps.truncate(config.lap_capacity);
        tracing::debug!(laps = laps.len(), "Stopwatch restored");

        let state = StopwatchState {
            running: false,
            start_anchor: 0,
            elapsed: 0,
            last_lap_total: 0,
            laps,
            refresh: None,
        };
        let stopwatch = Self {
            inner: Rc::new(Inner {
                state: RefCell::new(state),
                ports,
                config,
            }),
        };
        stopwatch.inner.publish();
        stopwatch.inner.publish_laps();
        stopwatch
    }

    /// Start or resume. No-op while running.
    pub fn start(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.running {
                return;
            }
            let now = self.inner.ports.now_ms();
            state.start_anchor = now.saturating_sub(state.elapsed);
            state.running = true;

            let weak = Rc::downgrade(&self.inner);
            state.refresh = Some(self.inner.ports.every(
                Duration::from_millis(self.inner.config.refresh_ms),
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.publish();
                    }
                }),
            ));
            tracing::debug!(elapsed_ms = state.elapsed, "Stopwatch started");
        }
        self.inner.publish();
    }

    /// Freeze elapsed time. No-op while stopped.
    pub fn pause(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            let state = &mut *state;
            if !state.running {
                return;
            }
            state.elapsed = self.inner.ports.now_ms().saturating_sub(state.start_anchor);
            state.running = false;
            self.inner.ports.cancel(&mut state.refresh);
            tracing::debug!(elapsed_ms = state.elapsed, "Stopwatch paused");
        }
        self.inner.publish();
    }

    /// Stop, zero elapsed time and forget every lap
    pub fn reset(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            let state = &mut *state;
            self.inner.ports.cancel(&mut state.refresh);
            state.running = false;
            state.start_anchor = 0;
            state.elapsed = 0;
            state.last_lap_total = 0;
            state.laps.clear();
            self.inner.save_laps(&state.laps);
        }
        tracing::debug!("Stopwatch reset");
        self.inner.publish();
        self.inner.publish_laps();
    }

    /// Record a lap at the current elapsed time. Only while running.
    pub fn record_lap(&self) -> Option<Lap> {
        let lap = {
            let mut state = self.inner.state.borrow_mut();
            if !state.running {
                return None;
            }
            let now = self.inner.ports.now_ms();
            let total = state.elapsed_at(now);
            let lap = Lap {
                // Restored lap numbers may already sit at the maximum
                index: state
                    .laps
                    .front()
                    .map_or(1, |newest| newest.index.saturating_add(1)),
                lap_ms: total.saturating_sub(state.last_lap_total),
                total_ms: total,
                timestamp: now,
            };
            state.last_lap_total = total;
            state.laps.push_front(lap.clone());
            state.laps.truncate(self.inner.config.lap_capacity);
            self.inner.save_laps(&state.laps);
            lap
        };
        tracing::debug!(index = lap.index, lap_ms = lap.lap_ms, "Lap recorded");
        self.inner.publish_laps();
        Some(lap)
    }

    /// Elapsed time right now
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.inner.state.borrow().elapsed_at(self.inner.ports.now_ms())
    }

    /// Laps, newest first
    #[must_use]
    pub fn laps(&self) -> Vec<Lap> {
        self.inner.state.borrow().laps.iter().cloned().collect()
    }

    #[must_use]
    pub fn running(&self) -> bool {
        self.inner.state.borrow().running
    }

    /// Current display
    #[must_use]
    pub fn view(&self) -> StopwatchView {
        self.inner.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::TestPorts;
    use crate::storage::MemoryStorage;

    fn stopwatch() -> (TestPorts, Stopwatch) {
        let test = TestPorts::new(1_000_000);
        let sw = Stopwatch::new(test.ports(), StopwatchConfig::default());
        (test, sw)
    }

    #[test]
    fn test_initial_state() {
        let (test, sw) = stopwatch();
        assert_eq!(sw.elapsed_ms(), 0);
        assert!(!sw.running());
        assert_eq!(test.sink.last_stopwatch().unwrap().display, "00:00.00");
        assert_eq!(test.sink.last_laps(), Some(vec![]));
    }

    #[test]
    fn test_elapsed_follows_clock() {
        let (test, sw) = stopwatch();
        sw.start();
        test.advance_ms(1234);
        assert_eq!(sw.elapsed_ms(), 1234);
        assert_eq!(test.sink.last_stopwatch().unwrap().display, "00:01.23");
    }

    #[test]
    fn test_refresh_is_presentation_only() {
        let (test, sw) = stopwatch();
        sw.start();
        // Clock moves without the scheduler firing
        test.clock.advance_ms(5_000);
        assert_eq!(sw.elapsed_ms(), 5_000);
    }

    #[test]
    fn test_pause_resume_is_additive() {
        let (test, sw) = stopwatch();
        sw.start();
        test.advance_ms(3_000);
        sw.pause();
        test.advance_ms(10_000);
        assert_eq!(sw.elapsed_ms(), 3_000);
        sw.start();
        test.advance_ms(2_000);
        assert_eq!(sw.elapsed_ms(), 5_000);
    }

    #[test]
    fn test_start_twice_single_task() {
        let (test, sw) = stopwatch();
        sw.start();
        sw.start();
        assert_eq!(test.scheduler.pending(), 1);
        sw.pause();
        assert_eq!(test.scheduler.pending(), 0);
    }

    #[test]
    fn test_lap_only_while_running() {
        let (_, sw) = stopwatch();
        assert_eq!(sw.record_lap(), None);
        assert!(sw.laps().is_empty());
    }

    #[test]
    fn test_laps_newest_first() {
        let (test, sw) = stopwatch();
        sw.start();
        test.advance_ms(1_500);
        let first = sw.record_lap().unwrap();
        test.advance_ms(2_000);
        let second = sw.record_lap().unwrap();

        assert_eq!((first.index, first.lap_ms, first.total_ms), (1, 1_500, 1_500));
        assert_eq!((second.index, second.lap_ms, second.total_ms), (2, 2_000, 3_500));
        assert_eq!(sw.laps(), vec![second.clone(), first]);
        assert_eq!(second.timestamp, 1_003_500);
    }

    #[test]
    fn test_lap_durations_sum_across_pause() {
        let (test, sw) = stopwatch();
        sw.start();
        test.advance_ms(700);
        sw.record_lap();
        sw.pause();
        test.advance_ms(9_000);
        sw.start();
        test.advance_ms(300);
        let last = sw.record_lap().unwrap();
        let sum: u64 = sw.laps().iter().map(|l| l.lap_ms).sum();
        assert_eq!(sum, last.total_ms);
        assert_eq!(last.total_ms, 1_000);
    }

    #[test]
    fn test_lap_capacity_and_numbering() {
        let (test, sw) = stopwatch();
        sw.start();
        for _ in 0..25 {
            test.advance_ms(100);
            sw.record_lap();
        }
        let laps = sw.laps();
        assert_eq!(laps.len(), 20);
        assert_eq!(laps[0].index, 25);
        assert_eq!(laps[19].index, 6);
    }

    #[test]
    fn test_reset_clears_everything() {
        let (test, sw) = stopwatch();
        sw.start();
        test.advance_ms(800);
        sw.record_lap();
        sw.reset();
        assert_eq!(sw.elapsed_ms(), 0);
        assert!(!sw.running());
        assert!(sw.laps().is_empty());
        assert_eq!(test.scheduler.pending(), 0);
        assert_eq!(test.storage.raw(STOPWATCH_LAPS_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_laps_persisted_and_restored() {
        let (test, sw) = stopwatch();
        sw.start();
        test.advance_ms(250);
        sw.record_lap();

        let raw = test.storage.raw(STOPWATCH_LAPS_KEY).unwrap();
        assert!(raw.contains("\"lapNumber\":1"));
        assert!(raw.contains("\"lapTime\":250"));
        assert!(raw.contains("\"totalTime\":250"));

        let restored = Stopwatch::new(test.ports(), StopwatchConfig::default());
        assert_eq!(restored.laps(), sw.laps());
        restored.start();
        test.advance_ms(10);
        assert_eq!(restored.record_lap().unwrap().index, 2);
    }

    #[test]
    fn test_legacy_string_timestamp_accepted() {
        let storage = MemoryStorage::new().with_entry(
            STOPWATCH_LAPS_KEY,
            r#"[{"lapNumber":3,"lapTime":1200,"totalTime":5000,"timestamp":"10:15:30 AM"}]"#,
        );
        let test = TestPorts::with_storage(0, storage);
        let sw = Stopwatch::new(test.ports(), StopwatchConfig::default());
        let laps = sw.laps();
        assert_eq!(laps.len(), 1);
        assert_eq!(laps[0].index, 3);
        assert_eq!(laps[0].timestamp, 0);
    }

    #[test]
    fn test_restored_max_lap_number_does_not_overflow() {
        let storage = MemoryStorage::new().with_entry(
            STOPWATCH_LAPS_KEY,
            r#"[{"lapNumber":4294967295,"lapTime":1,"totalTime":1,"timestamp":0}]"#,
        );
        let test = TestPorts::with_storage(0, storage);
        let sw = Stopwatch::new(test.ports(), StopwatchConfig::default());
        sw.start();
        test.advance_ms(10);

        let lap = sw.record_lap().unwrap();
        assert_eq!(lap.index, u32::MAX);
        assert_eq!(lap.lap_ms, 10);
        assert_eq!(sw.laps().len(), 2);
    }

    #[test]
    fn test_corrupt_laps_fall_back_to_empty() {
        let storage = MemoryStorage::new().with_entry(STOPWATCH_LAPS_KEY, "{not json");
        let test = TestPorts::with_storage(0, storage);
        let sw = Stopwatch::new(test.ports(), StopwatchConfig::default());
        assert!(sw.laps().is_empty());
    }

    #[test]
    fn test_lap_display() {
        let lap = Lap {
            index: 4,
            lap_ms: 1_230,
            total_ms: 65_010,
            timestamp: 0,
        };
        assert_eq!(lap.to_string(), "Lap 4      00:01.23    01:05.01");
    }
}
