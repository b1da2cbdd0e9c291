//! Clock page: wall-clock face, countdown timer and stopwatch behind tabs

use crate::config::DeskConfig;
use crate::display::{DisplayUpdate, ThemeScope};
use crate::ports::Ports;
use crate::scheduler::TaskHandle;
use crate::stopwatch::Stopwatch;
use crate::storage::CLOCK_THEME_KEY;
use crate::theme::{Theme, ThemePreference};
use crate::timer::Timer;
use chrono::{DateTime, FixedOffset, Utc};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Wall-clock refresh cadence
pub const CLOCK_REFRESH: Duration = Duration::from_secs(1);

/// What the clock face shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockFaceView {
    /// `HH:MM:SS`, 24-hour
    pub time: String,
    /// Long date, e.g. `Monday, January 1, 2024`
    pub date: String,
    /// e.g. `Timezone: UTC+02:00`
    pub timezone: String,
}

/// Render the clock face for a Unix time in milliseconds
#[must_use]
pub fn clock_face(now_ms: u64, offset: FixedOffset) -> ClockFaceView {
    let utc = DateTime::<Utc>::from_timestamp_millis(now_ms as i64).unwrap_or_default();
    let local = utc.with_timezone(&offset);
    ClockFaceView {
        time: local.format("%H:%M:%S").to_string(),
        date: local.format("%A, %B %-d, %Y").to_string(),
        timezone: format!("Timezone: UTC{offset}"),
    }
}

#[derive(Debug)]
struct ClockState {
    theme: ThemePreference,
    refresh: Option<TaskHandle>,
}

#[derive(Debug)]
struct ClockInner {
    state: RefCell<ClockState>,
    ports: Ports,
    offset: FixedOffset,
}

impl ClockInner {
    fn face(&self) -> ClockFaceView {
        clock_face(self.ports.now_ms(), self.offset)
    }

    fn publish(&self) {
        self.ports.render(DisplayUpdate::ClockFace(self.face()));
    }
}

/// Wall clock refreshed once a second
#[derive(Debug, Clone)]
pub struct ClockPage {
    inner: Rc<ClockInner>,
}

impl ClockPage {
    /// Create a stopped clock in `offset`, restoring the page theme
    #[must_use]
    pub fn new(ports: Ports, offset: FixedOffset) -> Self {
        let theme = ThemePreference::load(ports.storage.as_ref(), CLOCK_THEME_KEY);
        let page = Self {
            inner: Rc::new(ClockInner {
                state: RefCell::new(ClockState {
                    theme,
                    refresh: None,
                }),
                ports,
                offset,
            }),
        };
        page.publish_theme();
        page.inner.publish();
        page
    }

    /// Begin the once-a-second refresh. No-op if already refreshing.
    pub fn start(&self) {
        let mut state = self.inner.state.borrow_mut();
        if state.refresh.is_some() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        state.refresh = Some(self.inner.ports.every(
            CLOCK_REFRESH,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.publish();
                }
            }),
        ));
    }

    /// Stop refreshing
    pub fn stop(&self) {
        let mut state = self.inner.state.borrow_mut();
        self.inner.ports.cancel(&mut state.refresh);
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.inner.state.borrow().refresh.is_some()
    }

    /// Face for the current instant
    #[must_use]
    pub fn face(&self) -> ClockFaceView {
        self.inner.face()
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.inner.state.borrow().theme.theme()
    }

    /// Flip and persist the clock page theme
    pub fn toggle_theme(&self) -> Theme {
        let theme = {
            let mut state = self.inner.state.borrow_mut();
            state.theme.toggle(self.inner.ports.storage.as_ref())
        };
        self.publish_theme();
        theme
    }

    fn publish_theme(&self) {
        self.inner.ports.render(DisplayUpdate::Theme {
            scope: ThemeScope::Clock,
            theme: self.theme(),
        });
    }
}

/// Clock page tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Clock,
    Timer,
    Stopwatch,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Clock => "clock",
            Self::Timer => "timer",
            Self::Stopwatch => "stopwatch",
        };
        f.write_str(name)
    }
}

/// The whole clock page: face, timer and stopwatch with one visible tab.
///
/// Leaving the timer tab pauses a running timer, and leaving the stopwatch
/// tab pauses a running stopwatch.
#[derive(Debug)]
pub struct TimeDesk {
    clock: ClockPage,
    timer: Timer,
    stopwatch: Stopwatch,
    active: Cell<Tab>,
}

impl TimeDesk {
    /// Build every widget on shared ports and start the wall clock
    #[must_use]
    pub fn new(ports: Ports, config: &DeskConfig, offset: FixedOffset) -> Self {
        let clock = ClockPage::new(ports.clone(), offset);
        clock.start();
        Self {
            clock,
            timer: Timer::new(ports.clone(), config.timer),
            stopwatch: Stopwatch::new(ports, config.stopwatch),
            active: Cell::new(Tab::Clock),
        }
    }

    /// Show `tab`, pausing whatever runs on the tabs being hidden
    pub fn switch_tab(&self, tab: Tab) {
        if tab != Tab::Timer && self.timer.running() {
            self.timer.pause();
        }
        if tab != Tab::Stopwatch && self.stopwatch.running() {
            self.stopwatch.pause();
        }
        tracing::debug!(from = %self.active.get(), to = %tab, "Switching tab");
        self.active.set(tab);
    }

    #[must_use]
    pub fn active_tab(&self) -> Tab {
        self.active.get()
    }

    #[must_use]
    pub fn clock(&self) -> &ClockPage {
        &self.clock
    }

    #[must_use]
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    #[must_use]
    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::TestPorts;
    use crate::storage::MemoryStorage;
    use crate::timer::TimerPhase;

    // 2024-01-01T00:00:00Z, a Monday
    const NEW_YEAR_MS: u64 = 1_704_067_200_000;

    fn offset(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[test]
    fn test_clock_face_utc() {
        let face = clock_face(NEW_YEAR_MS + 3_723_000, offset(0));
        assert_eq!(face.time, "01:02:03");
        assert_eq!(face.date, "Monday, January 1, 2024");
        assert_eq!(face.timezone, "Timezone: UTC+00:00");
    }

    #[test]
    fn test_clock_face_offset_crosses_midnight() {
        let face = clock_face(NEW_YEAR_MS - 1_000, offset(2));
        assert_eq!(face.time, "01:59:59");
        assert_eq!(face.date, "Monday, January 1, 2024");
        assert_eq!(face.timezone, "Timezone: UTC+02:00");

        let face = clock_face(NEW_YEAR_MS, offset(-5));
        assert_eq!(face.date, "Sunday, December 31, 2023");
        assert_eq!(face.timezone, "Timezone: UTC-05:00");
    }

    #[test]
    fn test_clock_refreshes_every_second() {
        let test = TestPorts::new(NEW_YEAR_MS);
        let page = ClockPage::new(test.ports(), offset(0));
        page.start();
        page.start();
        assert_eq!(test.scheduler.pending(), 1);

        test.advance_ms(2_000);
        assert_eq!(test.sink.last_clock_face().unwrap().time, "00:00:02");

        page.stop();
        assert!(!page.is_refreshing());
        assert_eq!(test.scheduler.pending(), 0);
    }

    #[test]
    fn test_clock_theme_persisted() {
        let test = TestPorts::new(NEW_YEAR_MS);
        let page = ClockPage::new(test.ports(), offset(0));
        assert_eq!(page.toggle_theme(), Theme::Dark);
        assert_eq!(test.storage.raw(CLOCK_THEME_KEY).as_deref(), Some("\"dark\""));

        let restored = ClockPage::new(test.ports(), offset(0));
        assert_eq!(restored.theme(), Theme::Dark);
    }

    #[test]
    fn test_clock_theme_accepts_bare_word() {
        let storage = MemoryStorage::new().with_entry(CLOCK_THEME_KEY, "dark");
        let test = TestPorts::with_storage(NEW_YEAR_MS, storage);
        let page = ClockPage::new(test.ports(), offset(0));
        assert_eq!(page.theme(), Theme::Dark);
    }

    #[test]
    fn test_leaving_timer_tab_pauses_timer() {
        let test = TestPorts::new(NEW_YEAR_MS);
        let desk = TimeDesk::new(test.ports(), &DeskConfig::default(), offset(0));
        desk.switch_tab(Tab::Timer);
        desk.timer().start();
        test.advance_ms(3_000);
        desk.switch_tab(Tab::Stopwatch);
        assert_eq!(desk.timer().phase(), TimerPhase::Paused);
        assert_eq!(desk.timer().remaining_seconds(), 297);
        assert_eq!(desk.active_tab(), Tab::Stopwatch);
    }

    #[test]
    fn test_leaving_stopwatch_tab_pauses_stopwatch() {
        let test = TestPorts::new(NEW_YEAR_MS);
        let desk = TimeDesk::new(test.ports(), &DeskConfig::default(), offset(0));
        desk.switch_tab(Tab::Stopwatch);
        desk.stopwatch().start();
        test.advance_ms(1_000);
        desk.switch_tab(Tab::Stopwatch);
        assert!(desk.stopwatch().running());
        desk.switch_tab(Tab::Clock);
        assert!(!desk.stopwatch().running());
        assert_eq!(desk.stopwatch().elapsed_ms(), 1_000);
    }

    #[test]
    fn test_desk_starts_clock() {
        let test = TestPorts::new(NEW_YEAR_MS);
        let desk = TimeDesk::new(test.ports(), &DeskConfig::default(), offset(0));
        assert!(desk.clock().is_refreshing());
        assert_eq!(desk.active_tab(), Tab::Clock);
    }
}
