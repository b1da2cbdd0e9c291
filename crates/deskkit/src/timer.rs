//! Countdown timer
//!
//! Counts down one second per tick from a configured duration. On reaching
//! zero it stops its tick task, raises [`DisplayUpdate::TimerAlert`] and
//! flashes the display a fixed number of times.
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --start--> Running
//!                    |
//!                    +--zero--> Expired --reset/start--> ...
//! ```

use crate::config::TimerConfig;
use crate::display::DisplayUpdate;
use crate::format::format_seconds;
use crate::ports::Ports;
use crate::scheduler::TaskHandle;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Maximum minutes accepted by [`Timer::configure`]
pub const MAX_MINUTES: u64 = 60;
/// Maximum seconds accepted by [`Timer::configure`]
pub const MAX_SECONDS: u64 = 59;
/// Longest duration a timer can hold
pub const MAX_DURATION_SECS: u64 = MAX_MINUTES * 60 + MAX_SECONDS;

/// Timer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// Showing the configured duration
    Idle,
    /// Counting down
    Running,
    /// Stopped with time remaining
    Paused,
    /// Reached zero
    Expired,
}

/// What the timer display shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerView {
    /// `MM:SS`, or `HH:MM:SS` for a full hour
    pub display: String,
    /// Seconds left
    pub remaining_seconds: u64,
    /// Lifecycle phase
    pub phase: TimerPhase,
    /// Low-time highlight
    pub warning: bool,
    /// Expiry flash state
    pub flash_on: bool,
    /// Status line under the display
    pub status: String,
}

/// Status line announcing a newly configured duration
#[must_use]
pub fn set_message(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let plural = |n: u64| if n == 1 { "" } else { "s" };

    let mut message = String::from("Timer set for ");
    if minutes > 0 {
        message.push_str(&format!("{minutes} minute{}", plural(minutes)));
    }
    if minutes > 0 && seconds > 0 {
        message.push_str(" and ");
    }
    if seconds > 0 || minutes == 0 {
        message.push_str(&format!("{seconds} second{}", plural(seconds)));
    }
    message.push_str(". Click start to begin.");
    message
}

#[derive(Debug)]
struct TimerState {
    configured: u64,
    remaining: u64,
    phase: TimerPhase,
    status: String,
    tick: Option<TaskHandle>,
    flash: Option<TaskHandle>,
    flashes_left: u32,
    flash_on: bool,
}

impl TimerState {
    fn view(&self, warning_threshold: u64) -> TimerView {
        TimerView {
            display: format_seconds(self.remaining),
            remaining_seconds: self.remaining,
            phase: self.phase,
            warning: self.remaining > 0 && self.remaining <= warning_threshold,
            flash_on: self.flash_on,
            status: self.status.clone(),
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: RefCell<TimerState>,
    ports: Ports,
    config: TimerConfig,
}

impl Inner {
    fn publish(&self) {
        let view = self.state.borrow().view(self.config.warning_threshold_secs);
        self.ports.render(DisplayUpdate::Timer(view));
    }

    fn stop_flashing(&self, state: &mut TimerState) {
        self.ports.cancel(&mut state.flash);
        state.flashes_left = 0;
        state.flash_on = false;
    }

    fn tick(self: &Rc<Self>) {
        let expired = {
            let mut state = self.state.borrow_mut();
            if state.phase != TimerPhase::Running {
                return;
            }
            state.remaining = state.remaining.saturating_sub(1);
            state.remaining == 0
        };
        if expired {
            self.expire();
        } else {
            self.publish();
        }
    }

    fn expire(self: &Rc<Self>) {
        {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            self.ports.cancel(&mut state.tick);
            state.phase = TimerPhase::Expired;
            state.status = "Time's up! Timer finished.".to_string();

            self.stop_flashing(state);
            if self.config.flash_count > 0 {
                state.flashes_left = self.config.flash_count;
                let weak = Rc::downgrade(self);
                state.flash = Some(self.ports.every(
                    Duration::from_millis(self.config.flash_interval_ms),
                    Box::new(move || {
                        if let Some(inner) = weak.upgrade() {
                            inner.flash();
                        }
                    }),
                ));
            }
        }
        tracing::info!(seconds = self.config_seconds(), "Timer finished");
        self.publish();
        self.ports.render(DisplayUpdate::TimerAlert);
    }

    fn flash(&self) {
        {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            if state.flashes_left == 0 {
                return;
            }
            state.flash_on = !state.flash_on;
            state.flashes_left -= 1;
            if state.flashes_left == 0 {
                self.ports.cancel(&mut state.flash);
                state.flash_on = false;
            }
        }
        self.publish();
    }

    fn config_seconds(&self) -> u64 {
        self.state.borrow().configured
    }
}

/// Countdown timer handle. Clones share the same timer.
#[derive(Debug, Clone)]
pub struct Timer {
    inner: Rc<Inner>,
}

impl Timer {
    /// Create an idle timer loaded with the default duration
    #[must_use]
    pub fn new(ports: Ports, config: TimerConfig) -> Self {
        let initial = config.default_seconds.min(MAX_DURATION_SECS);
        let state = TimerState {
            configured: initial,
            remaining: initial,
            phase: TimerPhase::Idle,
            status: set_message(initial),
            tick: None,
            flash: None,
            flashes_left: 0,
            flash_on: false,
        };
        let timer = Self {
            inner: Rc::new(Inner {
                state: RefCell::new(state),
                ports,
                config,
            }),
        };
        timer.inner.publish();
        timer
    }

    /// Set the duration, clamping minutes to 0-60 and seconds to 0-59.
    ///
    /// A running countdown keeps going; the new duration applies on the next
    /// reset or restart.
    pub fn configure(&self, minutes: i64, seconds: i64) -> u64 {
        let minutes = minutes.clamp(0, MAX_MINUTES as i64) as u64;
        let seconds = seconds.clamp(0, MAX_SECONDS as i64) as u64;
        let total = minutes * 60 + seconds;
        {
            let mut state = self.inner.state.borrow_mut();
            let state = &mut *state;
            state.configured = total;
            if state.phase == TimerPhase::Running {
                tracing::debug!(total, "Duration changed while running");
                return total;
            }
            self.inner.stop_flashing(state);
            state.remaining = total;
            state.phase = TimerPhase::Idle;
            state.status = set_message(total);
        }
        tracing::debug!(total, "Timer configured");
        self.inner.publish();
        total
    }

    /// Start or resume the countdown. Returns whether a countdown is running
    /// afterwards because of this call.
    ///
    /// No-op while running. After expiry, or with nothing left, the
    /// configured duration is reloaded first; a zero duration never starts.
    pub fn start(&self) -> bool {
        {
            let mut state = self.inner.state.borrow_mut();
            let state = &mut *state;
            if state.phase == TimerPhase::Running {
                return false;
            }
            if state.phase == TimerPhase::Expired || state.remaining == 0 {
                state.remaining = state.configured;
            }
            if state.remaining == 0 {
                tracing::debug!("Refusing to start a zero-length timer");
                return false;
            }

            self.inner.stop_flashing(state);
            state.phase = TimerPhase::Running;
            state.status = "Timer started...".to_string();

            let weak = Rc::downgrade(&self.inner);
            state.tick = Some(self.inner.ports.every(
                Duration::from_millis(self.inner.config.tick_ms),
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.tick();
                    }
                }),
            ));
            tracing::debug!(remaining = state.remaining, "Timer started");
        }
        self.inner.publish();
        true
    }

    /// Stop counting, keeping the remaining time
    pub fn pause(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            let state = &mut *state;
            if state.phase != TimerPhase::Running {
                return;
            }
            self.inner.ports.cancel(&mut state.tick);
            state.phase = TimerPhase::Paused;
            state.status = "Timer paused".to_string();
            tracing::debug!(remaining = state.remaining, "Timer paused");
        }
        self.inner.publish();
    }

    /// Stop and reload the configured duration
    pub fn reset(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            let state = &mut *state;
            self.inner.ports.cancel(&mut state.tick);
            self.inner.stop_flashing(state);
            state.remaining = state.configured;
            state.phase = TimerPhase::Idle;
            state.status = "Timer reset".to_string();
        }
        tracing::debug!("Timer reset");
        self.inner.publish();
    }

    /// Seconds left on the countdown
    #[must_use]
    pub fn remaining_seconds(&self) -> u64 {
        self.inner.state.borrow().remaining
    }

    /// Configured duration in seconds
    #[must_use]
    pub fn configured_seconds(&self) -> u64 {
        self.inner.state.borrow().configured
    }

    #[must_use]
    pub fn running(&self) -> bool {
        self.phase() == TimerPhase::Running
    }

    #[must_use]
    pub fn expired(&self) -> bool {
        self.phase() == TimerPhase::Expired
    }

    #[must_use]
    pub fn phase(&self) -> TimerPhase {
        self.inner.state.borrow().phase
    }

    /// Current status line
    #[must_use]
    pub fn status(&self) -> String {
        self.inner.state.borrow().status.clone()
    }

    /// Current display
    #[must_use]
    pub fn view(&self) -> TimerView {
        self.inner
            .state
            .borrow()
            .view(self.inner.config.warning_threshold_secs)
    }
}
