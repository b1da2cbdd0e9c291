//! deskkit: calculator, countdown timer and stopwatch engines
//!
//! Each engine maps an input event to the next display output and the next
//! persisted state. Nothing touches a real screen, timer or disk directly;
//! every side effect goes through a port injected at construction.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Ports                               │
//! │   Clock      Scheduler      DisplaySink       Storage        │
//! └─────┬────────────┬──────────────┬───────────────┬────────────┘
//!       │            │              │               │
//!  ┌────▼─────┐ ┌────▼────┐   ┌─────▼─────┐   ┌─────▼─────┐
//!  │Calculator│ │  Timer  │   │ Stopwatch │   │ ClockPage │
//!  └──────────┘ └─────────┘   └───────────┘   └───────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use deskkit::prelude::*;
//!
//! let test = TestPorts::new(0);
//! let calc = CalculatorEngine::new(test.ports(), CalculatorConfig::default());
//! for key in ["5", "+", "3", "*", "2", "="] {
//!     calc.handle_key(key);
//! }
//! assert_eq!(calc.current_operand(), "16");
//! ```

// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod calculator;
pub mod clock;
pub mod clock_page;
pub mod config;
pub mod display;
mod error;
pub mod format;
pub mod ports;
pub mod scheduler;
pub mod sim;
pub mod stopwatch;
pub mod storage;
pub mod theme;
pub mod timer;

pub use calculator::{CalcAction, CalcError, CalculatorEngine, CalculatorView, Operation, Phase};
pub use clock::{Clock, FakeClock, SystemClock};
pub use clock_page::{clock_face, ClockFaceView, ClockPage, Tab, TimeDesk};
pub use config::{CalculatorConfig, DeskConfig, StopwatchConfig, TimerConfig};
pub use display::{DisplaySink, DisplayUpdate, NullSink, RecordingSink, ThemeScope};
pub use error::{DeskError, DeskResult, StorageError};
pub use ports::{Ports, TestPorts};
pub use scheduler::{Callback, Scheduler, TaskHandle};
pub use sim::ManualScheduler;
pub use stopwatch::{Lap, Stopwatch, StopwatchView};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use theme::{Theme, ThemePreference};
pub use timer::{Timer, TimerPhase, TimerView};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::calculator::{CalcAction, CalculatorEngine, CalculatorView, Operation, Phase};
    pub use super::clock_page::{ClockPage, Tab, TimeDesk};
    pub use super::config::{CalculatorConfig, DeskConfig, StopwatchConfig, TimerConfig};
    pub use super::display::{DisplaySink, DisplayUpdate, RecordingSink};
    pub use super::ports::{Ports, TestPorts};
    pub use super::stopwatch::{Lap, Stopwatch};
    pub use super::storage::{MemoryStorage, Storage};
    pub use super::theme::Theme;
    pub use super::timer::{Timer, TimerPhase};
    pub use super::{DeskError, DeskResult};
}
