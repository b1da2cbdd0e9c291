//! Command handlers
//!
//! One-shot commands (`calc`, `history`, `theme`) replay input against a
//! [`ManualScheduler`] and never wait. Live commands (`timer`, `stopwatch`,
//! `clock --watch`) run on [`crate::runtime::TokioScheduler`].

pub mod calc;
pub mod store;
pub mod timing;

use crate::config::CliConfig;
use crate::error::CliResult;
use deskkit::{Clock, FakeClock, FileStorage, ManualScheduler, NullSink, Ports, Storage, SystemClock};
use std::rc::Rc;

/// File storage under the configured data directory, created if missing
pub fn file_storage(config: &CliConfig) -> CliResult<Rc<dyn Storage>> {
    tracing::debug!(dir = %config.data_dir().display(), "Using data directory");
    Ok(Rc::new(FileStorage::open(config.data_dir())?))
}

/// Ports for replaying input instantly: a clock frozen at the current time,
/// a manual scheduler and no display
#[must_use]
pub fn replay_ports(storage: Rc<dyn Storage>) -> Ports {
    let clock = Rc::new(FakeClock::new(SystemClock::new().now_ms()));
    let scheduler = Rc::new(ManualScheduler::new(Rc::clone(&clock)));
    Ports::new(clock, scheduler, Rc::new(NullSink), storage)
}

/// Local UTC offset for the clock face
#[must_use]
pub fn local_offset() -> chrono::FixedOffset {
    *chrono::Local::now().offset()
}
