//! Collaborators injected into every engine

use crate::clock::{Clock, FakeClock};
use crate::display::{DisplaySink, DisplayUpdate, RecordingSink};
use crate::scheduler::{Callback, Scheduler, TaskHandle};
use crate::sim::ManualScheduler;
use crate::storage::{MemoryStorage, Storage};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Clock, scheduler, display sink and storage shared by the engines
#[derive(Clone)]
pub struct Ports {
    /// Time source
    pub clock: Rc<dyn Clock>,
    /// Task scheduler
    pub scheduler: Rc<dyn Scheduler>,
    /// Display output
    pub sink: Rc<dyn DisplaySink>,
    /// Persistent key/value store
    pub storage: Rc<dyn Storage>,
}

impl fmt::Debug for Ports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ports")
            .field("now_ms", &self.clock.now_ms())
            .finish_non_exhaustive()
    }
}

impl Ports {
    /// Bundle the four collaborators
    #[must_use]
    pub fn new(
        clock: Rc<dyn Clock>,
        scheduler: Rc<dyn Scheduler>,
        sink: Rc<dyn DisplaySink>,
        storage: Rc<dyn Storage>,
    ) -> Self {
        Self {
            clock,
            scheduler,
            sink,
            storage,
        }
    }

    pub(crate) fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub(crate) fn render(&self, update: DisplayUpdate) {
        self.sink.render(update);
    }

    pub(crate) fn every(&self, interval: Duration, callback: Callback) -> TaskHandle {
        self.scheduler.schedule_periodic(interval, callback)
    }

    pub(crate) fn after(&self, delay: Duration, callback: Callback) -> TaskHandle {
        self.scheduler.schedule_once(delay, callback)
    }

    /// Cancel the task in `slot`, if any, leaving the slot empty
    pub(crate) fn cancel(&self, slot: &mut Option<TaskHandle>) {
        if let Some(handle) = slot.take() {
            self.scheduler.cancel(handle);
        }
    }
}

/// Fully deterministic port set with handles to every test double
#[derive(Debug, Clone)]
pub struct TestPorts {
    /// Fake clock driving the scheduler
    pub clock: Rc<FakeClock>,
    /// Manually advanced scheduler
    pub scheduler: Rc<ManualScheduler>,
    /// Recording sink
    pub sink: Rc<RecordingSink>,
    /// In-memory storage
    pub storage: Rc<MemoryStorage>,
}

impl TestPorts {
    /// Fresh doubles with the clock at `start_ms`
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self::with_storage(start_ms, MemoryStorage::new())
    }

    /// Fresh doubles over pre-seeded storage
    #[must_use]
    pub fn with_storage(start_ms: u64, storage: MemoryStorage) -> Self {
        let clock = Rc::new(FakeClock::new(start_ms));
        let scheduler = Rc::new(ManualScheduler::new(Rc::clone(&clock)));
        Self {
            clock,
            scheduler,
            sink: Rc::new(RecordingSink::new()),
            storage: Rc::new(storage),
        }
    }

    /// Type-erased ports for constructing engines
    #[must_use]
    pub fn ports(&self) -> Ports {
        Ports::new(
            self.clock.clone(),
            self.scheduler.clone(),
            self.sink.clone(),
            self.storage.clone(),
        )
    }

    /// Advance time, firing due callbacks
    pub fn advance_ms(&self, ms: u64) -> usize {
        self.scheduler.advance_ms(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_ports_share_clock() {
        let test = TestPorts::new(500);
        let ports = test.ports();
        test.advance_ms(250);
        assert_eq!(ports.now_ms(), 750);
    }

    #[test]
    fn test_cancel_empties_slot() {
        let test = TestPorts::new(0);
        let ports = test.ports();
        let mut slot = Some(ports.every(Duration::from_millis(10), Box::new(|| {})));
        ports.cancel(&mut slot);
        assert!(slot.is_none());
        assert_eq!(test.scheduler.pending(), 0);
    }
}
