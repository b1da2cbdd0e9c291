//! Deterministic scheduling for tests and replays
//!
//! [`ManualScheduler`] owns a [`FakeClock`] and fires due callbacks only when
//! time is advanced explicitly. Tasks due at the same instant fire in
//! registration order, and the clock reads the task's due time while its
//! callback runs.

use crate::clock::{Clock, FakeClock};
use crate::scheduler::{Callback, Scheduler, TaskHandle};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

struct Task {
    due_ms: u64,
    interval_ms: Option<u64>,
    // `None` while the callback is executing
    callback: Option<Callback>,
}

/// Scheduler driven by explicit calls to [`ManualScheduler::advance`]
pub struct ManualScheduler {
    clock: Rc<FakeClock>,
    next_id: Cell<u64>,
    tasks: RefCell<BTreeMap<u64, Task>>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now_ms", &self.clock.now_ms())
            .field("pending", &self.pending())
            .finish()
    }
}

impl ManualScheduler {
    /// Create a scheduler over a shared fake clock
    #[must_use]
    pub fn new(clock: Rc<FakeClock>) -> Self {
        Self {
            clock,
            next_id: Cell::new(1),
            tasks: RefCell::new(BTreeMap::new()),
        }
    }

    /// The clock this scheduler advances
    #[must_use]
    pub fn clock(&self) -> &Rc<FakeClock> {
        &self.clock
    }

    /// Number of live tasks
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Whether `handle` is still scheduled
    #[must_use]
    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.tasks.borrow().contains_key(&handle.id())
    }

    /// Advance time, firing every callback that falls due. Returns the
    /// number of callbacks fired.
    pub fn advance(&self, by: Duration) -> usize {
        self.advance_ms(by.as_millis() as u64)
    }

    /// Advance time by milliseconds. See [`ManualScheduler::advance`].
    pub fn advance_ms(&self, ms: u64) -> usize {
        let target = self.clock.now_ms().saturating_add(ms);
        let mut fired = 0;

        while let Some((id, due_ms)) = self.next_due(target) {
            if due_ms > self.clock.now_ms() {
                self.clock.set_ms(due_ms);
            }

            let callback = {
                let mut tasks = self.tasks.borrow_mut();
                let Some(task) = tasks.get_mut(&id) else {
                    continue;
                };
                let callback = task.callback.take();
                match task.interval_ms {
                    Some(interval) => task.due_ms = due_ms.saturating_add(interval),
                    None => {
                        tasks.remove(&id);
                    }
                }
                callback
            };

            if let Some(mut callback) = callback {
                callback();
                fired += 1;
                // Periodic task survived its own callback: hand the closure back
                if let Some(task) = self.tasks.borrow_mut().get_mut(&id) {
                    task.callback = Some(callback);
                }
            }
        }

        if target > self.clock.now_ms() {
            self.clock.set_ms(target);
        }
        fired
    }

    fn next_due(&self, target: u64) -> Option<(u64, u64)> {
        self.tasks
            .borrow()
            .iter()
            .filter(|(_, task)| task.callback.is_some() && task.due_ms <= target)
            .min_by_key(|(id, task)| (task.due_ms, **id))
            .map(|(id, task)| (*id, task.due_ms))
    }

    fn insert(&self, due_ms: u64, interval_ms: Option<u64>, callback: Callback) -> TaskHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.tasks.borrow_mut().insert(
            id,
            Task {
                due_ms,
                interval_ms,
                callback: Some(callback),
            },
        );
        TaskHandle::new(id)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_periodic(&self, interval: Duration, callback: Callback) -> TaskHandle {
        let interval_ms = (interval.as_millis() as u64).max(1);
        let due = self.clock.now_ms().saturating_add(interval_ms);
        self.insert(due, Some(interval_ms), callback)
    }

    fn schedule_once(&self, delay: Duration, callback: Callback) -> TaskHandle {
        let due = self.clock.now_ms().saturating_add(delay.as_millis() as u64);
        self.insert(due, None, callback)
    }

    fn cancel(&self, handle: TaskHandle) {
        self.tasks.borrow_mut().remove(&handle.id());
    }
}
