//! Scheduler on a single-threaded tokio runtime
//!
//! Engine callbacks are `!Send`, so every task is spawned with
//! [`tokio::task::spawn_local`] and must run inside a [`LocalSet`].

use crate::error::CliResult;
use deskkit::{Callback, Scheduler, TaskHandle};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::{AbortHandle, LocalSet};
use tokio::time::{Instant, MissedTickBehavior};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// [`Scheduler`] backed by tokio timers
#[derive(Debug, Default)]
pub struct TokioScheduler {
    next_id: Cell<u64>,
    tasks: Rc<RefCell<HashMap<u64, AbortHandle>>>,
}

impl TokioScheduler {
    /// Create a scheduler. Tasks may only be scheduled from inside a
    /// [`LocalSet`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live tasks
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_periodic(&self, interval: Duration, mut callback: Callback) -> TaskHandle {
        let id = self.next_id();
        let period = interval.max(MIN_INTERVAL);
        let task = tokio::task::spawn_local(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                callback();
            }
        });
        self.tasks.borrow_mut().insert(id, task.abort_handle());
        TaskHandle::new(id)
    }

    fn schedule_once(&self, delay: Duration, mut callback: Callback) -> TaskHandle {
        let id = self.next_id();
        let tasks = Rc::clone(&self.tasks);
        let task = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            tasks.borrow_mut().remove(&id);
            callback();
        });
        self.tasks.borrow_mut().insert(id, task.abort_handle());
        TaskHandle::new(id)
    }

    fn cancel(&self, handle: TaskHandle) {
        let removed = self.tasks.borrow_mut().remove(&handle.id());
        if let Some(task) = removed {
            task.abort();
        }
    }
}

/// Run `future` to completion on a current-thread runtime inside a
/// [`LocalSet`]
pub fn block_on_local<F: Future>(future: F) -> CliResult<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    Ok(LocalSet::new().block_on(&runtime, future))
}
