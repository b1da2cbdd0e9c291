//! Scheduler port
//!
//! Engines never sleep or spawn. They hand callbacks to a [`Scheduler`] and
//! keep the returned [`TaskHandle`] so the task can be cancelled later.
//! Callbacks run on the scheduler's thread, one at a time.

use std::time::Duration;

/// Boxed callback invoked by a scheduler
pub type Callback = Box<dyn FnMut()>;

/// Identifies a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Wrap a scheduler-assigned task id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The scheduler-assigned task id
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Periodic and one-shot task registration
pub trait Scheduler {
    /// Run `callback` every `interval`, first after one interval has elapsed
    fn schedule_periodic(&self, interval: Duration, callback: Callback) -> TaskHandle;

    /// Run `callback` once after `delay`
    fn schedule_once(&self, delay: Duration, callback: Callback) -> TaskHandle;

    /// Stop a task. Unknown or already finished handles are ignored.
    fn cancel(&self, handle: TaskHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_handle_id() {
        let handle = TaskHandle::new(7);
        assert_eq!(handle.id(), 7);
        assert_eq!(handle, TaskHandle::new(7));
        assert!(TaskHandle::new(1) < TaskHandle::new(2));
    }
}
