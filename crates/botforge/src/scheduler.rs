//! Deterministic single-threaded timer queue driven by the host clock.
//!
//! The host calls [`Scheduler::advance`] once per frame. Timers fire in due
//! order, ties broken by creation order. Each timer is owned by a
//! [`TimerHandle`]; dropping the handle cancels it, even from inside a
//! running callback.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Shortest interval a periodic timer can re-arm with.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Timer callback. Returns the delay until the next run, or `None` to stop.
type Callback = Box<dyn FnMut() -> Option<Duration>>;

struct Entry {
    due: Duration,
    label: &'static str,
    /// `None` while the callback is running.
    callback: Option<Callback>,
}

#[derive(Default)]
struct Inner {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<u64, Entry>,
}

/// Shared handle to a timer queue. Clones refer to the same queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Rc<RefCell<Inner>>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("now", &inner.now)
            .field("pending", &inner.timers.len())
            .finish()
    }
}

impl Scheduler {
    /// Empty queue at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scheduler time.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of live timers.
    pub fn pending(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Run `callback` after `delay`, and again after each delay it returns.
    pub fn schedule(
        &self,
        label: &'static str,
        delay: Duration,
        callback: impl FnMut() -> Option<Duration> + 'static,
    ) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let due = inner.now + delay;
        inner.timers.insert(
            id,
            Entry {
                due,
                label,
                callback: Some(Box::new(callback)),
            },
        );
        tracing::debug!(id, label, ?due, "timer scheduled");
        TimerHandle {
            id,
            label,
            queue: Rc::downgrade(&self.inner),
        }
    }

    /// Move the clock forward by `dt`, firing every timer that comes due.
    ///
    /// Returns the number of callbacks run.
    pub fn advance(&self, dt: Duration) -> usize {
        let target = self.now() + dt;
        let mut fired = 0;

        while let Some((id, label, due, mut callback)) = self.take_next(target) {
            tracing::trace!(id, label, ?due, "timer fired");
            let next = callback();
            fired += 1;

            let mut inner = self.inner.borrow_mut();
            let rearmed = match (inner.timers.get_mut(&id), next) {
                (Some(entry), Some(delay)) => {
                    entry.due = due + delay.max(MIN_PERIOD);
                    entry.callback = Some(callback);
                    None
                }
                (Some(_), None) => {
                    inner.timers.remove(&id);
                    Some(callback)
                }
                // handle dropped while the callback ran
                (None, _) => Some(callback),
            };
            drop(inner);
            drop(rearmed);
        }

        self.inner.borrow_mut().now = target;
        fired
    }

    fn take_next(&self, target: Duration) -> Option<(u64, &'static str, Duration, Callback)> {
        let mut inner = self.inner.borrow_mut();
        let (id, due) = inner
            .timers
            .iter()
            .filter(|(_, e)| e.callback.is_some() && e.due <= target)
            .map(|(&id, e)| (id, e.due))
            .min_by_key(|&(id, due)| (due, id))?;
        let entry = inner.timers.get_mut(&id)?;
        let label = entry.label;
        let callback = entry.callback.take()?;
        inner.now = inner.now.max(due);
        Some((id, label, due, callback))
    }
}

/// Owner of one scheduled timer. Dropping it cancels the timer.
pub struct TimerHandle {
    id: u64,
    label: &'static str,
    queue: Weak<RefCell<Inner>>,
}

impl TimerHandle {
    /// Whether the timer is still queued.
    pub fn is_active(&self) -> bool {
        self.queue
            .upgrade()
            .is_some_and(|q| q.borrow().timers.contains_key(&self.id))
    }

    /// Cancel the timer now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        let Some(queue) = self.queue.upgrade() else {
            return;
        };
        let removed = queue.borrow_mut().timers.remove(&self.id);
        if removed.is_some() {
            tracing::debug!(id = self.id, label = self.label, "timer cancelled");
        }
        // the entry's callback is dropped here, outside the borrow
        drop(removed);
    }
}
