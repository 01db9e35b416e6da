//! Timer instances (runtime state)

use std::fmt;

use crate::heap::HeapKey;

use super::scheduler::TimerTick;

/// Unique timer identifier, monotonic for the scheduler's lifetime.
pub type TimerId = u64;

/// Deferred call fired when a timer comes due.
pub type TimerHandler = Box<dyn FnMut(&mut TimerTick<'_>)>;

/// One schedulable unit, owned by the scheduler from creation until it is
/// fired-and-once or explicitly cancelled.
pub struct Timer {
    pub(crate) id: TimerId,
    pub(crate) handler: TimerHandler,
    pub(crate) begin: f64,
    pub(crate) interval: f64,
    pub(crate) once: bool,
    pub(crate) times_fired: u32,
    pub(crate) next_due: f64,
}

impl Timer {
    pub(crate) fn new(
        id: TimerId,
        handler: TimerHandler,
        begin: f64,
        interval: f64,
        once: bool,
    ) -> Self {
        Self {
            id,
            handler,
            begin,
            interval,
            once,
            times_fired: 0,
            next_due: begin + interval,
        }
    }

    /// Recompute the due time after a firing.
    ///
    /// Due times derive from the original begin time, not from when the
    /// handler actually ran, so a slow frame does not drift the schedule.
    pub(crate) fn reschedule(&mut self) {
        self.next_due = self.begin + self.interval * (f64::from(self.times_fired) + 1.0);
    }

    /// Stable timer id.
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Timestamp at which this timer next becomes eligible to fire.
    pub fn next_due(&self) -> f64 {
        self.next_due
    }

    /// How many times the handler has run.
    pub fn times_fired(&self) -> u32 {
        self.times_fired
    }

    /// True for one-shot timers.
    pub fn is_once(&self) -> bool {
        self.once
    }
}

impl HeapKey for Timer {
    fn heap_key(&self) -> u64 {
        self.id
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("id", &self.id)
            .field("begin", &self.begin)
            .field("interval", &self.interval)
            .field("once", &self.once)
            .field("times_fired", &self.times_fired)
            .field("next_due", &self.next_due)
            .finish()
    }
}
