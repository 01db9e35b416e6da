//! Tick scheduler
//!
//! Fires every due timer once per [`TickScheduler::advance`] pass.
//! Re-entrancy rules:
//!
//! - Handlers may cancel any timer, including the one currently firing.
//! - Handlers may schedule new timers; those enter the heap when the pass
//!   ends, so a handler that reschedules itself with a past-due time fires
//!   at most once per pass.
//! - A repeating timer that fell behind catches up within one pass, firing
//!   once per elapsed interval until its due time passes `now`.

use std::cmp::Ordering;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::heap::{Heap, IndexedHeap};

use super::timer::{Timer, TimerHandler, TimerId};

/// Due-time ordering with stable FIFO among equal due times.
fn timer_order(a: &Timer, b: &Timer) -> Ordering {
    a.next_due
        .partial_cmp(&b.next_due)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.id.cmp(&b.id))
}

type TimerCmp = fn(&Timer, &Timer) -> Ordering;

/// Context handed to a firing timer handler.
pub struct TimerTick<'a> {
    /// The owning scheduler, for re-entrant schedule/cancel calls.
    pub scheduler: &'a mut TickScheduler,
    /// The `now` of the current advance pass.
    pub now: f64,
    /// Id of the timer being fired.
    pub id: TimerId,
}

/// Owns the heap of timers and advances everything due each tick.
pub struct TickScheduler {
    heap: IndexedHeap<Timer, TimerCmp>,
    /// Timers scheduled from inside a handler, staged until the pass ends.
    staged: Vec<Timer>,
    next_id: TimerId,
    now: f64,
    in_advance: bool,
    firing: Option<TimerId>,
    firing_cancelled: bool,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler {
    /// Create an empty scheduler at t = 0.
    pub fn new() -> Self {
        Self {
            heap: Heap::new(timer_order as TimerCmp),
            staged: Vec::new(),
            next_id: 0,
            now: 0.0,
            in_advance: false,
            firing: None,
            firing_cancelled: false,
        }
    }

    /// The time of the most recent advance pass.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.heap.len() + self.staged.len()
    }

    /// True when no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Due time of the next pending timer, if any.
    pub fn next_due(&self) -> Option<f64> {
        self.heap.peek().map(Timer::next_due)
    }

    /// Schedule a timer with full control over its parameters.
    ///
    /// The first due time is `start + interval`.
    pub fn schedule(
        &mut self,
        handler: TimerHandler,
        start: f64,
        interval: f64,
        once: bool,
    ) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        let timer = Timer::new(id, handler, start, interval, once);
        if self.in_advance {
            self.staged.push(timer);
        } else {
            self.heap.push(timer);
        }
        id
    }

    /// Fire `handler` every `interval` seconds, starting one interval from
    /// the current time.
    pub fn schedule_interval(
        &mut self,
        handler: impl FnMut(&mut TimerTick<'_>) + 'static,
        interval: f64,
    ) -> TimerId {
        let now = self.now;
        self.schedule(Box::new(handler), now, interval, false)
    }

    /// Fire `handler` once, `delay` seconds from the current time.
    pub fn schedule_once(
        &mut self,
        handler: impl FnMut(&mut TimerTick<'_>) + 'static,
        delay: f64,
    ) -> TimerId {
        let now = self.now;
        self.schedule(Box::new(handler), now, delay, true)
    }

    /// Cancel a pending timer. A no-op — never an error — when the id is
    /// unknown, already fired-and-once, or already cancelled.
    pub fn cancel(&mut self, id: TimerId) {
        if self.firing == Some(id) {
            // the timer is out of the heap while its handler runs; suppress
            // the re-push instead
            self.firing_cancelled = true;
            return;
        }
        if self.heap.remove_by_key(id).is_none() {
            let before = self.staged.len();
            self.staged.retain(|timer| timer.id != id);
            if before == self.staged.len() {
                tracing::trace!(id, "cancel of unknown timer ignored");
            }
        }
    }

    /// Fire every timer due at or before `now`, in non-decreasing due-time
    /// order, then remember `now` for relative scheduling.
    pub fn advance(&mut self, now: f64) {
        if self.in_advance {
            tracing::warn!("re-entrant advance ignored");
            return;
        }
        self.now = now;
        self.in_advance = true;

        while let Some(min) = self.heap.peek() {
            if min.next_due > now {
                break;
            }
            let mut timer = self.heap.pop().expect("peeked element exists");
            self.firing = Some(timer.id);
            self.firing_cancelled = false;

            let mut tick = TimerTick {
                scheduler: &mut *self,
                now,
                id: timer.id,
            };
            let outcome = catch_unwind(AssertUnwindSafe(|| (timer.handler)(&mut tick)));

            let cancelled = self.firing_cancelled;
            self.firing = None;
            self.firing_cancelled = false;

            if outcome.is_err() {
                // one failing handler must not starve the rest of the tick
                tracing::error!(id = timer.id, "timer handler panicked; timer dropped");
                continue;
            }
            timer.times_fired += 1;
            if timer.once || cancelled {
                continue;
            }
            timer.reschedule();
            if timer.interval > 0.0 {
                self.heap.push(timer);
            } else {
                // a non-advancing due time would fire forever in this pass
                self.staged.push(timer);
            }
        }

        for timer in self.staged.drain(..) {
            self.heap.push(timer);
        }
        self.in_advance = false;
    }
}
