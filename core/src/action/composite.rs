//! Composite actions
//!
//! Sequencing, parallel composition, repetition and speed scaling. All of
//! these own their children exclusively; reusing an action definition in
//! two trees requires cloning it.
//!
//! Time subdivision is only defined between two children at a time, so the
//! n-ary constructors fold into left-leaning trees of two-child nodes.

use crate::manager::ActionManager;
use crate::target::SharedTarget;

use super::error::ActionError;
use super::interval::IntervalState;
use super::Action;

/// Runs `first`, then `second`, splitting its duration proportionally.
#[derive(Debug, Clone)]
pub(crate) struct Sequence {
    pub(crate) state: IntervalState,
    first: Box<Action>,
    second: Box<Action>,
    split: f32,
    /// Index of the child last updated: -1 before either has run.
    last: i32,
}

impl Sequence {
    pub(crate) fn new(first: Action, second: Action) -> Self {
        let duration = first.duration() + second.duration();
        Self {
            state: IntervalState::new(duration),
            first: Box::new(first),
            second: Box::new(second),
            split: 0.0,
            last: -1,
        }
    }

    pub(crate) fn start(&mut self, _target: &SharedTarget) {
        self.state.restart();
        self.split = self.first.duration() / self.state.duration.max(f32::EPSILON);
        self.last = -1;
        // children start lazily as the split boundary is crossed
    }

    pub(crate) fn update(&mut self, target: Option<&SharedTarget>, t: f32, mgr: &mut ActionManager) {
        let (found, new_t) = if t < self.split {
            (0, if self.split != 0.0 { t / self.split } else { 1.0 })
        } else {
            (
                1,
                if self.split == 1.0 {
                    1.0
                } else {
                    (t - self.split) / (1.0 - self.split)
                },
            )
        };

        if found == 1 {
            if self.last == -1 {
                // time jumped straight past the first child without ever
                // sampling it; replay its full effect so nothing is skipped
                if let Some(target) = target {
                    self.first.start(target);
                }
                self.first.update(1.0, mgr);
                self.first.stop();
            } else if self.last == 0 {
                // crossing the boundary finishes the first child exactly once
                self.first.update(1.0, mgr);
                self.first.stop();
            }
        } else if found == 0 && self.last == 1 {
            // time ran backwards over the boundary (easing overshoot)
            self.second.update(0.0, mgr);
            self.second.stop();
        }

        let child = if found == 0 {
            &mut self.first
        } else {
            &mut self.second
        };
        if found == self.last && child.is_done() {
            // already finished; a redundant update would replay side effects
            return;
        }
        if found != self.last {
            if let Some(target) = target {
                child.start(target);
            }
        }
        child.update(new_t, mgr);
        self.last = found;
    }

    pub(crate) fn stop(&mut self) {
        match self.last {
            0 => self.first.stop(),
            1 => self.second.stop(),
            _ => {}
        }
    }

    pub(crate) fn reversed(&self) -> Result<Self, ActionError> {
        let mut reversed = Self::new(self.second.reverse()?, self.first.reverse()?);
        reversed.state.easings = self.state.easings.clone();
        Ok(reversed)
    }
}

/// Runs both children over the same normalized time range.
///
/// The constructor pads the shorter child with a trailing delay, so both
/// observe the outer duration and reversal keeps the max-duration relation.
#[derive(Debug, Clone)]
pub(crate) struct Spawn {
    pub(crate) state: IntervalState,
    first: Box<Action>,
    second: Box<Action>,
}

impl Spawn {
    pub(crate) fn new(a: Action, b: Action) -> Self {
        let (da, db) = (a.duration(), b.duration());
        let duration = da.max(db);
        let (first, second) = if da > db {
            (a, Action::sequence_pair(b, Action::delay(da - db)))
        } else if db > da {
            (Action::sequence_pair(a, Action::delay(db - da)), b)
        } else {
            (a, b)
        };
        Self {
            state: IntervalState::new(duration),
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    pub(crate) fn start(&mut self, target: &SharedTarget) {
        self.state.restart();
        self.first.start(target);
        self.second.start(target);
    }

    pub(crate) fn update(&mut self, t: f32, mgr: &mut ActionManager) {
        self.first.update(t, mgr);
        self.second.update(t, mgr);
    }

    pub(crate) fn stop(&mut self) {
        self.first.stop();
        self.second.stop();
    }

    pub(crate) fn reversed(&self) -> Result<Self, ActionError> {
        let mut reversed = Self::new(self.first.reverse()?, self.second.reverse()?);
        reversed.state.easings = self.state.easings.clone();
        Ok(reversed)
    }
}

/// Runs the inner action a fixed number of times.
///
/// Outer duration is `inner.duration * times`. Cycle boundaries replay
/// `update(1.0)` / `stop` / `start` on the inner action, so side effects at
/// the boundary are never dropped and leftover time carries into the next
/// cycle with no positional discontinuity.
#[derive(Debug, Clone)]
pub(crate) struct Repeat {
    pub(crate) state: IntervalState,
    inner: Box<Action>,
    pub(crate) times: u32,
    pub(crate) total: u32,
}

impl Repeat {
    pub(crate) fn new(inner: Action, times: u32) -> Self {
        let duration = inner.duration() * times as f32;
        Self {
            state: IntervalState::new(duration),
            inner: Box::new(inner),
            times,
            total: 0,
        }
    }

    pub(crate) fn start(&mut self, target: &SharedTarget) {
        self.state.restart();
        self.total = 0;
        self.inner.start(target);
    }

    /// Manager-driven path: accumulate outer time, then let the inner action
    /// consume the raw delta, restarting it with the carried-over remainder
    /// whenever it finishes mid-tick.
    pub(crate) fn step(
        &mut self,
        dt: f32,
        target: Option<&SharedTarget>,
        mgr: &mut ActionManager,
    ) {
        let _ = self.state.step_time(dt);
        self.inner.step(dt, mgr);
        while self.inner.is_done() {
            self.total += 1;
            if self.total >= self.times {
                break;
            }
            let Some(target) = target else { break };
            let remainder = (self.inner.elapsed() - self.inner.duration()).max(0.0);
            self.inner.start(target);
            // first step absorbs, second carries the remainder
            self.inner.step(0.0, mgr);
            self.inner.step(remainder, mgr);
        }
    }

    /// Composite-driven path: map outer normalized progress onto a cycle
    /// index plus inner progress, replaying any boundaries crossed.
    pub(crate) fn update(&mut self, target: Option<&SharedTarget>, t: f32, mgr: &mut ActionManager) {
        let scaled = t * self.times as f32;
        while self.total < self.times && (self.total + 1) as f32 <= scaled {
            self.inner.update(1.0, mgr);
            self.total += 1;
            self.inner.stop();
            if self.total < self.times {
                if let Some(target) = target {
                    self.inner.start(target);
                }
            }
        }
        if self.total < self.times {
            self.inner.update(scaled - self.total as f32, mgr);
        }
    }

    pub(crate) fn stop(&mut self) {
        self.inner.stop();
    }

    pub(crate) fn is_done(&self) -> bool {
        self.total >= self.times
    }

    pub(crate) fn reversed(&self) -> Result<Self, ActionError> {
        let mut reversed = Self::new(self.inner.reverse()?, self.times);
        reversed.state.easings = self.state.easings.clone();
        Ok(reversed)
    }
}

/// Restarts the inner action every time it finishes. Never reports done.
#[derive(Debug, Clone)]
pub(crate) struct RepeatForever {
    pub(crate) inner: Box<Action>,
}

impl RepeatForever {
    pub(crate) fn new(inner: Action) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    pub(crate) fn start(&mut self, target: &SharedTarget) {
        self.inner.start(target);
    }

    pub(crate) fn step(
        &mut self,
        dt: f32,
        target: Option<&SharedTarget>,
        mgr: &mut ActionManager,
    ) {
        self.inner.step(dt, mgr);
        while self.inner.is_done() {
            let Some(target) = target else { break };
            if self.inner.duration() <= f32::EPSILON {
                // a zero-duration inner would loop without bound; cap it at
                // one restart per tick
                tracing::warn!("repeat_forever over a zero-duration action");
                self.inner.start(target);
                break;
            }
            let remainder = (self.inner.elapsed() - self.inner.duration()).max(0.0);
            self.inner.start(target);
            self.inner.step(0.0, mgr);
            self.inner.step(remainder, mgr);
        }
    }

    pub(crate) fn update(&mut self, t: f32, mgr: &mut ActionManager) {
        self.inner.update(t, mgr);
    }

    pub(crate) fn stop(&mut self) {
        self.inner.stop();
    }

    pub(crate) fn reversed(&self) -> Result<Self, ActionError> {
        Ok(Self::new(self.inner.reverse()?))
    }
}

/// Scales the delta handed to the inner action's `step`.
///
/// Duration bookkeeping is untouched; only the driving dt changes, which is
/// why the scaling lives in the manager-facing `step` override and not in
/// `update`.
#[derive(Debug, Clone)]
pub(crate) struct SpeedWrap {
    pub(crate) inner: Box<Action>,
    pub(crate) rate: f32,
}

impl SpeedWrap {
    pub(crate) fn new(inner: Action, rate: f32) -> Self {
        Self {
            inner: Box::new(inner),
            rate,
        }
    }

    pub(crate) fn reversed(&self) -> Result<Self, ActionError> {
        Ok(Self::new(self.inner.reverse()?, self.rate))
    }
}
