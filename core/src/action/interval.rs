//! Shared timing record for finite-duration actions
//!
//! Every interval action — leaf or composite — owns one [`IntervalState`].
//! It tracks elapsed time against a fixed duration and runs normalized
//! progress through the action's easing pipeline.

use super::easing::Ease;

/// Elapsed/duration tracking plus the easing pipeline.
#[derive(Debug, Clone)]
pub(crate) struct IntervalState {
    /// Total duration in seconds. Zero is legal; see [`Self::step_time`].
    pub(crate) duration: f32,
    /// Accumulated time since the first step after start.
    pub(crate) elapsed: f32,
    /// True until the first step after (re)start.
    pub(crate) first_tick: bool,
    /// Easing transforms applied left to right to normalized progress.
    pub(crate) easings: Vec<Ease>,
}

impl IntervalState {
    pub(crate) fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
            first_tick: true,
            easings: Vec::new(),
        }
    }

    /// Rewind for a (re)start. Easing pipeline and duration are preserved.
    pub(crate) fn restart(&mut self) {
        self.elapsed = 0.0;
        self.first_tick = true;
    }

    /// A pristine copy with the same duration and easing pipeline.
    pub(crate) fn fresh(&self) -> Self {
        Self {
            duration: self.duration,
            elapsed: 0.0,
            first_tick: true,
            easings: self.easings.clone(),
        }
    }

    /// Advance by `dt` and return eased normalized progress.
    ///
    /// The first call after a (re)start absorbs the delta — a freshly added
    /// action must not jump by however long the previous frame took. The
    /// epsilon in the ratio lets a zero-duration action produce exactly one
    /// meaningful update instead of dividing by zero.
    pub(crate) fn step_time(&mut self, dt: f32) -> f32 {
        if self.first_tick {
            self.first_tick = false;
            // not exactly zero: a zero-duration action must still reach
            // t = 1 and report done on this very step
            self.elapsed = f32::EPSILON;
        } else {
            self.elapsed += dt;
        }
        let raw = (self.elapsed / self.duration.max(f32::EPSILON)).clamp(0.0, 1.0);
        self.easings.iter().fold(raw, |t, ease| ease.apply(t))
    }

    pub(crate) fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}
