//! Composable time-based actions
//!
//! This module provides:
//! - **Leaves**: move/rotate/scale/bezier transforms, delay, call-function
//! - **Composites**: sequence, spawn, repeat, repeat-forever, speed
//! - **Easing**: pure curves attached to any interval action's pipeline
//!
//! Every action supports the same capability set — `start`, `stop`, `step`,
//! `update`, `is_done`, `reverse`, `clone` — implemented as one closed sum
//! type sharing a common timing record, rather than an inheritance chain.
//!
//! # Lifecycle
//!
//! Constructed → bound to a target via `start` (captures target-relative
//! baselines) → stepped every tick → queried for completion → `stop`
//! releases the target relation. A stopped action cannot be resumed; clone
//! the definition and start again. Reversal produces a new, independent
//! tree and never mutates the original.

use std::rc::Rc;

use nalgebra_glm as glm;

mod composite;
mod easing;
mod error;
mod instant;
mod interval;
mod leaf;

#[cfg(test)]
mod composite_tests;

pub use easing::Ease;
pub use error::ActionError;
pub use instant::{ActionCallback, CallbackCtx};
pub use leaf::BezierConfig;

use composite::{Repeat, RepeatForever, Sequence, Spawn, SpeedWrap};
use instant::CallFunc;
use interval::IntervalState;
use leaf::{BezierBy, BezierTo, Channel, Delay, TransformBy, TransformTo};

use crate::manager::ActionManager;
use crate::target::{SharedTarget, WeakTarget};

/// Tag value of an action nobody has labeled.
pub const TAG_UNSET: i32 = -1;

/// A unit of time-driven mutation applied to a target.
#[derive(Debug, Clone)]
pub struct Action {
    kind: Kind,
    tag: i32,
    speed: f32,
    target: Option<WeakTarget>,
}

#[derive(Debug, Clone)]
enum Kind {
    TransformBy(TransformBy),
    TransformTo(TransformTo),
    BezierBy(BezierBy),
    BezierTo(BezierTo),
    Delay(Delay),
    CallFunc(CallFunc),
    Sequence(Sequence),
    Spawn(Spawn),
    Repeat(Repeat),
    RepeatForever(RepeatForever),
    Speed(SpeedWrap),
}

impl Kind {
    fn interval_state(&self) -> Option<&IntervalState> {
        match self {
            Self::TransformBy(a) => Some(&a.state),
            Self::TransformTo(a) => Some(&a.state),
            Self::BezierBy(a) => Some(&a.state),
            Self::BezierTo(a) => Some(&a.state),
            Self::Delay(a) => Some(&a.state),
            Self::Sequence(a) => Some(&a.state),
            Self::Spawn(a) => Some(&a.state),
            Self::Repeat(a) => Some(&a.state),
            Self::CallFunc(_) | Self::RepeatForever(_) | Self::Speed(_) => None,
        }
    }

    fn interval_state_mut(&mut self) -> Option<&mut IntervalState> {
        match self {
            Self::TransformBy(a) => Some(&mut a.state),
            Self::TransformTo(a) => Some(&mut a.state),
            Self::BezierBy(a) => Some(&mut a.state),
            Self::BezierTo(a) => Some(&mut a.state),
            Self::Delay(a) => Some(&mut a.state),
            Self::Sequence(a) => Some(&mut a.state),
            Self::Spawn(a) => Some(&mut a.state),
            Self::Repeat(a) => Some(&mut a.state),
            Self::CallFunc(_) | Self::RepeatForever(_) | Self::Speed(_) => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::TransformBy(a) => a.channel.by_name(),
            Self::TransformTo(a) => a.channel.to_name(),
            Self::BezierBy(_) => "bezier_by",
            Self::BezierTo(_) => "bezier_to",
            Self::Delay(_) => "delay",
            Self::CallFunc(_) => "call_func",
            Self::Sequence(_) => "sequence",
            Self::Spawn(_) => "spawn",
            Self::Repeat(_) => "repeat",
            Self::RepeatForever(_) => "repeat_forever",
            Self::Speed(_) => "speed",
        }
    }
}

// ─── Constructors ────────────────────────────────────────────────────────────

impl Action {
    fn from_kind(kind: Kind) -> Self {
        Self {
            kind,
            tag: TAG_UNSET,
            speed: 1.0,
            target: None,
        }
    }

    /// Displace the target's position by `delta` over `duration` seconds.
    pub fn move_by(duration: f32, delta: glm::Vec3) -> Self {
        Self::from_kind(Kind::TransformBy(TransformBy::new(
            duration,
            Channel::Position,
            delta,
        )))
    }

    /// Move the target's position to `to` over `duration` seconds.
    pub fn move_to(duration: f32, to: glm::Vec3) -> Self {
        Self::from_kind(Kind::TransformTo(TransformTo::new(
            duration,
            Channel::Position,
            to,
        )))
    }

    /// Rotate the target by `delta` (Euler degrees) over `duration` seconds.
    pub fn rotate_by(duration: f32, delta: glm::Vec3) -> Self {
        Self::from_kind(Kind::TransformBy(TransformBy::new(
            duration,
            Channel::Rotation,
            delta,
        )))
    }

    /// Rotate the target to `to` (Euler degrees) over `duration` seconds.
    pub fn rotate_to(duration: f32, to: glm::Vec3) -> Self {
        Self::from_kind(Kind::TransformTo(TransformTo::new(
            duration,
            Channel::Rotation,
            to,
        )))
    }

    /// Multiply the target's scale per axis by `factors` over `duration`.
    pub fn scale_by(duration: f32, factors: glm::Vec3) -> Self {
        Self::from_kind(Kind::TransformBy(TransformBy::new(
            duration,
            Channel::Scale,
            factors,
        )))
    }

    /// Scale the target to `to` over `duration` seconds.
    pub fn scale_to(duration: f32, to: glm::Vec3) -> Self {
        Self::from_kind(Kind::TransformTo(TransformTo::new(
            duration,
            Channel::Scale,
            to,
        )))
    }

    /// Follow a cubic Bézier displacement relative to the start position.
    pub fn bezier_by(duration: f32, config: BezierConfig) -> Self {
        Self::from_kind(Kind::BezierBy(BezierBy::new(duration, config)))
    }

    /// Follow a cubic Bézier toward absolute control points.
    pub fn bezier_to(duration: f32, to: BezierConfig) -> Self {
        Self::from_kind(Kind::BezierTo(BezierTo::new(duration, to)))
    }

    /// Do nothing for `duration` seconds.
    pub fn delay(duration: f32) -> Self {
        Self::from_kind(Kind::Delay(Delay::new(duration)))
    }

    /// Invoke `callback` once, completing instantly.
    pub fn call_func(callback: impl FnMut(&mut CallbackCtx<'_>) + 'static) -> Self {
        Self::from_kind(Kind::CallFunc(CallFunc::new(callback)))
    }

    /// Run `actions` one after another.
    ///
    /// More than two compose as a left-leaning tree of two-child sequences;
    /// the time-split math is only defined between two children at a time.
    pub fn sequence(actions: Vec<Self>) -> Self {
        assert!(!actions.is_empty(), "sequence requires at least one action");
        let mut iter = actions.into_iter();
        let mut acc = iter.next().expect("checked non-empty above");
        for action in iter {
            acc = Self::sequence_pair(acc, action);
        }
        acc
    }

    pub(crate) fn sequence_pair(first: Self, second: Self) -> Self {
        Self::from_kind(Kind::Sequence(Sequence::new(first, second)))
    }

    /// Run `actions` in parallel; overall duration is the longest child's.
    pub fn spawn(actions: Vec<Self>) -> Self {
        assert!(!actions.is_empty(), "spawn requires at least one action");
        let mut iter = actions.into_iter();
        let mut acc = iter.next().expect("checked non-empty above");
        for action in iter {
            acc = Self::from_kind(Kind::Spawn(Spawn::new(acc, action)));
        }
        acc
    }

    /// Run `action` `times` times back to back.
    pub fn repeat(action: Self, times: u32) -> Self {
        assert!(times > 0, "repeat requires at least one repetition");
        Self::from_kind(Kind::Repeat(Repeat::new(action, times)))
    }

    /// Run `action` forever, restarting it each time it finishes.
    pub fn repeat_forever(action: Self) -> Self {
        Self::from_kind(Kind::RepeatForever(RepeatForever::new(action)))
    }

    /// Scale the time delta driving `action` by `rate`.
    pub fn speed(action: Self, rate: f32) -> Self {
        Self::from_kind(Kind::Speed(SpeedWrap::new(action, rate)))
    }
}

// ─── Builders ────────────────────────────────────────────────────────────────

impl Action {
    /// Label this action for tag-based lookup and removal.
    pub fn with_tag(mut self, tag: i32) -> Self {
        self.tag = tag;
        self
    }

    /// Set the per-action speed multiplier the manager applies to dt.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Append an easing curve to this interval action's pipeline.
    ///
    /// Curves compose left to right in the order they are attached.
    pub fn easing(mut self, ease: Ease) -> Self {
        match self.kind.interval_state_mut() {
            Some(state) => state.easings.push(ease),
            None => {
                tracing::warn!(kind = self.kind.name(), "easing ignored on non-interval action");
            }
        }
        self
    }

    /// Make a "-by" transform compose additively with external writers.
    pub fn stackable(mut self, stackable: bool) -> Self {
        match &mut self.kind {
            Kind::TransformBy(a) => a.stackable = stackable,
            Kind::BezierBy(a) => a.stackable = stackable,
            _ => {
                tracing::warn!(kind = self.kind.name(), "stackable ignored on this action");
            }
        }
        self
    }
}

// ─── Capability set ──────────────────────────────────────────────────────────

impl Action {
    /// The action's tag label, [`TAG_UNSET`] by default.
    pub fn tag(&self) -> i32 {
        self.tag
    }

    /// Per-action speed multiplier.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Bind to `target` and capture target-relative baselines.
    ///
    /// Safe to call again to restart; repetition relies on that.
    pub fn start(&mut self, target: &SharedTarget) {
        self.target = Some(Rc::downgrade(target));
        match &mut self.kind {
            Kind::TransformBy(a) => a.start(target),
            Kind::TransformTo(a) => a.start(target),
            Kind::BezierBy(a) => a.start(target),
            Kind::BezierTo(a) => a.start(target),
            Kind::Delay(a) => a.state.restart(),
            Kind::CallFunc(a) => a.start(),
            Kind::Sequence(s) => s.start(target),
            Kind::Spawn(s) => s.start(target),
            Kind::Repeat(r) => r.start(target),
            Kind::RepeatForever(r) => r.start(target),
            Kind::Speed(s) => s.inner.start(target),
        }
    }

    /// Release the target relation. The only legal exit from a running
    /// action other than finishing.
    pub fn stop(&mut self) {
        match &mut self.kind {
            Kind::Sequence(s) => s.stop(),
            Kind::Spawn(s) => s.stop(),
            Kind::Repeat(r) => r.stop(),
            Kind::RepeatForever(r) => r.stop(),
            Kind::Speed(s) => s.inner.stop(),
            _ => {}
        }
        self.target = None;
    }

    /// Advance by a raw time delta.
    pub fn step(&mut self, dt: f32, mgr: &mut ActionManager) {
        if let Kind::Speed(s) = &mut self.kind {
            let dt = dt * s.rate;
            s.inner.step(dt, mgr);
            return;
        }
        if matches!(self.kind, Kind::Repeat(_) | Kind::RepeatForever(_)) {
            let target = self.target.as_ref().and_then(|weak| weak.upgrade());
            match &mut self.kind {
                Kind::Repeat(r) => r.step(dt, target.as_ref(), mgr),
                Kind::RepeatForever(r) => r.step(dt, target.as_ref(), mgr),
                _ => {}
            }
            return;
        }
        let t = match self.kind.interval_state_mut() {
            Some(state) => state.step_time(dt),
            // instants get exactly one full-progress update
            None => 1.0,
        };
        self.update(t, mgr);
    }

    /// Apply the effect at normalized progress `t`.
    pub fn update(&mut self, t: f32, mgr: &mut ActionManager) {
        let target = self.target.as_ref().and_then(|weak| weak.upgrade());
        match &mut self.kind {
            Kind::TransformBy(a) => a.update(target.as_ref(), t),
            Kind::TransformTo(a) => a.update(target.as_ref(), t),
            Kind::BezierBy(a) => a.update(target.as_ref(), t),
            Kind::BezierTo(a) => a.update(target.as_ref(), t),
            Kind::Delay(_) => {}
            Kind::CallFunc(a) => a.update(target, mgr),
            Kind::Sequence(s) => s.update(target.as_ref(), t, mgr),
            Kind::Spawn(s) => s.update(t, mgr),
            Kind::Repeat(r) => r.update(target.as_ref(), t, mgr),
            Kind::RepeatForever(r) => r.update(t, mgr),
            Kind::Speed(s) => s.inner.update(t, mgr),
        }
    }

    /// True once the action has run to completion.
    pub fn is_done(&self) -> bool {
        match &self.kind {
            Kind::CallFunc(a) => a.done,
            Kind::Repeat(r) => r.is_done(),
            Kind::RepeatForever(_) => false,
            Kind::Speed(s) => s.inner.is_done(),
            _ => self
                .kind
                .interval_state()
                .map(IntervalState::is_done)
                .unwrap_or(true),
        }
    }

    /// Total duration in seconds; infinite for repeat-forever.
    pub fn duration(&self) -> f32 {
        match &self.kind {
            Kind::CallFunc(_) => 0.0,
            Kind::RepeatForever(_) => f32::INFINITY,
            Kind::Speed(s) => s.inner.duration(),
            _ => self
                .kind
                .interval_state()
                .map(|state| state.duration)
                .unwrap_or(0.0),
        }
    }

    /// Time accumulated since the first step after start.
    pub fn elapsed(&self) -> f32 {
        match &self.kind {
            Kind::CallFunc(_) => 0.0,
            Kind::RepeatForever(r) => r.inner.elapsed(),
            Kind::Speed(s) => s.inner.elapsed(),
            _ => self
                .kind
                .interval_state()
                .map(|state| state.elapsed)
                .unwrap_or(0.0),
        }
    }

    /// A new, independent action mirroring the timing with inverted effect.
    ///
    /// "-to" variants fail with [`ActionError::NotReversible`]; composites
    /// fail if any child does.
    pub fn reverse(&self) -> Result<Self, ActionError> {
        let kind = match &self.kind {
            Kind::TransformBy(a) => Kind::TransformBy(a.reversed()),
            Kind::TransformTo(a) => {
                return Err(ActionError::NotReversible {
                    kind: a.channel.to_name(),
                });
            }
            Kind::BezierBy(a) => Kind::BezierBy(a.reversed()),
            Kind::BezierTo(_) => {
                return Err(ActionError::NotReversible { kind: "bezier_to" });
            }
            Kind::Delay(a) => Kind::Delay(Delay {
                state: a.state.fresh(),
            }),
            Kind::CallFunc(a) => Kind::CallFunc(a.clone_fresh()),
            Kind::Sequence(s) => Kind::Sequence(s.reversed()?),
            Kind::Spawn(s) => Kind::Spawn(s.reversed()?),
            Kind::Repeat(r) => Kind::Repeat(r.reversed()?),
            Kind::RepeatForever(r) => Kind::RepeatForever(r.reversed()?),
            Kind::Speed(s) => Kind::Speed(s.reversed()?),
        };
        Ok(Self {
            kind,
            tag: self.tag,
            speed: self.speed,
            target: None,
        })
    }

    /// Constructor name, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}
