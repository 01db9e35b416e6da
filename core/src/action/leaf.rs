//! Leaf transform actions
//!
//! "-by" variants are handed their delta directly and reverse by negation;
//! "-to" variants derive the delta from the start value captured at bind
//! time, which is why they have no defined reverse. The optional stackable
//! mode tracks the previously applied value so a concurrent writer to the
//! same channel composes additively instead of being overwritten.

use nalgebra_glm as glm;

use super::interval::IntervalState;
use crate::target::{SharedTarget, Target};

/// Which transform channel a leaf drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Channel {
    Position,
    Rotation,
    Scale,
}

impl Channel {
    fn get(self, node: &dyn Target) -> glm::Vec3 {
        match self {
            Self::Position => node.position(),
            Self::Rotation => node.rotation(),
            Self::Scale => node.scale(),
        }
    }

    fn set(self, node: &mut dyn Target, value: glm::Vec3) {
        match self {
            Self::Position => node.set_position(value),
            Self::Rotation => node.set_rotation(value),
            Self::Scale => node.set_scale(value),
        }
    }

    pub(crate) fn by_name(self) -> &'static str {
        match self {
            Self::Position => "move_by",
            Self::Rotation => "rotate_by",
            Self::Scale => "scale_by",
        }
    }

    pub(crate) fn to_name(self) -> &'static str {
        match self {
            Self::Position => "move_to",
            Self::Rotation => "rotate_to",
            Self::Scale => "scale_to",
        }
    }
}

/// Relative transform over a duration.
///
/// For position and rotation `amount` is an additive delta; for scale it is
/// a per-axis factor, so the reverse is the per-axis reciprocal.
#[derive(Debug, Clone)]
pub(crate) struct TransformBy {
    pub(crate) state: IntervalState,
    pub(crate) channel: Channel,
    amount: glm::Vec3,
    delta: glm::Vec3,
    start: glm::Vec3,
    previous: glm::Vec3,
    pub(crate) stackable: bool,
}

impl TransformBy {
    pub(crate) fn new(duration: f32, channel: Channel, amount: glm::Vec3) -> Self {
        Self {
            state: IntervalState::new(duration),
            channel,
            amount,
            delta: glm::vec3(0.0, 0.0, 0.0),
            start: glm::vec3(0.0, 0.0, 0.0),
            previous: glm::vec3(0.0, 0.0, 0.0),
            stackable: false,
        }
    }

    pub(crate) fn start(&mut self, target: &SharedTarget) {
        self.state.restart();
        let start = self.channel.get(&*target.borrow());
        self.start = start;
        // re-seed drift tracking on every (re)start
        self.previous = start;
        self.delta = match self.channel {
            Channel::Scale => start.component_mul(&self.amount) - start,
            _ => self.amount,
        };
    }

    pub(crate) fn update(&mut self, target: Option<&SharedTarget>, t: f32) {
        let Some(target) = target else { return };
        let mut node = target.borrow_mut();
        if self.stackable {
            let current = self.channel.get(&*node);
            let drift = current - self.previous;
            self.start += drift;
        }
        let value = self.start + self.delta * t;
        self.channel.set(&mut *node, value);
        self.previous = value;
    }

    pub(crate) fn reversed(&self) -> Self {
        let amount = match self.channel {
            Channel::Scale => glm::vec3(
                1.0 / self.amount.x,
                1.0 / self.amount.y,
                1.0 / self.amount.z,
            ),
            _ => -self.amount,
        };
        let mut reversed = Self::new(self.state.duration, self.channel, amount);
        reversed.state = self.state.fresh();
        reversed.stackable = self.stackable;
        reversed
    }
}

/// Absolute transform over a duration. Not reversible.
#[derive(Debug, Clone)]
pub(crate) struct TransformTo {
    pub(crate) state: IntervalState,
    pub(crate) channel: Channel,
    end: glm::Vec3,
    delta: glm::Vec3,
    start: glm::Vec3,
}

impl TransformTo {
    pub(crate) fn new(duration: f32, channel: Channel, end: glm::Vec3) -> Self {
        Self {
            state: IntervalState::new(duration),
            channel,
            end,
            delta: glm::vec3(0.0, 0.0, 0.0),
            start: glm::vec3(0.0, 0.0, 0.0),
        }
    }

    pub(crate) fn start(&mut self, target: &SharedTarget) {
        self.state.restart();
        self.start = self.channel.get(&*target.borrow());
        self.delta = self.end - self.start;
    }

    pub(crate) fn update(&mut self, target: Option<&SharedTarget>, t: f32) {
        let Some(target) = target else { return };
        let mut node = target.borrow_mut();
        let value = self.start + self.delta * t;
        self.channel.set(&mut *node, value);
    }
}

/// Control frame for a cubic Bézier segment, expressed relative to the
/// position captured at start (P0 is implicitly that origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierConfig {
    /// First control point.
    pub control_1: glm::Vec3,
    /// Second control point.
    pub control_2: glm::Vec3,
    /// Segment endpoint.
    pub end: glm::Vec3,
}

/// `B(t)` with P0 at the origin of the delta frame.
fn bezier_at(config: &BezierConfig, t: f32) -> glm::Vec3 {
    let u = 1.0 - t;
    config.control_1 * (3.0 * t * u * u)
        + config.control_2 * (3.0 * t * t * u)
        + config.end * (t * t * t)
}

/// Cubic Bézier displacement relative to the start position.
#[derive(Debug, Clone)]
pub(crate) struct BezierBy {
    pub(crate) state: IntervalState,
    config: BezierConfig,
    start: glm::Vec3,
    previous: glm::Vec3,
    pub(crate) stackable: bool,
}

impl BezierBy {
    pub(crate) fn new(duration: f32, config: BezierConfig) -> Self {
        Self {
            state: IntervalState::new(duration),
            config,
            start: glm::vec3(0.0, 0.0, 0.0),
            previous: glm::vec3(0.0, 0.0, 0.0),
            stackable: false,
        }
    }

    pub(crate) fn start(&mut self, target: &SharedTarget) {
        self.state.restart();
        let start = target.borrow().position();
        self.start = start;
        self.previous = start;
    }

    pub(crate) fn update(&mut self, target: Option<&SharedTarget>, t: f32) {
        let Some(target) = target else { return };
        let mut node = target.borrow_mut();
        if self.stackable {
            let current = node.position();
            let drift = current - self.previous;
            self.start += drift;
        }
        let value = self.start + bezier_at(&self.config, t);
        node.set_position(value);
        self.previous = value;
    }

    pub(crate) fn reversed(&self) -> Self {
        let config = BezierConfig {
            control_1: self.config.control_2 - self.config.end,
            control_2: self.config.control_1 - self.config.end,
            end: -self.config.end,
        };
        let mut reversed = Self::new(self.state.duration, config);
        reversed.state = self.state.fresh();
        reversed.stackable = self.stackable;
        reversed
    }
}

/// Cubic Bézier toward absolute control points. Not reversible.
#[derive(Debug, Clone)]
pub(crate) struct BezierTo {
    pub(crate) state: IntervalState,
    to: BezierConfig,
    config: BezierConfig,
    start: glm::Vec3,
}

impl BezierTo {
    pub(crate) fn new(duration: f32, to: BezierConfig) -> Self {
        Self {
            state: IntervalState::new(duration),
            to,
            config: BezierConfig {
                control_1: glm::vec3(0.0, 0.0, 0.0),
                control_2: glm::vec3(0.0, 0.0, 0.0),
                end: glm::vec3(0.0, 0.0, 0.0),
            },
            start: glm::vec3(0.0, 0.0, 0.0),
        }
    }

    pub(crate) fn start(&mut self, target: &SharedTarget) {
        self.state.restart();
        self.start = target.borrow().position();
        self.config = BezierConfig {
            control_1: self.to.control_1 - self.start,
            control_2: self.to.control_2 - self.start,
            end: self.to.end - self.start,
        };
    }

    pub(crate) fn update(&mut self, target: Option<&SharedTarget>, t: f32) {
        let Some(target) = target else { return };
        let mut node = target.borrow_mut();
        let value = self.start + bezier_at(&self.config, t);
        node.set_position(value);
    }
}

/// Does nothing for a fixed duration. Reverses to itself.
#[derive(Debug, Clone)]
pub(crate) struct Delay {
    pub(crate) state: IntervalState,
}

impl Delay {
    pub(crate) fn new(duration: f32) -> Self {
        Self {
            state: IntervalState::new(duration),
        }
    }
}
