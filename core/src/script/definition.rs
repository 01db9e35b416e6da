//! Play definition types
//!
//! Definitions are templates loaded from TOML config files that describe
//! an action tree to run against a named node. Building a definition
//! always yields a fresh, unstarted action, so one definition can drive
//! any number of runs.

use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::{Action, BezierConfig, Ease, TAG_UNSET};

/// Reasons a spec cannot be turned into an action.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("duration must be non-negative, got {0}")]
    NegativeDuration(f32),

    #[error("repeat requires at least one repetition")]
    ZeroRepeat,

    #[error("{0} requires at least one child action")]
    EmptyComposite(&'static str),

    #[error("speed rate must be positive, got {0}")]
    NonPositiveRate(f32),
}

fn vec3(v: [f32; 3]) -> glm::Vec3 {
    glm::vec3(v[0], v[1], v[2])
}

fn check_duration(duration: f32) -> Result<f32, BuildError> {
    if duration < 0.0 {
        Err(BuildError::NegativeDuration(duration))
    } else {
        Ok(duration)
    }
}

fn with_easing(action: Action, easing: &[Ease]) -> Action {
    easing.iter().fold(action, |action, &ease| action.easing(ease))
}

/// One node of a declarative action tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ActionSpec {
    /// Relative position change.
    MoveBy {
        duration: f32,
        delta: [f32; 3],
        #[serde(default)]
        stackable: bool,
        #[serde(default)]
        easing: Vec<Ease>,
    },

    /// Absolute position target.
    MoveTo {
        duration: f32,
        to: [f32; 3],
        #[serde(default)]
        easing: Vec<Ease>,
    },

    /// Relative rotation change (Euler degrees).
    RotateBy {
        duration: f32,
        delta: [f32; 3],
        #[serde(default)]
        easing: Vec<Ease>,
    },

    /// Absolute rotation target (Euler degrees).
    RotateTo {
        duration: f32,
        to: [f32; 3],
        #[serde(default)]
        easing: Vec<Ease>,
    },

    /// Per-axis scale factors.
    ScaleBy {
        duration: f32,
        factors: [f32; 3],
        #[serde(default)]
        easing: Vec<Ease>,
    },

    /// Absolute scale target.
    ScaleTo {
        duration: f32,
        to: [f32; 3],
        #[serde(default)]
        easing: Vec<Ease>,
    },

    /// Cubic Bézier displacement relative to the start position.
    BezierBy {
        duration: f32,
        control_1: [f32; 3],
        control_2: [f32; 3],
        end: [f32; 3],
        #[serde(default)]
        stackable: bool,
        #[serde(default)]
        easing: Vec<Ease>,
    },

    /// Cubic Bézier toward absolute control points.
    BezierTo {
        duration: f32,
        control_1: [f32; 3],
        control_2: [f32; 3],
        end: [f32; 3],
        #[serde(default)]
        easing: Vec<Ease>,
    },

    /// Do nothing for a fixed time.
    Delay { duration: f32 },

    /// Children one after another.
    Sequence { actions: Vec<ActionSpec> },

    /// Children in parallel.
    Spawn { actions: Vec<ActionSpec> },

    /// Child repeated a fixed number of times.
    Repeat { times: u32, action: Box<ActionSpec> },

    /// Child repeated until removed.
    RepeatForever { action: Box<ActionSpec> },

    /// Child driven at a scaled rate.
    Speed { rate: f32, action: Box<ActionSpec> },
}

impl ActionSpec {
    /// Build a fresh, unstarted action from this spec.
    pub fn build(&self) -> Result<Action, BuildError> {
        match self {
            Self::MoveBy {
                duration,
                delta,
                stackable,
                easing,
            } => Ok(with_easing(
                Action::move_by(check_duration(*duration)?, vec3(*delta)).stackable(*stackable),
                easing,
            )),
            Self::MoveTo {
                duration,
                to,
                easing,
            } => Ok(with_easing(
                Action::move_to(check_duration(*duration)?, vec3(*to)),
                easing,
            )),
            Self::RotateBy {
                duration,
                delta,
                easing,
            } => Ok(with_easing(
                Action::rotate_by(check_duration(*duration)?, vec3(*delta)),
                easing,
            )),
            Self::RotateTo {
                duration,
                to,
                easing,
            } => Ok(with_easing(
                Action::rotate_to(check_duration(*duration)?, vec3(*to)),
                easing,
            )),
            Self::ScaleBy {
                duration,
                factors,
                easing,
            } => Ok(with_easing(
                Action::scale_by(check_duration(*duration)?, vec3(*factors)),
                easing,
            )),
            Self::ScaleTo {
                duration,
                to,
                easing,
            } => Ok(with_easing(
                Action::scale_to(check_duration(*duration)?, vec3(*to)),
                easing,
            )),
            Self::BezierBy {
                duration,
                control_1,
                control_2,
                end,
                stackable,
                easing,
            } => {
                let config = BezierConfig {
                    control_1: vec3(*control_1),
                    control_2: vec3(*control_2),
                    end: vec3(*end),
                };
                Ok(with_easing(
                    Action::bezier_by(check_duration(*duration)?, config).stackable(*stackable),
                    easing,
                ))
            }
            Self::BezierTo {
                duration,
                control_1,
                control_2,
                end,
                easing,
            } => {
                let config = BezierConfig {
                    control_1: vec3(*control_1),
                    control_2: vec3(*control_2),
                    end: vec3(*end),
                };
                Ok(with_easing(
                    Action::bezier_to(check_duration(*duration)?, config),
                    easing,
                ))
            }
            Self::Delay { duration } => Ok(Action::delay(check_duration(*duration)?)),
            Self::Sequence { actions } => {
                if actions.is_empty() {
                    return Err(BuildError::EmptyComposite("sequence"));
                }
                let children = actions
                    .iter()
                    .map(Self::build)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Action::sequence(children))
            }
            Self::Spawn { actions } => {
                if actions.is_empty() {
                    return Err(BuildError::EmptyComposite("spawn"));
                }
                let children = actions
                    .iter()
                    .map(Self::build)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Action::spawn(children))
            }
            Self::Repeat { times, action } => {
                if *times == 0 {
                    return Err(BuildError::ZeroRepeat);
                }
                Ok(Action::repeat(action.build()?, *times))
            }
            Self::RepeatForever { action } => Ok(Action::repeat_forever(action.build()?)),
            Self::Speed { rate, action } => {
                if *rate <= 0.0 {
                    return Err(BuildError::NonPositiveRate(*rate));
                }
                Ok(Action::speed(action.build()?, *rate))
            }
        }
    }
}

/// Definition of a play (loaded from config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayDefinition {
    /// Unique identifier for this play.
    pub id: String,

    /// Name of the node the play runs against.
    pub target: String,

    /// Whether this play is currently enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Per-action speed multiplier applied by the manager.
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Tag for lookup and removal; unset by default.
    #[serde(default = "default_tag")]
    pub tag: i32,

    /// The action tree to run.
    pub action: ActionSpec,
}

impl PlayDefinition {
    /// Build the runnable action for this play.
    pub fn build(&self) -> Result<Action, BuildError> {
        Ok(self
            .action
            .build()?
            .with_tag(self.tag)
            .with_speed(self.speed))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Serde Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn default_true() -> bool {
    true
}

fn default_speed() -> f32 {
    1.0
}

fn default_tag() -> i32 {
    TAG_UNSET
}
