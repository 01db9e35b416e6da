//! Easing curves
//!
//! An [`Ease`] is a pure mapping from normalized progress in `[0, 1]` to a
//! remapped value. Curves hold no per-use state, so the same value can sit
//! in any number of easing pipelines at once. An interval action applies its
//! pipeline left to right before progress reaches the action's effect.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// One easing curve in an interval action's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Ease {
    /// Power curve, accelerating from rest.
    In {
        /// Exponent; 1.0 is linear.
        rate: f32,
    },
    /// Power curve, decelerating to rest.
    Out {
        /// Exponent; 1.0 is linear.
        rate: f32,
    },
    /// Power curve, accelerating then decelerating.
    InOut {
        /// Exponent; 1.0 is linear.
        rate: f32,
    },
    /// Sinusoidal start.
    SineIn,
    /// Sinusoidal stop.
    SineOut,
    /// Sinusoidal start and stop.
    SineInOut,
    /// Exponential start.
    ExpoIn,
    /// Exponential stop.
    ExpoOut,
    /// Exponential start and stop.
    ExpoInOut,
    /// Elastic overshoot at the start.
    ElasticIn {
        /// Oscillation period; 0.3 is the conventional default.
        period: f32,
    },
    /// Elastic overshoot at the end.
    ElasticOut {
        /// Oscillation period; 0.3 is the conventional default.
        period: f32,
    },
    /// Elastic overshoot at both ends.
    ElasticInOut {
        /// Oscillation period; 0.3 is the conventional default.
        period: f32,
    },
    /// Bouncing start.
    BounceIn,
    /// Bouncing stop.
    BounceOut,
    /// Bouncing start and stop.
    BounceInOut,
    /// Slight backwards overshoot at the start.
    BackIn,
    /// Slight backwards overshoot at the end.
    BackOut,
    /// Slight backwards overshoot at both ends.
    BackInOut,
}

/// Piecewise parabola shared by the bounce curves.
fn bounce_time(mut t: f32) -> f32 {
    if t < 1.0 / 2.75 {
        7.5625 * t * t
    } else if t < 2.0 / 2.75 {
        t -= 1.5 / 2.75;
        7.5625 * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        t -= 2.25 / 2.75;
        7.5625 * t * t + 0.9375
    } else {
        t -= 2.625 / 2.75;
        7.5625 * t * t + 0.984375
    }
}

impl Ease {
    /// Remap normalized progress. Input is nominally `[0, 1]`; curves with
    /// overshoot may return values outside that range.
    pub fn apply(&self, t: f32) -> f32 {
        match *self {
            Self::In { rate } => t.powf(rate),
            Self::Out { rate } => t.powf(1.0 / rate),
            Self::InOut { rate } => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t.powf(rate)
                } else {
                    1.0 - 0.5 * (2.0 - t).powf(rate)
                }
            }
            Self::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Self::SineOut => (t * PI / 2.0).sin(),
            Self::SineInOut => -0.5 * ((t * PI).cos() - 1.0),
            Self::ExpoIn => {
                if t == 0.0 {
                    0.0
                } else {
                    2.0_f32.powf(10.0 * (t - 1.0))
                }
            }
            Self::ExpoOut => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
            Self::ExpoInOut => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * 2.0_f32.powf(10.0 * (t - 1.0))
                } else {
                    0.5 * (2.0 - 2.0_f32.powf(-10.0 * (t - 1.0)))
                }
            }
            Self::ElasticIn { period } => elastic_in(t, period),
            Self::ElasticOut { period } => elastic_out(t, period),
            Self::ElasticInOut { period } => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let period = if period == 0.0 { 0.45 } else { period };
                let s = period / 4.0;
                let t = t * 2.0 - 1.0;
                if t < 0.0 {
                    -0.5 * 2.0_f32.powf(10.0 * t) * ((t - s) * 2.0 * PI / period).sin()
                } else {
                    2.0_f32.powf(-10.0 * t) * ((t - s) * 2.0 * PI / period).sin() * 0.5 + 1.0
                }
            }
            Self::BounceIn => 1.0 - bounce_time(1.0 - t),
            Self::BounceOut => bounce_time(t),
            Self::BounceInOut => {
                if t < 0.5 {
                    (1.0 - bounce_time(1.0 - t * 2.0)) * 0.5
                } else {
                    bounce_time(t * 2.0 - 1.0) * 0.5 + 0.5
                }
            }
            Self::BackIn => {
                let s = 1.70158;
                t * t * ((s + 1.0) * t - s)
            }
            Self::BackOut => {
                let s = 1.70158;
                let t = t - 1.0;
                t * t * ((s + 1.0) * t + s) + 1.0
            }
            Self::BackInOut => {
                let s = 1.70158 * 1.525;
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * (t * t * ((s + 1.0) * t - s))
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * ((s + 1.0) * t + s) + 2.0)
                }
            }
        }
    }
}

fn elastic_in(t: f32, period: f32) -> f32 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let period = if period == 0.0 { 0.3 } else { period };
    let s = period / 4.0;
    let t = t - 1.0;
    -(2.0_f32.powf(10.0 * t)) * ((t - s) * 2.0 * PI / period).sin()
}

fn elastic_out(t: f32, period: f32) -> f32 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let period = if period == 0.0 { 0.3 } else { period };
    let s = period / 4.0;
    2.0_f32.powf(-10.0 * t) * ((t - s) * 2.0 * PI / period).sin() + 1.0
}
