//! Named easing curves for keyframe interpolation.
//!
//! Each curve maps normalized progress `u` in `[0, 1]` to eased progress.
//! The formulas are the Penner family as published on easings.net. Inputs
//! are clamped, and every curve returns exactly `0.0` at `u <= 0` and `1.0`
//! at `u >= 1`; `Back` and `Elastic` overshoot `[0, 1]` in between.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

const BACK_C1: f64 = 1.70158;
const BACK_C2: f64 = BACK_C1 * 1.525;
const BACK_C3: f64 = BACK_C1 + 1.0;
const ELASTIC_C4: f64 = (2.0 * PI) / 3.0;
const ELASTIC_C5: f64 = (2.0 * PI) / 4.5;
const BOUNCE_N1: f64 = 7.5625;
const BOUNCE_D1: f64 = 2.75;

/// How progress toward the next keyframe is reshaped.
///
/// Serialized as the upper-case literals used in project documents,
/// e.g. `EASE_IN_OUT_CUBIC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EasingType {
    /// Hold the value until the next keyframe is reached.
    None,
    #[default]
    Linear,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

impl EasingType {
    /// Every curve, in document order.
    pub const ALL: [EasingType; 32] = [
        Self::None,
        Self::Linear,
        Self::EaseInSine,
        Self::EaseOutSine,
        Self::EaseInOutSine,
        Self::EaseInQuad,
        Self::EaseOutQuad,
        Self::EaseInOutQuad,
        Self::EaseInCubic,
        Self::EaseOutCubic,
        Self::EaseInOutCubic,
        Self::EaseInQuart,
        Self::EaseOutQuart,
        Self::EaseInOutQuart,
        Self::EaseInQuint,
        Self::EaseOutQuint,
        Self::EaseInOutQuint,
        Self::EaseInExpo,
        Self::EaseOutExpo,
        Self::EaseInOutExpo,
        Self::EaseInCirc,
        Self::EaseOutCirc,
        Self::EaseInOutCirc,
        Self::EaseInBack,
        Self::EaseOutBack,
        Self::EaseInOutBack,
        Self::EaseInElastic,
        Self::EaseOutElastic,
        Self::EaseInOutElastic,
        Self::EaseInBounce,
        Self::EaseOutBounce,
        Self::EaseInOutBounce,
    ];

    /// Apply the curve to normalized progress `u`.
    pub fn apply(self, u: f64) -> f64 {
        if u <= 0.0 {
            return 0.0;
        }
        if u >= 1.0 {
            return 1.0;
        }
        match self {
            Self::None => 0.0,
            Self::Linear => u,

            Self::EaseInSine => 1.0 - (u * PI / 2.0).cos(),
            Self::EaseOutSine => (u * PI / 2.0).sin(),
            Self::EaseInOutSine => -((PI * u).cos() - 1.0) / 2.0,

            Self::EaseInQuad => power_in(u, 2),
            Self::EaseOutQuad => power_out(u, 2),
            Self::EaseInOutQuad => power_in_out(u, 2),
            Self::EaseInCubic => power_in(u, 3),
            Self::EaseOutCubic => power_out(u, 3),
            Self::EaseInOutCubic => power_in_out(u, 3),
            Self::EaseInQuart => power_in(u, 4),
            Self::EaseOutQuart => power_out(u, 4),
            Self::EaseInOutQuart => power_in_out(u, 4),
            Self::EaseInQuint => power_in(u, 5),
            Self::EaseOutQuint => power_out(u, 5),
            Self::EaseInOutQuint => power_in_out(u, 5),

            Self::EaseInExpo => 2f64.powf(10.0 * u - 10.0),
            Self::EaseOutExpo => 1.0 - 2f64.powf(-10.0 * u),
            Self::EaseInOutExpo => {
                if u < 0.5 {
                    2f64.powf(20.0 * u - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * u + 10.0)) / 2.0
                }
            }

            Self::EaseInCirc => 1.0 - (1.0 - u * u).sqrt(),
            Self::EaseOutCirc => (1.0 - (u - 1.0).powi(2)).sqrt(),
            Self::EaseInOutCirc => {
                if u < 0.5 {
                    (1.0 - (1.0 - (2.0 * u).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * u + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }

            Self::EaseInBack => BACK_C3 * u * u * u - BACK_C1 * u * u,
            Self::EaseOutBack => {
                1.0 + BACK_C3 * (u - 1.0).powi(3) + BACK_C1 * (u - 1.0).powi(2)
            }
            Self::EaseInOutBack => {
                if u < 0.5 {
                    ((2.0 * u).powi(2) * ((BACK_C2 + 1.0) * 2.0 * u - BACK_C2)) / 2.0
                } else {
                    ((2.0 * u - 2.0).powi(2) * ((BACK_C2 + 1.0) * (u * 2.0 - 2.0) + BACK_C2)
                        + 2.0)
                        / 2.0
                }
            }

            Self::EaseInElastic => {
                -(2f64.powf(10.0 * u - 10.0)) * ((u * 10.0 - 10.75) * ELASTIC_C4).sin()
            }
            Self::EaseOutElastic => {
                2f64.powf(-10.0 * u) * ((u * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
            }
            Self::EaseInOutElastic => {
                if u < 0.5 {
                    -(2f64.powf(20.0 * u - 10.0) * ((20.0 * u - 11.125) * ELASTIC_C5).sin()) / 2.0
                } else {
                    (2f64.powf(-20.0 * u + 10.0) * ((20.0 * u - 11.125) * ELASTIC_C5).sin()) / 2.0
                        + 1.0
                }
            }

            Self::EaseInBounce => 1.0 - bounce_out(1.0 - u),
            Self::EaseOutBounce => bounce_out(u),
            Self::EaseInOutBounce => {
                if u < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * u)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * u - 1.0)) / 2.0
                }
            }
        }
    }

    /// Whether the curve may leave `[0, 1]` or reverse direction mid-way.
    pub fn is_overshooting(self) -> bool {
        matches!(
            self,
            Self::EaseInBack
                | Self::EaseOutBack
                | Self::EaseInOutBack
                | Self::EaseInElastic
                | Self::EaseOutElastic
                | Self::EaseInOutElastic
                | Self::EaseInBounce
                | Self::EaseOutBounce
                | Self::EaseInOutBounce
        )
    }

    /// The literal used for this curve in project documents.
    pub fn literal(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Linear => "LINEAR",
            Self::EaseInSine => "EASE_IN_SINE",
            Self::EaseOutSine => "EASE_OUT_SINE",
            Self::EaseInOutSine => "EASE_IN_OUT_SINE",
            Self::EaseInQuad => "EASE_IN_QUAD",
            Self::EaseOutQuad => "EASE_OUT_QUAD",
            Self::EaseInOutQuad => "EASE_IN_OUT_QUAD",
            Self::EaseInCubic => "EASE_IN_CUBIC",
            Self::EaseOutCubic => "EASE_OUT_CUBIC",
            Self::EaseInOutCubic => "EASE_IN_OUT_CUBIC",
            Self::EaseInQuart => "EASE_IN_QUART",
            Self::EaseOutQuart => "EASE_OUT_QUART",
            Self::EaseInOutQuart => "EASE_IN_OUT_QUART",
            Self::EaseInQuint => "EASE_IN_QUINT",
            Self::EaseOutQuint => "EASE_OUT_QUINT",
            Self::EaseInOutQuint => "EASE_IN_OUT_QUINT",
            Self::EaseInExpo => "EASE_IN_EXPO",
            Self::EaseOutExpo => "EASE_OUT_EXPO",
            Self::EaseInOutExpo => "EASE_IN_OUT_EXPO",
            Self::EaseInCirc => "EASE_IN_CIRC",
            Self::EaseOutCirc => "EASE_OUT_CIRC",
            Self::EaseInOutCirc => "EASE_IN_OUT_CIRC",
            Self::EaseInBack => "EASE_IN_BACK",
            Self::EaseOutBack => "EASE_OUT_BACK",
            Self::EaseInOutBack => "EASE_IN_OUT_BACK",
            Self::EaseInElastic => "EASE_IN_ELASTIC",
            Self::EaseOutElastic => "EASE_OUT_ELASTIC",
            Self::EaseInOutElastic => "EASE_IN_OUT_ELASTIC",
            Self::EaseInBounce => "EASE_IN_BOUNCE",
            Self::EaseOutBounce => "EASE_OUT_BOUNCE",
            Self::EaseInOutBounce => "EASE_IN_OUT_BOUNCE",
        }
    }
}

impl fmt::Display for EasingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

#[inline]
fn power_in(u: f64, n: i32) -> f64 {
    u.powi(n)
}

#[inline]
fn power_out(u: f64, n: i32) -> f64 {
    1.0 - (1.0 - u).powi(n)
}

#[inline]
fn power_in_out(u: f64, n: i32) -> f64 {
    if u < 0.5 {
        2f64.powi(n - 1) * u.powi(n)
    } else {
        1.0 - (-2.0 * u + 2.0).powi(n) / 2.0
    }
}

fn bounce_out(u: f64) -> f64 {
    if u < 1.0 / BOUNCE_D1 {
        BOUNCE_N1 * u * u
    } else if u < 2.0 / BOUNCE_D1 {
        let u = u - 1.5 / BOUNCE_D1;
        BOUNCE_N1 * u * u + 0.75
    } else if u < 2.5 / BOUNCE_D1 {
        let u = u - 2.25 / BOUNCE_D1;
        BOUNCE_N1 * u * u + 0.9375
    } else {
        let u = u - 2.625 / BOUNCE_D1;
        BOUNCE_N1 * u * u + 0.984375
    }
}
