//! Spatial and color transform snapshot of a clip.

use serde::{Deserialize, Serialize};

/// Value snapshot of every animatable clip property.
///
/// Rotation is in degrees. Keys are persisted as `valuePosX`, `valueRot`, etc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoProperties {
    pub value_pos_x: f64,
    pub value_pos_y: f64,
    pub value_rot: f64,
    pub value_scale_x: f64,
    pub value_scale_y: f64,
    pub value_opacity: f64,
    pub value_speed: f64,
    pub value_hue: f64,
    pub value_saturation: f64,
    pub value_brightness: f64,
    pub value_temperature: f64,
}

impl Default for VideoProperties {
    fn default() -> Self {
        Self {
            value_pos_x: 0.0,
            value_pos_y: 0.0,
            value_rot: 0.0,
            value_scale_x: 1.0,
            value_scale_y: 1.0,
            value_opacity: 1.0,
            value_speed: 1.0,
            value_hue: 0.0,
            value_saturation: 1.0,
            value_brightness: 0.0,
            value_temperature: 6500.0,
        }
    }
}

impl VideoProperties {
    /// Interpolate every field toward `to` by eased progress `t`.
    ///
    /// `t` is not clamped, so overshooting curves carry through. Rotation
    /// follows the shortest angular path.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            value_pos_x: mix(self.value_pos_x, to.value_pos_x),
            value_pos_y: mix(self.value_pos_y, to.value_pos_y),
            value_rot: self.value_rot + shortest_angle(self.value_rot, to.value_rot) * t,
            value_scale_x: mix(self.value_scale_x, to.value_scale_x),
            value_scale_y: mix(self.value_scale_y, to.value_scale_y),
            value_opacity: mix(self.value_opacity, to.value_opacity),
            value_speed: mix(self.value_speed, to.value_speed),
            value_hue: mix(self.value_hue, to.value_hue),
            value_saturation: mix(self.value_saturation, to.value_saturation),
            value_brightness: mix(self.value_brightness, to.value_brightness),
            value_temperature: mix(self.value_temperature, to.value_temperature),
        }
    }

    /// Rotation in radians.
    pub fn rotation_radians(&self) -> f64 {
        self.value_rot.to_radians()
    }

    /// Snap rotation to the nearest multiple of `step` degrees when it lies
    /// within `threshold` degrees of it. Returns whether a snap happened.
    pub fn snap_rotation(&mut self, threshold: f64, step: f64) -> bool {
        if step <= 0.0 {
            return false;
        }
        let target = (self.value_rot / step).round() * step;
        if (target - self.value_rot).abs() <= threshold && target != self.value_rot {
            self.value_rot = target;
            return true;
        }
        false
    }

    /// Largest absolute difference across all fields.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        [
            self.value_pos_x - other.value_pos_x,
            self.value_pos_y - other.value_pos_y,
            self.value_rot - other.value_rot,
            self.value_scale_x - other.value_scale_x,
            self.value_scale_y - other.value_scale_y,
            self.value_opacity - other.value_opacity,
            self.value_speed - other.value_speed,
            self.value_hue - other.value_hue,
            self.value_saturation - other.value_saturation,
            self.value_brightness - other.value_brightness,
            self.value_temperature - other.value_temperature,
        ]
        .into_iter()
        .fold(0.0, |acc, d| acc.max(d.abs()))
    }
}

/// Signed delta from `from` to `to` in degrees, wrapped to `[-180, 180]`.
pub fn shortest_angle(from: f64, to: f64) -> f64 {
    let mut delta = (to - from) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    delta
}
