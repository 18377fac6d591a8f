// Runner tuning. Angles are given in degrees here and converted once when the
// simulation is built.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inclusive joint range in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AngleRange {
    pub min: f64,
    pub max: f64,
}

impl AngleRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn min_rad(&self) -> f64 {
        self.min.to_radians()
    }

    pub fn max_rad(&self) -> f64 {
        self.max.to_radians()
    }

    /// Hard clip in radians (no spring-back).
    pub fn clamp_rad(&self, angle: f64) -> f64 {
        angle.clamp(self.min_rad(), self.max_rad())
    }
}

/// Starting joint angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RestPose {
    pub left_thigh: f64,
    pub right_thigh: f64,
    pub left_calf: f64,
    pub right_calf: f64,
}

/// Everything the runner integrator needs to know about the world and the body.
/// Distances are canvas pixels, velocities pixels per step, y grows downward.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunnerParams {
    pub start_x: f64,
    pub start_y: f64,
    pub ground_y: f64,
    pub thigh_length: f64,
    pub calf_length: f64,
    /// Angular velocity added per step while a drive is held (rad/step).
    pub muscle_impulse: f64,
    /// Per-step multiplier on every joint velocity, in (0, 1).
    pub joint_damping: f64,
    pub thigh_range: AngleRange,
    pub calf_range: AngleRange,
    pub gravity: f64,
    /// Horizontal velocity added per grounded foot per step.
    pub push: f64,
    /// Pushes stop once the hip is this fast.
    pub push_speed_cap: f64,
    /// Airborne rotation gain per unit of forward speed.
    pub tumble_factor: f64,
    /// Per-step multiplier on rotation velocity while grounded.
    pub rotation_damping: f64,
    /// Tilt (degrees) beyond which the runner has fallen.
    pub max_tilt: f64,
    /// A foot this close above the ground still counts as touching it.
    pub contact_tolerance: f64,
    pub rest_pose: RestPose,
}

impl Default for RunnerParams {
    fn default() -> Self {
        Self {
            start_x: 100.0,
            start_y: 250.0,
            ground_y: 350.0,
            thigh_length: 40.0,
            calf_length: 40.0,
            muscle_impulse: 0.02,
            joint_damping: 0.9,
            thigh_range: AngleRange::new(-60.0, 90.0),
            calf_range: AngleRange::new(-9.0, 90.0),
            gravity: 0.5,
            push: 0.05,
            push_speed_cap: 2.0,
            tumble_factor: 0.001,
            rotation_damping: 0.8,
            max_tilt: 90.0,
            contact_tolerance: 0.5,
            rest_pose: RestPose {
                left_thigh: 10.0,
                right_thigh: -10.0,
                left_calf: 0.0,
                right_calf: 0.0,
            },
        }
    }
}

impl RunnerParams {
    /// Parse a (possibly partial) JSON config; absent fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> crate::error::GameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn max_tilt_rad(&self) -> f64 {
        self.max_tilt.to_radians()
    }
}
