// Ball game tuning. Units are canvas pixels, frames and milliseconds.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CatchParams {
    pub width: f64,
    pub height: f64,
    pub gravity: f64,
    /// Per-frame velocity multiplier (air drag).
    pub friction: f64,
    /// Restitution for walls and the bat.
    pub bounce: f64,
    pub spawn_interval_ms: f64,
    pub min_spawn_interval_ms: f64,
    /// The spawn interval shrinks by this much after every spawn.
    pub spawn_interval_step_ms: f64,
    /// Game over once this many enemy balls are on the field.
    pub enemy_limit: usize,
    pub bat_width: f64,
    pub bat_height: f64,
    /// Distance of the bat above the bottom edge before the pointer moves.
    pub bat_margin: f64,
    /// Upward speed of a shot.
    pub shot_power: f64,
    /// Gap between the bat's top edge and a fresh shot's centre.
    pub shot_offset: f64,
    pub max_shots: usize,
    pub cooldown_frames: u32,
    pub min_radius: f64,
    pub radius_span: f64,
    /// Bat returns at least this speed (before restitution).
    pub min_bounce_speed: f64,
    /// Fraction of the overlap turned into separating velocity.
    pub separation_gain: f64,
}

impl Default for CatchParams {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            gravity: 0.2,
            friction: 0.99,
            bounce: 0.7,
            spawn_interval_ms: 1000.0,
            min_spawn_interval_ms: 200.0,
            spawn_interval_step_ms: 10.0,
            enemy_limit: 20,
            bat_width: 100.0,
            bat_height: 20.0,
            bat_margin: 50.0,
            shot_power: 10.0,
            shot_offset: 15.0,
            max_shots: 3,
            cooldown_frames: 10,
            min_radius: 10.0,
            radius_span: 20.0,
            min_bounce_speed: 5.0,
            separation_gain: 0.05,
        }
    }
}

impl CatchParams {
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> crate::error::GameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
