//! Data-driven physics tuning
//!
//! Every field defaults to the matching constant in [`crate::consts`]. A JSON
//! file only needs the keys it wants to override.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GolfError;

/// Physics and gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    // === Ball motion ===
    pub friction: f32,
    pub wall_restitution: f32,
    pub stop_threshold: f32,

    // === Obstacles ===
    pub collision_damping: f32,
    pub collision_tick_penalty: f32,

    // === Sand ===
    pub sand_friction: f32,
    pub sand_drift_min_speed: f32,
    pub sand_drift: f32,

    // === Hole ===
    pub capture_factor: f32,

    // === Shot ===
    pub min_power: f32,
    pub max_power: f32,
    pub power_scale: f32,

    // === Weather ===
    pub wind_strength: f32,
    pub weather_change_chance: f64,

    // === Powerups ===
    pub powerup_chance: f64,
    pub pickup_radius: f32,
    pub powerup_clearance: f32,
    pub powerup_margin: f32,
    pub max_placement_attempts: u32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            friction: FRICTION,
            wall_restitution: WALL_RESTITUTION,
            stop_threshold: STOP_THRESHOLD,

            collision_damping: COLLISION_DAMPING,
            collision_tick_penalty: COLLISION_TICK_PENALTY,

            sand_friction: SAND_FRICTION,
            sand_drift_min_speed: SAND_DRIFT_MIN_SPEED,
            sand_drift: SAND_DRIFT,

            capture_factor: CAPTURE_FACTOR,

            min_power: MIN_POWER,
            max_power: MAX_POWER,
            power_scale: POWER_SCALE,

            wind_strength: WIND_STRENGTH,
            weather_change_chance: WEATHER_CHANGE_CHANCE,

            powerup_chance: POWERUP_CHANCE,
            pickup_radius: PICKUP_RADIUS,
            powerup_clearance: POWERUP_CLEARANCE,
            powerup_margin: POWERUP_MARGIN,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

impl PhysicsTuning {
    /// Parse tuning overrides from JSON
    pub fn from_json(json: &str) -> Result<Self, GolfError> {
        let tuning: Self = serde_json::from_str(json).map_err(GolfError::InvalidTuning)?;
        tuning.validate()?;
        log::debug!("Loaded physics tuning: {:?}", tuning);
        Ok(tuning)
    }

    /// Reject values that would keep a shot rolling forever or make no sense
    pub fn validate(&self) -> Result<(), GolfError> {
        let unit_open = |v: f32| v > 0.0 && v < 1.0;
        let unit = |v: f32| v > 0.0 && v <= 1.0;
        let positive = |v: f32| v > 0.0 && v.is_finite();
        let checks: [(&'static str, f32, bool, &'static str); 11] = [
            ("friction", self.friction, unit_open(self.friction), "0 < x < 1"),
            ("stop_threshold", self.stop_threshold, positive(self.stop_threshold), "x > 0"),
            ("wall_restitution", self.wall_restitution, unit(self.wall_restitution), "0 < x <= 1"),
            ("collision_damping", self.collision_damping, unit(self.collision_damping), "0 < x <= 1"),
            (
                "collision_tick_penalty",
                self.collision_tick_penalty,
                unit(self.collision_tick_penalty),
                "0 < x <= 1",
            ),
            ("sand_friction", self.sand_friction, unit(self.sand_friction), "0 < x <= 1"),
            ("capture_factor", self.capture_factor, self.capture_factor >= 0.0, "x >= 0"),
            ("min_power", self.min_power, positive(self.min_power), "x > 0"),
            ("max_power", self.max_power, self.max_power >= self.min_power, "x >= min_power"),
            ("power_scale", self.power_scale, positive(self.power_scale), "x > 0"),
            ("wind_strength", self.wind_strength, self.wind_strength >= 0.0, "x >= 0"),
        ];
        for (field, value, ok, expected) in checks {
            if !ok {
                return Err(GolfError::TuningOutOfRange {
                    field,
                    value: value as f64,
                    expected,
                });
            }
        }
        for (field, value) in [
            ("weather_change_chance", self.weather_change_chance),
            ("powerup_chance", self.powerup_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GolfError::TuningOutOfRange {
                    field,
                    value,
                    expected: "0 <= x <= 1",
                });
            }
        }
        Ok(())
    }

    /// Initial ball speed for a shot of the given power
    pub fn shot_speed(&self, power: f32) -> f32 {
        power.clamp(self.min_power, self.max_power) * self.power_scale
    }
}
