//! Mini Golf - 2D physics mini-golf for the browser canvas
//!
//! Core modules:
//! - `sim`: Per-frame simulation (ball physics, collisions, turn/level state)
//! - `tuning`: Data-driven physics constants
//! - `settings`: Player preferences
//! - `leaderboard`: Best completed rounds

pub mod error;
pub mod leaderboard;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::GolfError;
pub use leaderboard::Leaderboard;
pub use settings::Settings;
pub use tuning::PhysicsTuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick per animation frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_COLOR: &str = "#ffffff";

    /// Open-ground friction, applied every tick
    pub const FRICTION: f32 = 0.98;
    /// Speed kept after hitting a single obstacle
    pub const COLLISION_DAMPING: f32 = 0.8;
    /// Extra speed kept when any obstacle was hit during a tick
    pub const COLLISION_TICK_PENALTY: f32 = 0.95;
    /// Speed kept after bouncing off a canvas edge
    pub const WALL_RESTITUTION: f32 = 0.9;
    /// Below this speed the ball is at rest
    pub const STOP_THRESHOLD: f32 = 0.05;
    /// Gap left between a resolved ball and the surface it hit
    pub const SEPARATION: f32 = 1.0;

    /// Sand bunkers
    pub const SAND_FRICTION: f32 = 0.85;
    pub const SAND_DRIFT_MIN_SPEED: f32 = 0.5;
    pub const SAND_DRIFT: f32 = 0.03;
    pub const SAND_SPRAY_MIN_SPEED: f32 = 1.0;

    /// Fraction of the hole radius that counts toward capture
    pub const CAPTURE_FACTOR: f32 = 0.8;

    /// Shot power (slider range) and its conversion to initial speed
    pub const MIN_POWER: f32 = 1.0;
    pub const MAX_POWER: f32 = 10.0;
    pub const POWER_SCALE: f32 = 2.0;

    /// Wind push per unit of force, relative to the ball's speed
    pub const WIND_STRENGTH: f32 = 0.002;
    pub const MAX_WIND_FORCE: f32 = 3.0;
    pub const WEATHER_CHANGE_CHANCE: f64 = 0.3;

    /// Powerups
    pub const POWERUP_CHANCE: f64 = 0.5;
    pub const PICKUP_RADIUS: f32 = 15.0;
    pub const POWERUP_CLEARANCE: f32 = 50.0;
    pub const POWERUP_MARGIN: f32 = 20.0;
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Local multiplayer
    pub const MAX_PLAYERS: usize = 4;
    pub const PLAYER_COLORS: [&str; 4] = ["#ff0000", "#0000ff", "#00cc00", "#ffcc00"];
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `angle`
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the direction from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
