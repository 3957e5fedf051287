//! Weather and wind
//!
//! Wind nudges a rolling ball a little every tick. The push scales with the
//! ball's own speed so a gust can bend a putt but never keep a ball rolling.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use crate::consts::MAX_WIND_FORCE;
use crate::heading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeatherKind {
    #[default]
    Clear,
    Rain,
    Snow,
    Storm,
}

impl WeatherKind {
    pub const ALL: [WeatherKind; 4] = [
        WeatherKind::Clear,
        WeatherKind::Rain,
        WeatherKind::Snow,
        WeatherKind::Storm,
    ];

    /// Extra drag from a wet or snowy green
    pub fn drag(&self) -> f32 {
        match self {
            WeatherKind::Clear | WeatherKind::Storm => 1.0,
            WeatherKind::Rain => 0.995,
            WeatherKind::Snow => 0.99,
        }
    }
}

/// Current weather over the course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub kind: WeatherKind,
    /// 0..3
    pub wind_force: f32,
    /// Degrees, canvas orientation (0 = +x, 90 = +y)
    pub wind_direction: f32,
    /// Ticks since this weather started; drives storm gusts
    #[serde(default)]
    pub time_ticks: u64,
}

impl Default for Weather {
    fn default() -> Self {
        Self::calm()
    }
}

impl Weather {
    pub fn calm() -> Self {
        Self::new(WeatherKind::Clear, 0.0, 0.0)
    }

    pub fn new(kind: WeatherKind, wind_force: f32, wind_direction: f32) -> Self {
        Self {
            kind,
            wind_force: wind_force.clamp(0.0, MAX_WIND_FORCE),
            wind_direction,
            time_ticks: 0,
        }
    }

    /// Roll a random weather pattern
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let kind = WeatherKind::ALL[rng.random_range(0..WeatherKind::ALL.len())];
        let force = rng.random::<f32>() * MAX_WIND_FORCE;
        let direction = rng.random::<f32>() * 360.0;
        Self::new(kind, force, direction)
    }

    /// Advance weather time by one tick
    pub fn update(&mut self) {
        self.time_ticks += 1;
    }

    /// Wind force right now; storms gust between half and full strength
    pub fn effective_force(&self) -> f32 {
        match self.kind {
            WeatherKind::Storm => {
                let t = self.time_ticks as f32 * 0.05;
                self.wind_force * (0.75 + 0.25 * t.sin())
            }
            _ => self.wind_force,
        }
    }

    /// Unit vector the wind blows toward
    pub fn wind_vector(&self) -> Vec2 {
        heading(self.wind_direction.to_radians())
    }

    /// Apply this tick's wind and drag to a rolling ball
    pub fn apply_to_ball(&self, ball: &mut Ball, wind_strength: f32) {
        if ball.speed <= 0.0 {
            return;
        }
        let push = self.wind_vector() * self.effective_force() * wind_strength * ball.speed;
        ball.set_velocity(ball.velocity() + push);
        ball.speed *= self.kind.drag();
    }
}
