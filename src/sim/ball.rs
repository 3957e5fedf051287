//! The golf ball and its per-tick integration

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{heading, normalize_angle};

/// The ball. Motion is stored as speed + travel angle, in units per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Never negative
    pub speed: f32,
    /// Direction of travel (radians)
    pub angle: f32,
    pub radius: f32,
    /// Hidden once the ball drops into the hole
    pub visible: bool,
    /// Cosmetic only
    pub color: String,
    /// Leftover spin from the last hit, cleared on every hit and stop
    #[serde(default)]
    pub spin: f32,
}

impl Ball {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            speed: 0.0,
            angle: 0.0,
            radius: BALL_RADIUS,
            visible: true,
            color: BALL_COLOR.to_string(),
            spin: 0.0,
        }
    }

    /// Velocity vector for this tick
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        heading(self.angle) * self.speed
    }

    /// Replace speed and angle from a velocity vector
    pub fn set_velocity(&mut self, vel: Vec2) {
        self.speed = vel.length();
        if self.speed > 0.0 {
            self.angle = vel.y.atan2(vel.x);
        }
    }

    /// Put the ball back at rest on `pos`
    ///
    /// Every field is assigned, never adjusted, so repeated resets cannot drift.
    pub fn reset_to(&mut self, pos: Vec2) {
        self.pos = pos;
        self.speed = 0.0;
        self.spin = 0.0;
        self.visible = true;
    }

    /// Start a shot toward `target` at `speed`
    pub fn strike(&mut self, target: Vec2, speed: f32) {
        self.spin = 0.0;
        self.angle = crate::angle_between(self.pos, target);
        self.speed = speed.max(0.0);
    }

    /// Advance one tick: move, apply friction, bounce off the canvas edges
    ///
    /// Edge bounces reflect the angle like an obstacle hit but only lose
    /// `wall_restitution`, not the obstacle damping.
    pub fn integrate(&mut self, bounds: Vec2, friction: f32, wall_restitution: f32) {
        self.pos += self.velocity();
        self.speed *= friction;

        let r = self.radius;
        if self.pos.x - r < 0.0 || self.pos.x + r > bounds.x {
            self.pos.x = self.pos.x.clamp(r, (bounds.x - r).max(r));
            self.angle = normalize_angle(std::f32::consts::PI - self.angle);
            self.speed *= wall_restitution;
        }
        if self.pos.y - r < 0.0 || self.pos.y + r > bounds.y {
            self.pos.y = self.pos.y.clamp(r, (bounds.y - r).max(r));
            self.angle = normalize_angle(-self.angle);
            self.speed *= wall_restitution;
        }
    }

    /// Stop the ball once it is slower than `threshold`
    ///
    /// Returns true when the ball is (now) at rest.
    pub fn settle(&mut self, threshold: f32) -> bool {
        if self.speed < threshold {
            self.speed = 0.0;
            self.spin = 0.0;
            true
        } else {
            false
        }
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        (self.pos - point).length()
    }
}
