//! Collision detection and response for axis-aligned course geometry
//!
//! Obstacles, water and sand are all axis-aligned rectangles. The ball is a
//! circle. Bounces use single-axis angle reflection rather than a true contact
//! normal, which gives the course its slightly odd corner bounces.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use crate::consts::SEPARATION;
use crate::normalize_angle;

/// An axis-aligned rectangle in canvas pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Cosmetic only
    #[serde(default)]
    pub color: String,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            color: String::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict containment: points on the edge are outside
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.right() && p.y > self.y && p.y < self.bottom()
    }

    /// Closest point of the rectangle to `p` (p itself when inside)
    pub fn nearest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.x, self.right()), p.y.clamp(self.y, self.bottom()))
    }

    /// Rectangle grown by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
            color: self.color.clone(),
        }
    }
}

/// Result of a circle-vs-rectangle overlap test
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the circle overlaps the rectangle
    pub hit: bool,
    /// Nearest point on the rectangle (the impact point when hit)
    pub point: Vec2,
    /// Vector from `point` to the circle center
    pub delta: Vec2,
}

/// Test a circle against a rectangle without modifying anything
pub fn circle_rect_contact(center: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    let point = rect.nearest_point(center);
    let delta = center - point;
    CollisionResult {
        hit: delta.length() < radius,
        point,
        delta,
    }
}

/// Bounce the ball off a rectangle if they overlap
///
/// Reflects the travel angle on whichever axis has the larger penetration
/// component, pushes the ball just clear of that face and scales its speed by
/// `damping`. Returns whether a collision happened.
pub fn resolve_circle_rect_collision(ball: &mut Ball, rect: &Rect, damping: f32) -> bool {
    let contact = circle_rect_contact(ball.pos, ball.radius, rect);
    if !contact.hit {
        return false;
    }

    let delta = contact.delta;
    if delta.x.abs() > delta.y.abs() {
        ball.angle = normalize_angle(std::f32::consts::PI - ball.angle);
        ball.pos.x = if delta.x > 0.0 {
            rect.right() + ball.radius + SEPARATION
        } else {
            rect.x - ball.radius - SEPARATION
        };
    } else {
        ball.angle = normalize_angle(-ball.angle);
        ball.pos.y = if delta.y > 0.0 {
            rect.bottom() + ball.radius + SEPARATION
        } else {
            rect.y - ball.radius - SEPARATION
        };
    }

    ball.speed *= damping;
    true
}

/// Resolve the ball against every obstacle in order
///
/// `on_hit` fires once per obstacle hit with the impact point. Returns whether
/// any obstacle was hit; the caller applies its own extra penalty for that.
pub fn handle_collisions<F>(ball: &mut Ball, obstacles: &[Rect], damping: f32, mut on_hit: F) -> bool
where
    F: FnMut(Vec2),
{
    let mut collided = false;
    for obstacle in obstacles {
        let point = obstacle.nearest_point(ball.pos);
        if resolve_circle_rect_collision(ball, obstacle, damping) {
            collided = true;
            on_hit(point);
        }
    }
    collided
}
