//! Water hazards and sand bunkers
//!
//! Both use strict containment of the ball center; a ball sitting exactly on
//! an edge is still on the fairway.

use glam::Vec2;
use rand::Rng;

use super::ball::Ball;
use super::collision::Rect;
use crate::consts::SAND_SPRAY_MIN_SPEED;
use crate::normalize_angle;
use crate::tuning::PhysicsTuning;

/// Index of the first water hazard containing `pos`, in level order
pub fn find_water_hazard(pos: Vec2, hazards: &[Rect]) -> Option<usize> {
    hazards.iter().position(|h| h.contains_point(pos))
}

/// The bunker the ball rolled through this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SandContact {
    pub index: usize,
    /// Fast enough to throw up sand particles
    pub spray: bool,
}

/// Apply sand drag (and uneven-sand drift) from the first bunker under the ball
///
/// Only one bunker acts per tick even where bunkers overlap. Sand never stops
/// a shot on its own; the normal rest check does that.
pub fn apply_sand_bunkers<R: Rng>(
    ball: &mut Ball,
    bunkers: &[Rect],
    tuning: &PhysicsTuning,
    rng: &mut R,
) -> Option<SandContact> {
    let index = bunkers.iter().position(|b| b.contains_point(ball.pos))?;

    ball.speed *= tuning.sand_friction;
    if ball.speed > tuning.sand_drift_min_speed {
        let drift = (rng.random::<f32>() - 0.5) * tuning.sand_drift;
        ball.angle = normalize_angle(ball.angle + drift);
    }

    Some(SandContact {
        index,
        spray: ball.speed > SAND_SPRAY_MIN_SPEED,
    })
}
