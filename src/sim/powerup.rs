//! Powerups: placement, pickup and timed effects
//!
//! Effects are tick counters rather than wall-clock timers, so expiry happens
//! inside the tick like every other state change.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::Rect;
use crate::consts::TICKS_PER_SECOND;
use crate::tuning::PhysicsTuning;

/// Friction while the Slick powerup is active
pub const SLICK_FRICTION: f32 = 0.99;
/// Capture radius multiplier while WideCup is active
pub const WIDE_CUP_SCALE: f32 = 1.5;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Ball rolls further
    Slick,
    /// Hole captures from further away
    WideCup,
    /// Wind has no effect on the ball
    Featherweight,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [
        PowerupKind::Slick,
        PowerupKind::WideCup,
        PowerupKind::Featherweight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PowerupKind::Slick => "Slick Ball",
            PowerupKind::WideCup => "Wide Cup",
            PowerupKind::Featherweight => "Featherweight",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PowerupKind::Slick => "⚡",
            PowerupKind::WideCup => "🎯",
            PowerupKind::Featherweight => "🪶",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            PowerupKind::Slick => "#f59e0b",
            PowerupKind::WideCup => "#ef4444",
            PowerupKind::Featherweight => "#8b5cf6",
        }
    }

    pub fn duration_ticks(&self) -> u32 {
        let secs = match self {
            PowerupKind::Slick => 8,
            PowerupKind::WideCup => 10,
            PowerupKind::Featherweight => 10,
        };
        secs * TICKS_PER_SECOND
    }
}

/// A powerup lying on the course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub pos: Vec2,
}

/// Active power-up effects (ticks remaining, 0 = inactive)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub slick_ticks: u32,
    pub wide_cup_ticks: u32,
    pub featherweight_ticks: u32,
}

impl ActiveEffects {
    fn timer_mut(&mut self, kind: PowerupKind) -> &mut u32 {
        match kind {
            PowerupKind::Slick => &mut self.slick_ticks,
            PowerupKind::WideCup => &mut self.wide_cup_ticks,
            PowerupKind::Featherweight => &mut self.featherweight_ticks,
        }
    }

    /// Start (or restart) an effect
    pub fn activate(&mut self, kind: PowerupKind) {
        *self.timer_mut(kind) = kind.duration_ticks();
    }

    pub fn is_active(&self, kind: PowerupKind) -> bool {
        match kind {
            PowerupKind::Slick => self.slick_ticks > 0,
            PowerupKind::WideCup => self.wide_cup_ticks > 0,
            PowerupKind::Featherweight => self.featherweight_ticks > 0,
        }
    }

    /// Count every timer down one tick; returns the effects that just ran out
    pub fn tick(&mut self) -> Vec<PowerupKind> {
        let mut expired = Vec::new();
        for kind in PowerupKind::ALL {
            let timer = self.timer_mut(kind);
            if *timer > 0 {
                *timer -= 1;
                if *timer == 0 {
                    expired.push(kind);
                }
            }
        }
        expired
    }

    pub fn friction(&self, base: f32) -> f32 {
        if self.is_active(PowerupKind::Slick) {
            SLICK_FRICTION.max(base)
        } else {
            base
        }
    }

    pub fn capture_scale(&self) -> f32 {
        if self.is_active(PowerupKind::WideCup) {
            WIDE_CUP_SCALE
        } else {
            1.0
        }
    }

    pub fn wind_scale(&self) -> f32 {
        if self.is_active(PowerupKind::Featherweight) {
            0.0
        } else {
            1.0
        }
    }
}

/// Roll powerups for a freshly loaded level
///
/// Positions that cannot be found within the attempt budget are skipped.
pub fn place_powerups<R: Rng>(
    rng: &mut R,
    canvas: Vec2,
    ball_pos: Vec2,
    hole_pos: Vec2,
    blocked: &[&[Rect]],
    tuning: &PhysicsTuning,
) -> Vec<Powerup> {
    if !rng.random_bool(tuning.powerup_chance.clamp(0.0, 1.0)) {
        return Vec::new();
    }

    let count = rng.random_range(1..=2);
    let mut placed = Vec::with_capacity(count);
    for _ in 0..count {
        let kind = PowerupKind::ALL[rng.random_range(0..PowerupKind::ALL.len())];
        match find_position(rng, canvas, ball_pos, hole_pos, blocked, tuning) {
            Some(pos) => {
                log::debug!("Placed {} at ({:.0}, {:.0})", kind.name(), pos.x, pos.y);
                placed.push(Powerup { kind, pos });
            }
            None => log::warn!(
                "No free spot for {} after {} attempts, skipping",
                kind.name(),
                tuning.max_placement_attempts
            ),
        }
    }
    placed
}

fn find_position<R: Rng>(
    rng: &mut R,
    canvas: Vec2,
    ball_pos: Vec2,
    hole_pos: Vec2,
    blocked: &[&[Rect]],
    tuning: &PhysicsTuning,
) -> Option<Vec2> {
    let margin = tuning.powerup_margin;
    let span = canvas - Vec2::splat(2.0 * margin);
    if span.x <= 0.0 || span.y <= 0.0 {
        return None;
    }

    for _ in 0..tuning.max_placement_attempts {
        let pos = Vec2::new(
            rng.random::<f32>() * span.x + margin,
            rng.random::<f32>() * span.y + margin,
        );
        if is_clear(pos, ball_pos, hole_pos, blocked, tuning) {
            return Some(pos);
        }
    }
    None
}

fn is_clear(
    pos: Vec2,
    ball_pos: Vec2,
    hole_pos: Vec2,
    blocked: &[&[Rect]],
    tuning: &PhysicsTuning,
) -> bool {
    if (pos - hole_pos).length() < tuning.powerup_clearance
        || (pos - ball_pos).length() < tuning.powerup_clearance
    {
        return false;
    }
    !blocked
        .iter()
        .flat_map(|rects| rects.iter())
        .any(|r| r.expanded(tuning.powerup_margin).contains_point(pos))
}

/// Remove and return every powerup the ball is touching
pub fn collect_powerups(ball: &Ball, powerups: &mut Vec<Powerup>, pickup_radius: f32) -> Vec<PowerupKind> {
    let reach = ball.radius + pickup_radius;
    let mut collected = Vec::new();
    powerups.retain(|p| {
        if ball.distance_to(p.pos) < reach {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const CANVAS: Vec2 = Vec2::new(800.0, 600.0);

    fn always_place() -> PhysicsTuning {
        PhysicsTuning {
            powerup_chance: 1.0,
            ..PhysicsTuning::default()
        }
    }

    #[test]
    fn test_placements_respect_clearance() {
        let tuning = always_place();
        let obstacles = vec![Rect::new(300.0, 0.0, 40.0, 600.0)];
        let water = vec![Rect::new(500.0, 200.0, 100.0, 100.0)];
        let ball = Vec2::new(100.0, 300.0);
        let hole = Vec2::new(700.0, 300.0);

        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let placed = place_powerups(&mut rng, CANVAS, ball, hole, &[obstacles.as_slice(), water.as_slice()], &tuning);
            assert!((1..=2).contains(&placed.len()));
            for p in &placed {
                assert!((p.pos - ball).length() >= 50.0);
                assert!((p.pos - hole).length() >= 50.0);
                assert!(!obstacles[0].expanded(20.0).contains_point(p.pos));
                assert!(!water[0].expanded(20.0).contains_point(p.pos));
                assert!(p.pos.x >= 20.0 && p.pos.x <= 780.0);
            }
        }
    }

    #[test]
    fn test_unsatisfiable_layout_gives_up() {
        let tuning = always_place();
        // One obstacle covering the entire canvas
        let wall = vec![Rect::new(0.0, 0.0, 800.0, 600.0)];
        let mut rng = Pcg32::seed_from_u64(3);

        let placed = place_powerups(
            &mut rng,
            CANVAS,
            Vec2::new(100.0, 100.0),
            Vec2::new(700.0, 500.0),
            &[wall.as_slice()],
            &tuning,
        );
        assert!(placed.is_empty());
    }

    #[test]
    fn test_zero_chance_places_nothing() {
        let tuning = PhysicsTuning {
            powerup_chance: 0.0,
            ..PhysicsTuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let placed = place_powerups(&mut rng, CANVAS, Vec2::ZERO, Vec2::new(700.0, 500.0), &[], &tuning);
        assert!(placed.is_empty());
    }

    #[test]
    fn test_pickup_within_reach() {
        let ball = Ball::new(Vec2::new(100.0, 100.0));
        let mut powerups = vec![
            Powerup { kind: PowerupKind::Slick, pos: Vec2::new(120.0, 100.0) },
            Powerup { kind: PowerupKind::WideCup, pos: Vec2::new(125.0, 100.0) },
        ];

        let collected = collect_powerups(&ball, &mut powerups, 15.0);
        assert_eq!(collected, vec![PowerupKind::Slick]);
        assert_eq!(powerups.len(), 1);
        assert_eq!(powerups[0].kind, PowerupKind::WideCup);
    }

    #[test]
    fn test_effect_expires_after_duration() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerupKind::WideCup);
        assert_eq!(effects.capture_scale(), WIDE_CUP_SCALE);

        let duration = PowerupKind::WideCup.duration_ticks();
        for _ in 0..duration - 1 {
            assert!(effects.tick().is_empty());
        }
        assert_eq!(effects.tick(), vec![PowerupKind::WideCup]);
        assert_eq!(effects.capture_scale(), 1.0);
        assert!(effects.tick().is_empty());
    }

    #[test]
    fn test_effect_modifiers() {
        let mut effects = ActiveEffects::default();
        assert_eq!(effects.friction(0.98), 0.98);
        assert_eq!(effects.wind_scale(), 1.0);

        effects.activate(PowerupKind::Slick);
        effects.activate(PowerupKind::Featherweight);
        assert_eq!(effects.friction(0.98), SLICK_FRICTION);
        assert_eq!(effects.wind_scale(), 0.0);
    }
}
