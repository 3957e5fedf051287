//! Per-frame simulation tick
//!
//! Core game loop: one call per animation frame. Physics only runs while a
//! shot is in flight; the terminal checks (water, hole, rest) decide where the
//! turn goes next.

use glam::Vec2;

use super::collision::handle_collisions;
use super::hazards::{apply_sand_bunkers, find_water_hazard};
use super::powerup::collect_powerups;
use super::scoring::{Achievement, HoleScore, SoloSummary, par_result_text};
use super::state::{GameEvent, GamePhase, GameState, GameSummary};

/// A committed shot: aim point and slider power
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Canvas point the player clicked; sets the direction only
    pub target: Vec2,
    /// Power slider value, clamped to the tuning range
    pub power: f32,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Hit the ball (ignored unless aiming)
    pub shot: Option<Shot>,
    /// Continue after the hole-complete screen
    pub advance: bool,
    /// Restart the session from the first hole
    pub reset: bool,
    /// Mute toggle
    pub toggle_mute: bool,
    /// Jump to a level (level select)
    pub load_level: Option<usize>,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.toggle_mute {
        state.muted = !state.muted;
        state.push_event(GameEvent::MuteChanged(state.muted));
    }

    if input.reset {
        state.restart();
        return;
    }

    if let Some(index) = input.load_level {
        if can_select_level(state) {
            if state.load_level(index) {
                return;
            }
        } else {
            log::warn!("Ignoring level select during {:?}", state.phase);
        }
    }

    state.time_ticks += 1;

    for kind in state.effects.tick() {
        log::debug!("{} wore off", kind.name());
        state.push_event(GameEvent::PowerupExpired { kind });
    }

    match state.phase {
        GamePhase::Aiming => {
            if let Some(shot) = input.shot {
                commit_shot(state, shot);
            }
        }
        GamePhase::InFlight => step_shot(state),
        GamePhase::HoleComplete => {
            if input.advance {
                advance_after_hole(state);
            }
        }
        GamePhase::GameComplete => {}
    }
}

/// Level select never interrupts a shot or a multiplayer rotation
fn can_select_level(state: &GameState) -> bool {
    if state.is_multiplayer() {
        state.phase == GamePhase::Aiming && state.scores.current_index() == 0
    } else {
        matches!(state.phase, GamePhase::Aiming | GamePhase::HoleComplete)
    }
}

/// Aiming -> InFlight. The stroke counts as soon as the ball is hit.
fn commit_shot(state: &mut GameState, shot: Shot) {
    if !state.ball.visible {
        log::warn!("Shot ignored: ball is not on the course");
        return;
    }

    let speed = state.tuning.shot_speed(shot.power);
    state.ball.strike(shot.target, speed);
    state.score += 1;
    state.hole_strokes += 1;
    state.phase = GamePhase::InFlight;

    log::debug!(
        "Stroke {} on hole {}: speed {:.1}, angle {:.2}",
        state.hole_strokes,
        state.level_index + 1,
        speed,
        state.ball.angle
    );
    state.push_event(GameEvent::ShotTaken {
        strokes: state.hole_strokes,
    });
}

/// One physics step of a shot in flight
fn step_shot(state: &mut GameState) {
    let friction = state.effects.friction(state.tuning.friction);
    state
        .ball
        .integrate(state.canvas, friction, state.tuning.wall_restitution);

    // --- OBSTACLES ---
    let mut impacts = Vec::new();
    let collided = handle_collisions(
        &mut state.ball,
        &state.level.obstacles,
        state.tuning.collision_damping,
        |point| impacts.push(point),
    );
    if collided {
        state.ball.speed *= state.tuning.collision_tick_penalty;
    }
    for point in impacts {
        state.push_event(GameEvent::Collision { point });
    }

    // --- WATER / SAND ---
    if find_water_hazard(state.ball.pos, &state.level.water_hazards).is_some() {
        enter_water(state);
        return;
    }
    if let Some(contact) = apply_sand_bunkers(
        &mut state.ball,
        &state.level.sand_bunkers,
        &state.tuning,
        &mut state.rng,
    ) {
        if contact.spray {
            let color = state.level.sand_bunkers[contact.index].color.clone();
            let pos = state.ball.pos;
            state.push_event(GameEvent::SandSpray { pos, color });
        }
    }

    // --- WIND ---
    state.weather.update();
    let wind = state.tuning.wind_strength * state.effects.wind_scale();
    state.weather.apply_to_ball(&mut state.ball, wind);

    // --- HOLE ---
    if state.is_captured() {
        sink_ball(state);
        return;
    }

    // --- REST ---
    if state.ball.settle(state.tuning.stop_threshold) {
        state.phase = GamePhase::Aiming;
        log::trace!("Ball at rest at ({:.0}, {:.0})", state.ball.pos.x, state.ball.pos.y);
        return;
    }

    // --- POWERUPS ---
    if state.ball.visible {
        for kind in collect_powerups(&state.ball, &mut state.powerups, state.tuning.pickup_radius) {
            log::info!("{} {} activated", kind.icon(), kind.name());
            state.effects.activate(kind);
            state.push_event(GameEvent::PowerupCollected { kind });
        }
    }
}

/// Penalty stroke and back to the tee; the shot ends here
fn enter_water(state: &mut GameState) {
    state.score += 1;
    state.hole_strokes += 1;
    state.water_hazard_hits += 1;

    let start = state.level.start;
    state.ball.reset_to(start);
    state.phase = GamePhase::Aiming;

    log::info!("Water hazard! +1 stroke penalty (score {})", state.score);
    if state.water_hazard_hits == 1 {
        state.unlock(Achievement::WaterHazard);
    }
    state.push_event(GameEvent::HazardEntered {
        penalty: 1,
        score: state.score,
    });
}

/// InFlight -> HoleComplete. Records the hole on the session's score track.
fn sink_ball(state: &mut GameState) {
    state.has_won = true;
    state.ball.visible = false;
    state.ball.speed = 0.0;
    state.phase = GamePhase::HoleComplete;

    let hole = HoleScore::new(state.level_index, state.hole_strokes, state.level.par());
    state.scores.record_hole(hole);
    if hole.is_hole_in_one() {
        state.unlock(Achievement::HoleInOne);
    }

    let player = state.scores.current_player().map(|p| p.name.clone());
    let result = par_result_text(hole.par_diff);
    log::info!(
        "Hole {} complete{}: {} strokes, {}",
        state.level_index + 1,
        player.as_deref().map(|n| format!(" by {}", n)).unwrap_or_default(),
        hole.strokes,
        result
    );
    state.push_event(GameEvent::HoleSunk {
        level: state.level_index,
        player,
        strokes: hole.strokes,
        par_diff: hole.par_diff,
        result,
    });
}

/// HoleComplete -> next player, next level, or the end of the game
fn advance_after_hole(state: &mut GameState) {
    let everyone_done = state.scores.advance_turn();
    if everyone_done && state.course.is_last(state.level_index) {
        finish_game(state);
        return;
    }

    if state.is_multiplayer() {
        state.hole_strokes = 0;
        state.reset_ball_to_start();
        state.phase = GamePhase::Aiming;
        if let Some(player) = state.scores.current_player() {
            let (name, color) = (player.name.clone(), player.color.clone());
            let index = state.scores.current_index();
            log::info!("{}'s turn", name);
            state.ball.color = color;
            state.player_name = name.clone();
            state.push_event(GameEvent::TurnChanged {
                player: index,
                name,
            });
        }
    }

    if everyone_done {
        state.load_level(state.level_index + 1);
    }
}

fn finish_game(state: &mut GameState) {
    let summary = if state.is_multiplayer() {
        GameSummary::Multiplayer {
            scoreboard: state.scores.scoreboard(),
        }
    } else {
        let solo = SoloSummary::new(
            state.score,
            state.course.total_par(),
            state.scores.history(),
            state.water_hazard_hits,
        );
        for achievement in solo.achievements() {
            state.unlock(achievement);
        }
        GameSummary::Solo(solo)
    };

    match &summary {
        GameSummary::Solo(s) => log::info!(
            "Round complete: {} strokes, par {} ({})",
            s.total_score,
            s.total_par,
            par_result_text(s.par_diff)
        ),
        GameSummary::Multiplayer { scoreboard } => {
            if let Some(winner) = scoreboard.first() {
                log::info!("Game complete: {} wins ({:+})", winner.name, winner.par_total);
            }
        }
    }

    state.ball.visible = false;
    state.phase = GamePhase::GameComplete;
    state.summary = Some(summary.clone());
    state.push_event(GameEvent::GameComplete(summary));
}

impl GameState {
    /// Whether the ball is close enough to the cup to drop in
    pub fn is_captured(&self) -> bool {
        !self.has_won && self.ball.distance_to(self.level.hole.pos) < self.capture_radius()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Course;
    use crate::sim::state::PlayMode;
    use crate::tuning::PhysicsTuning;

    const CANVAS: Vec2 = Vec2::new(800.0, 600.0);

    fn calm_tuning() -> PhysicsTuning {
        PhysicsTuning {
            weather_change_chance: 0.0,
            powerup_chance: 0.0,
            ..PhysicsTuning::default()
        }
    }

    fn open_course() -> Course {
        Course::single_level_from_json(
            r#"{ "startXPercent": 0.1, "startYPercent": 0.5,
                 "holeXPercent": 0.9, "holeYPercent": 0.5,
                 "holeRadius": 15, "par": 3 }"#,
        )
        .unwrap()
    }

    fn solo_state() -> GameState {
        GameState::new(open_course(), CANVAS, PlayMode::solo("Tester"), calm_tuning(), 5).unwrap()
    }

    fn shoot(state: &mut GameState, target: Vec2, power: f32) {
        let input = TickInput {
            shot: Some(Shot { target, power }),
            ..Default::default()
        };
        tick(state, &input);
    }

    fn run_shot(state: &mut GameState) {
        let mut guard = 0;
        while state.phase == GamePhase::InFlight {
            tick(state, &TickInput::default());
            guard += 1;
            assert!(guard < 5_000, "shot never ended");
        }
    }

    #[test]
    fn test_shot_counts_stroke_at_hit_time() {
        let mut state = solo_state();
        shoot(&mut state, Vec2::new(80.0, 0.0), 1.0);

        assert_eq!(state.phase, GamePhase::InFlight);
        assert_eq!(state.score, 1);
        assert_eq!(state.hole_strokes, 1);
        assert!((state.ball.speed - 2.0).abs() < 0.0001);
    }

    #[test]
    fn test_shot_ignored_while_in_flight() {
        let mut state = solo_state();
        shoot(&mut state, Vec2::new(80.0, 0.0), 1.0);
        shoot(&mut state, Vec2::new(720.0, 300.0), 10.0);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_short_shot_comes_to_rest() {
        let mut state = solo_state();
        shoot(&mut state, Vec2::new(80.0, 0.0), 1.0);
        run_shot(&mut state);

        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.ball.speed, 0.0);
        assert!(state.ball.visible);
        assert!(state.ball.pos.y < 300.0);
    }

    #[test]
    fn test_slow_ball_stops_in_one_tick() {
        let mut state = solo_state();
        state.phase = GamePhase::InFlight;
        state.ball.speed = 0.04;
        state.ball.angle = 1.3;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.ball.speed, 0.0);
        assert_eq!(state.phase, GamePhase::Aiming);
    }

    #[test]
    fn test_obstacle_hit_in_tick_stacks_penalty() {
        let course = Course::single_level_from_json(
            r#"{ "startXPercent": 0.1, "startYPercent": 0.5,
                 "holeXPercent": 0.9, "holeYPercent": 0.1,
                 "holeRadius": 15, "par": 3,
                 "obstacles": [{ "xPercent": 0.5, "yPercent": 0.25, "widthPercent": 0.05, "heightPercent": 0.5 }] }"#,
        )
        .unwrap();
        let tuning = PhysicsTuning {
            friction: 1.0,
            ..calm_tuning()
        };
        let mut state = GameState::new(course, CANVAS, PlayMode::solo("T"), tuning, 1).unwrap();
        state.drain_events();
        state.phase = GamePhase::InFlight;
        state.ball.pos = Vec2::new(387.0, 300.0);
        state.ball.angle = 0.0;
        state.ball.speed = 5.0;

        tick(&mut state, &TickInput::default());
        assert!((state.ball.speed - 5.0 * 0.8 * 0.95).abs() < 0.001);
        assert_eq!(state.ball.pos.x, 400.0 - state.ball.radius - 1.0);
        let hits = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Collision { .. }))
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_capture_threshold() {
        let mut state = solo_state();
        let hole = state.level.hole.pos;
        let threshold = state.ball.radius + state.level.hole.radius * 0.8;

        state.ball.pos = hole + Vec2::new(threshold - 0.01, 0.0);
        assert!(state.is_captured());
        state.ball.pos = hole + Vec2::new(threshold + 0.01, 0.0);
        assert!(!state.is_captured());
        state.ball.pos = hole + Vec2::new(0.0, threshold + 0.01);
        assert!(!state.is_captured());
    }

    #[test]
    fn test_sunk_ball_hidden_and_recorded() {
        let mut state = solo_state();
        let hole = state.level.hole.pos;
        shoot(&mut state, hole, 10.0);
        run_shot(&mut state);

        assert_eq!(state.phase, GamePhase::HoleComplete);
        assert!(!state.ball.visible);
        assert!(state.has_won);
        assert_eq!(state.scores.history().len(), 1);
        assert_eq!(state.scores.history()[0].par_diff, -2);
        assert!(state.unlocked.contains(&Achievement::HoleInOne));
    }

    #[test]
    fn test_shot_rejected_when_ball_hidden() {
        let mut state = solo_state();
        state.ball.visible = false;
        shoot(&mut state, Vec2::new(720.0, 300.0), 5.0);
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_mute_toggle_has_no_physics_effect() {
        let mut state = solo_state();
        state.drain_events();
        let before = state.ball.clone();
        tick(
            &mut state,
            &TickInput {
                toggle_mute: true,
                ..Default::default()
            },
        );
        assert!(state.muted);
        assert_eq!(state.ball, before);
        assert_eq!(state.drain_events(), vec![GameEvent::MuteChanged(true)]);
    }

    #[test]
    fn test_level_select_ignored_mid_shot() {
        let course = Course::builtin().unwrap();
        let mut state =
            GameState::new(course, CANVAS, PlayMode::solo("T"), calm_tuning(), 3).unwrap();
        shoot(&mut state, Vec2::new(700.0, 300.0), 3.0);
        tick(
            &mut state,
            &TickInput {
                load_level: Some(2),
                ..Default::default()
            },
        );
        assert_eq!(state.level_index, 0);

        run_shot(&mut state);
        if state.phase == GamePhase::Aiming {
            tick(
                &mut state,
                &TickInput {
                    load_level: Some(2),
                    ..Default::default()
                },
            );
            assert_eq!(state.level_index, 2);
            assert_eq!(state.ball.pos, state.level.start);
        }
    }

    #[test]
    fn test_powerup_timer_runs_between_shots() {
        let mut state = solo_state();
        state.effects.activate(crate::sim::PowerupKind::Slick);
        state.drain_events();
        for _ in 0..crate::sim::PowerupKind::Slick.duration_ticks() {
            tick(&mut state, &TickInput::default());
        }
        assert!(!state.effects.is_active(crate::sim::PowerupKind::Slick));
        assert!(state.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::PowerupExpired {
                kind: crate::sim::PowerupKind::Slick
            }
        )));
    }
}
