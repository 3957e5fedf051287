//! Session state and core simulation types
//!
//! [`GameState`] is the one session context: it owns the ball, the loaded
//! level, weather, powerups, scoring and the RNG. Only `tick` and the level
//! loading below mutate it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::level::{Course, Level};
use super::powerup::{ActiveEffects, Powerup, PowerupKind, place_powerups};
use super::scoring::{Achievement, PlayerRecord, ScoreSink, ScoreboardEntry, SoloSummary};
use super::weather::Weather;
use crate::consts::*;
use crate::error::GolfError;
use crate::tuning::PhysicsTuning;

/// Where the session is in the shot / hole / game cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball at rest, waiting for a shot
    Aiming,
    /// Shot in progress, aiming input ignored
    InFlight,
    /// Ball sunk, waiting for the player to continue
    HoleComplete,
    /// Last hole finished by everyone
    GameComplete,
}

/// A local multiplayer participant as entered on the setup screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub name: String,
    /// Falls back to the player's default colour
    pub color: Option<String>,
}

impl PlayerSetup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }
}

/// Single player or local multiplayer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayMode {
    Solo {
        player_name: String,
        ball_color: Option<String>,
    },
    Multiplayer { players: Vec<PlayerSetup> },
}

impl PlayMode {
    pub fn solo(player_name: impl Into<String>) -> Self {
        PlayMode::Solo {
            player_name: player_name.into(),
            ball_color: None,
        }
    }
}

/// End-of-game results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameSummary {
    Solo(SoloSummary),
    /// Best first; the winner is the first entry
    Multiplayer { scoreboard: Vec<ScoreboardEntry> },
}

/// Things that happened during a tick, for sounds, particles and UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelLoaded { level: usize, par: u32 },
    WeatherChanged(Weather),
    ShotTaken { strokes: u32 },
    /// One per obstacle hit, at the impact point
    Collision { point: Vec2 },
    /// Ball went in the water and was put back at the tee
    HazardEntered { penalty: u32, score: u32 },
    SandSpray { pos: Vec2, color: String },
    PowerupCollected { kind: PowerupKind },
    PowerupExpired { kind: PowerupKind },
    HoleSunk {
        level: usize,
        player: Option<String>,
        strokes: u32,
        par_diff: i32,
        result: String,
    },
    TurnChanged { player: usize, name: String },
    AchievementUnlocked(Achievement),
    GameComplete(GameSummary),
    MuteChanged(bool),
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Canvas size in pixels
    pub canvas: Vec2,
    pub tuning: PhysicsTuning,
    pub course: Course,
    /// Index of the level being played
    pub level_index: usize,
    /// Absolute geometry for `level_index`
    pub level: Level,
    pub ball: Ball,
    pub weather: Weather,
    pub powerups: Vec<Powerup>,
    pub effects: ActiveEffects,
    pub phase: GamePhase,
    /// Strokes taken this session, penalties included
    pub score: u32,
    /// Strokes on the current hole for the player whose turn it is
    pub hole_strokes: u32,
    pub water_hazard_hits: u32,
    /// Ball sunk on the current hole/turn
    pub has_won: bool,
    pub muted: bool,
    pub player_name: String,
    pub scores: ScoreSink,
    pub unlocked: Vec<Achievement>,
    pub summary: Option<GameSummary>,
    pub time_ticks: u64,
    events: Vec<GameEvent>,
    seed: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Start a session on the first level of `course`
    pub fn new(
        course: Course,
        canvas: Vec2,
        mode: PlayMode,
        tuning: PhysicsTuning,
        seed: u64,
    ) -> Result<Self, GolfError> {
        let (player_name, ball_color, scores) = match mode {
            PlayMode::Solo {
                player_name,
                ball_color,
            } => (
                player_name,
                ball_color.unwrap_or_else(|| BALL_COLOR.to_string()),
                ScoreSink::solo(),
            ),
            PlayMode::Multiplayer { players } => {
                if players.is_empty() || players.len() > MAX_PLAYERS {
                    return Err(GolfError::InvalidPlayers {
                        count: players.len(),
                    });
                }
                let records: Vec<PlayerRecord> = players
                    .into_iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let color = p
                            .color
                            .unwrap_or_else(|| PLAYER_COLORS[i % PLAYER_COLORS.len()].to_string());
                        PlayerRecord::new(p.name, color)
                    })
                    .collect();
                let first = records[0].clone();
                (first.name, first.color, ScoreSink::ledger(records))
            }
        };

        let Some(first) = course.get(0) else {
            return Err(GolfError::EmptyCourse);
        };
        let level = Level::from_config(0, first, canvas);
        let mut ball = Ball::new(level.start);
        ball.color = ball_color;

        let mut state = Self {
            canvas,
            tuning,
            course,
            level_index: 0,
            level,
            ball,
            weather: Weather::calm(),
            powerups: Vec::new(),
            effects: ActiveEffects::default(),
            phase: GamePhase::Aiming,
            score: 0,
            hole_strokes: 0,
            water_hazard_hits: 0,
            has_won: false,
            muted: false,
            player_name,
            scores,
            unlocked: Vec::new(),
            summary: None,
            time_ticks: 0,
            events: Vec::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.load_level(0);

        log::info!(
            "New {} session: {} levels, total par {}",
            if state.is_multiplayer() { "multiplayer" } else { "solo" },
            state.course.len(),
            state.course.total_par()
        );
        Ok(state)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_multiplayer(&self) -> bool {
        self.scores.is_multiplayer()
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Distance from the cup at which the ball drops in
    pub fn capture_radius(&self) -> f32 {
        self.ball.radius
            + self.level.hole.radius * self.tuning.capture_factor * self.effects.capture_scale()
    }

    /// Strokes relative to par on the current hole
    pub fn hole_par_diff(&self) -> i32 {
        self.hole_strokes as i32 - self.level.par() as i32
    }

    /// Load level `index`, recomputing its geometry from the canvas size
    ///
    /// Returns false (and changes nothing) if the course has no such level.
    pub fn load_level(&mut self, index: usize) -> bool {
        let Some(config) = self.course.get(index) else {
            log::warn!("Level {} does not exist ({} levels)", index + 1, self.course.len());
            return false;
        };

        self.level = Level::from_config(index, config, self.canvas);
        self.level_index = index;
        self.reset_ball_to_start();
        self.hole_strokes = 0;
        self.phase = GamePhase::Aiming;

        if self.rng.random_bool(self.tuning.weather_change_chance.clamp(0.0, 1.0)) {
            self.weather = Weather::random(&mut self.rng);
            log::info!(
                "Weather: {:?}, wind {:.1} toward {:.0}°",
                self.weather.kind,
                self.weather.wind_force,
                self.weather.wind_direction
            );
            self.events.push(GameEvent::WeatherChanged(self.weather.clone()));
        }

        self.powerups = place_powerups(
            &mut self.rng,
            self.canvas,
            self.ball.pos,
            self.level.hole.pos,
            &[
                self.level.obstacles.as_slice(),
                self.level.water_hazards.as_slice(),
            ],
            &self.tuning,
        );

        log::info!("Loaded hole {} (par {})", index + 1, self.level.par());
        self.events.push(GameEvent::LevelLoaded {
            level: index,
            par: self.level.par(),
        });
        true
    }

    /// Put the ball back on the tee, visible and at rest
    pub fn reset_ball_to_start(&mut self) {
        self.ball.reset_to(self.level.start);
        self.has_won = false;
    }

    /// Restart from the first hole in the same mode, keeping the players
    pub fn restart(&mut self) {
        self.score = 0;
        self.water_hazard_hits = 0;
        self.scores.reset();
        self.effects = ActiveEffects::default();
        self.summary = None;
        if let Some(player) = self.scores.current_player() {
            self.ball.color = player.color.clone();
            self.player_name = player.name.clone();
        }
        self.load_level(0);
        log::info!("Session restarted");
    }

    /// Unlock an achievement once per session
    pub(crate) fn unlock(&mut self, achievement: Achievement) {
        if !self.unlocked.contains(&achievement) {
            log::info!("Achievement unlocked: {}", achievement.id());
            self.unlocked.push(achievement);
            self.events.push(GameEvent::AchievementUnlocked(achievement));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Vec2 = Vec2::new(800.0, 600.0);

    fn solo() -> GameState {
        GameState::new(
            Course::builtin().unwrap(),
            CANVAS,
            PlayMode::solo("Tester"),
            PhysicsTuning::default(),
            42,
        )
        .unwrap()
    }

    #[test]
    fn test_new_session_starts_on_first_tee() {
        let state = solo();
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.level_index, 0);
        assert_eq!(state.ball.pos, state.level.start);
        assert!(state.ball.visible);
        assert_eq!(state.score, 0);
        assert!(!state.is_multiplayer());
        assert!(state
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::LevelLoaded { level: 0, .. })));
    }

    #[test]
    fn test_player_count_validated() {
        let too_many = PlayMode::Multiplayer {
            players: (0..5).map(|i| PlayerSetup::new(format!("P{}", i))).collect(),
        };
        let err = GameState::new(
            Course::builtin().unwrap(),
            CANVAS,
            too_many,
            PhysicsTuning::default(),
            1,
        )
        .unwrap_err();
        assert!(matches!(err, GolfError::InvalidPlayers { count: 5 }));

        let none = PlayMode::Multiplayer { players: vec![] };
        assert!(
            GameState::new(Course::builtin().unwrap(), CANVAS, none, PhysicsTuning::default(), 1)
                .is_err()
        );
    }

    #[test]
    fn test_multiplayer_default_colors() {
        let mode = PlayMode::Multiplayer {
            players: vec![PlayerSetup::new("Ann"), PlayerSetup::new("Bob")],
        };
        let state =
            GameState::new(Course::builtin().unwrap(), CANVAS, mode, PhysicsTuning::default(), 1)
                .unwrap();
        assert_eq!(state.ball.color, PLAYER_COLORS[0]);
        assert_eq!(state.scores.players()[1].color, PLAYER_COLORS[1]);
        assert_eq!(state.player_name, "Ann");
    }

    #[test]
    fn test_load_level_recomputes_geometry() {
        let mut state = solo();
        state.ball.pos = Vec2::new(1.0, 1.0);
        state.ball.visible = false;
        state.has_won = true;
        state.hole_strokes = 4;

        assert!(state.load_level(1));
        let expected = Level::from_config(1, state.course.get(1).unwrap(), CANVAS);
        assert_eq!(state.level, expected);
        assert_eq!(state.ball.pos, expected.start);
        assert!(state.ball.visible);
        assert!(!state.has_won);
        assert_eq!(state.hole_strokes, 0);
    }

    #[test]
    fn test_load_missing_level_is_ignored() {
        let mut state = solo();
        let before = state.level.clone();
        assert!(!state.load_level(99));
        assert_eq!(state.level, before);
        assert_eq!(state.level_index, 0);
    }

    #[test]
    fn test_same_seed_same_level_setup() {
        let mut a = solo();
        let mut b = solo();
        for i in 0..a.course.len() {
            a.load_level(i);
            b.load_level(i);
            assert_eq!(a.powerups, b.powerups);
            assert_eq!(a.weather, b.weather);
        }
    }

    #[test]
    fn test_unlock_once() {
        let mut state = solo();
        state.drain_events();
        state.unlock(Achievement::HoleInOne);
        state.unlock(Achievement::HoleInOne);
        assert_eq!(state.drain_events().len(), 1);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_capture_radius_grows_with_wide_cup() {
        let mut state = solo();
        let base = state.capture_radius();
        assert!((base - (state.ball.radius + state.level.hole.radius * CAPTURE_FACTOR)).abs() < 1e-5);
        state.effects.activate(PowerupKind::WideCup);
        assert!(state.capture_radius() > base);
    }
}
