//! Per-frame simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One tick per animation frame, run to completion
//! - Seeded RNG only
//! - Stable iteration order (level data order)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod hazards;
pub mod level;
pub mod powerup;
pub mod scoring;
pub mod state;
pub mod tick;
pub mod weather;

pub use ball::Ball;
pub use collision::{Rect, handle_collisions, resolve_circle_rect_collision};
pub use hazards::{SandContact, apply_sand_bunkers, find_water_hazard};
pub use level::{Course, Hole, Level, LevelConfig, RectSpec, Theme};
pub use powerup::{ActiveEffects, Powerup, PowerupKind};
pub use scoring::{
    Achievement, HoleScore, PlayerRecord, ScoreSink, ScoreboardEntry, SoloSummary,
    par_result_text,
};
pub use state::{GameEvent, GamePhase, GameState, GameSummary, PlayMode, PlayerSetup};
pub use tick::{Shot, TickInput, tick};
pub use weather::{Weather, WeatherKind};
