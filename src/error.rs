//! Errors for the paths that cannot proceed with bad input
//!
//! Physics never fails; only course data, player setup and tuning files can.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GolfError {
    #[error("Invalid level data: {0}")]
    InvalidLevelData(#[source] serde_json::Error),

    #[error("Course has no levels")]
    EmptyCourse,

    #[error("Level {index} is invalid: {reason}")]
    InvalidLevel { index: usize, reason: String },

    #[error("Invalid player count: {count} (expected 1 to {max})", max = crate::consts::MAX_PLAYERS)]
    InvalidPlayers { count: usize },

    #[error("Invalid tuning data: {0}")]
    InvalidTuning(#[source] serde_json::Error),

    #[error("Tuning value {field} = {value} is out of range ({expected})")]
    TuningOutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

impl GolfError {
    /// Errors caused by the level editor / test-level path
    pub fn is_level_error(&self) -> bool {
        matches!(
            self,
            GolfError::InvalidLevelData(_) | GolfError::EmptyCourse | GolfError::InvalidLevel { .. }
        )
    }
}
