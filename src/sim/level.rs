//! Course and level layout
//!
//! Level files describe everything as fractions of the canvas. A [`Level`] is
//! the absolute-pixel version, rebuilt from its [`LevelConfig`] on every load
//! and never carried over to the next hole.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::error::GolfError;

/// The course that ships with the game
const BUILTIN_COURSE: &str = include_str!("../../assets/course.json");

/// Slack for rectangles drawn flush with the canvas edge
const EDGE_TOLERANCE: f32 = 1e-4;

/// A rectangle laid out as fractions of the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectSpec {
    pub x_percent: f32,
    pub y_percent: f32,
    pub width_percent: f32,
    pub height_percent: f32,
    #[serde(default)]
    pub color: String,
}

impl RectSpec {
    pub fn to_rect(&self, canvas: Vec2) -> Rect {
        Rect {
            x: self.x_percent * canvas.x,
            y: self.y_percent * canvas.y,
            width: self.width_percent * canvas.x,
            height: self.height_percent * canvas.y,
            color: self.color.clone(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        let fields = [
            self.x_percent,
            self.y_percent,
            self.width_percent,
            self.height_percent,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err("rectangle has a non-finite value".into());
        }
        if self.width_percent < 0.0 || self.height_percent < 0.0 {
            return Err("rectangle has a negative size".into());
        }
        let on_canvas = |start: f32, extent: f32| {
            (0.0..=1.0).contains(&start) && start + extent <= 1.0 + EDGE_TOLERANCE
        };
        if !on_canvas(self.x_percent, self.width_percent)
            || !on_canvas(self.y_percent, self.height_percent)
        {
            return Err(format!(
                "rectangle at ({}, {}) sized {}x{} leaves the canvas",
                self.x_percent, self.y_percent, self.width_percent, self.height_percent
            ));
        }
        Ok(())
    }
}

/// Course colours for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub background: String,
    pub border_color: String,
}

/// Static description of one hole, as stored in level files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub start_x_percent: f32,
    pub start_y_percent: f32,
    pub hole_x_percent: f32,
    pub hole_y_percent: f32,
    /// Pixels
    pub hole_radius: f32,
    #[serde(default = "default_hole_color")]
    pub hole_color: String,
    pub par: u32,
    #[serde(default)]
    pub obstacles: Vec<RectSpec>,
    #[serde(default)]
    pub water_hazards: Vec<RectSpec>,
    #[serde(default)]
    pub sand_bunkers: Vec<RectSpec>,
    #[serde(default)]
    pub theme: Option<Theme>,
}

fn default_hole_color() -> String {
    "#000000".to_string()
}

impl LevelConfig {
    /// Check that this level can be played
    pub fn validate(&self, index: usize) -> Result<(), GolfError> {
        let invalid = |reason: String| GolfError::InvalidLevel { index, reason };

        if self.par == 0 {
            return Err(invalid("par must be at least 1".into()));
        }
        if !(self.hole_radius.is_finite() && self.hole_radius > 0.0) {
            return Err(invalid(format!("hole radius {} is not positive", self.hole_radius)));
        }
        let points = [
            ("start", self.start_x_percent, self.start_y_percent),
            ("hole", self.hole_x_percent, self.hole_y_percent),
        ];
        for (name, x, y) in points {
            if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
                return Err(invalid(format!("{} position ({}, {}) is off the canvas", name, x, y)));
            }
        }
        let rects = self
            .obstacles
            .iter()
            .chain(&self.water_hazards)
            .chain(&self.sand_bunkers);
        for rect in rects {
            rect.validate().map_err(invalid)?;
        }
        Ok(())
    }
}

/// The cup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub pos: Vec2,
    pub radius: f32,
    pub color: String,
    pub par: u32,
}

/// A loaded level in absolute canvas coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub index: usize,
    pub start: Vec2,
    pub hole: Hole,
    pub obstacles: Vec<Rect>,
    pub water_hazards: Vec<Rect>,
    pub sand_bunkers: Vec<Rect>,
    pub theme: Option<Theme>,
}

impl Level {
    /// Derive absolute geometry for a canvas of the given size
    pub fn from_config(index: usize, config: &LevelConfig, canvas: Vec2) -> Self {
        Self {
            index,
            start: Vec2::new(
                config.start_x_percent * canvas.x,
                config.start_y_percent * canvas.y,
            ),
            hole: Hole {
                pos: Vec2::new(
                    config.hole_x_percent * canvas.x,
                    config.hole_y_percent * canvas.y,
                ),
                radius: config.hole_radius,
                color: config.hole_color.clone(),
                par: config.par,
            },
            obstacles: to_rects(&config.obstacles, canvas),
            water_hazards: to_rects(&config.water_hazards, canvas),
            sand_bunkers: to_rects(&config.sand_bunkers, canvas),
            theme: config.theme.clone(),
        }
    }

    pub fn par(&self) -> u32 {
        self.hole.par
    }
}

fn to_rects(specs: &[RectSpec], canvas: Vec2) -> Vec<Rect> {
    specs.iter().map(|s| s.to_rect(canvas)).collect()
}

/// An ordered list of holes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Course {
    levels: Vec<LevelConfig>,
}

impl Course {
    /// Build a course, rejecting empty or unplayable level lists
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, GolfError> {
        if levels.is_empty() {
            return Err(GolfError::EmptyCourse);
        }
        for (i, level) in levels.iter().enumerate() {
            level.validate(i)?;
        }
        Ok(Self { levels })
    }

    /// Parse a JSON array of levels (level files, editor test levels)
    pub fn from_json(json: &str) -> Result<Self, GolfError> {
        let levels: Vec<LevelConfig> =
            serde_json::from_str(json).map_err(GolfError::InvalidLevelData)?;
        Self::new(levels)
    }

    /// A single-level course, as used when testing a level from the editor
    pub fn single_level_from_json(json: &str) -> Result<Self, GolfError> {
        let level: LevelConfig =
            serde_json::from_str(json).map_err(GolfError::InvalidLevelData)?;
        Self::new(vec![level])
    }

    /// The built-in course
    pub fn builtin() -> Result<Self, GolfError> {
        Self::from_json(BUILTIN_COURSE)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelConfig> {
        self.levels.get(index)
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.levels.len()
    }

    /// Sum of every hole's par
    pub fn total_par(&self) -> u32 {
        self.levels.iter().map(|l| l.par).sum()
    }

    pub fn levels(&self) -> &[LevelConfig] {
        &self.levels
    }
}
