pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::catalog::Catalog;
use crate::components::{Grid, PieceColor, Position, Rules, Shape};
use crate::game::{
    BOARD_HEIGHT, BOARD_WIDTH, POINTS_PER_ROW, SPAWN_COLUMN, SPAWN_ROW, SWIPE_THRESHOLD, TICK_MS,
};
use loader::ConfigError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub board: BoardConfig,
    pub timing: TimingConfig,
    pub scoring: ScoringConfig,
    pub input: InputConfig,
    pub pieces: PiecesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: usize,
    pub columns: usize,
    pub spawn_column: i32,
    pub spawn_row: i32,
    // Off by default: an overlapping spawn is only caught when it locks
    pub end_on_blocked_spawn: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: BOARD_HEIGHT,
            columns: BOARD_WIDTH,
            spawn_column: SPAWN_COLUMN,
            spawn_row: SPAWN_ROW,
            end_on_blocked_spawn: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub tick_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { tick_ms: TICK_MS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub points_per_row: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_row: POINTS_PER_ROW,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub swipe_threshold: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: SWIPE_THRESHOLD,
        }
    }
}

// A catalog shape written as rows of `1` (filled) and `0` (empty)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeConfig {
    pub name: String,
    pub rows: Vec<String>,
}

impl ShapeConfig {
    fn new(name: &str, rows: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            rows: rows.iter().map(ToString::to_string).collect(),
        }
    }

    /// Parses the rows into a shape. `#` and `.` are accepted as aliases of
    /// `1` and `0`.
    pub fn to_shape(&self) -> Result<Shape, ConfigError> {
        let mut cells = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let parsed = row
                .chars()
                .map(|c| match c {
                    '1' | '#' => Ok(true),
                    '0' | '.' => Ok(false),
                    other => Err(ConfigError::Invalid(format!(
                        "shape '{}' has unknown cell '{other}'",
                        self.name
                    ))),
                })
                .collect::<Result<Vec<bool>, _>>()?;
            cells.push(parsed);
        }

        let shape = Shape::from_rows(cells).ok_or_else(|| {
            ConfigError::Invalid(format!("shape '{}' must be a non-empty rectangle", self.name))
        })?;

        if shape.filled_cells().next().is_none() {
            return Err(ConfigError::Invalid(format!(
                "shape '{}' has no filled cells",
                self.name
            )));
        }

        Ok(shape)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PiecesConfig {
    // Fixed seed for reproducible spawn sequences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub colors: Vec<PieceColor>,
    pub shapes: Vec<ShapeConfig>,
}

impl Default for PiecesConfig {
    fn default() -> Self {
        // L and J are deliberately absent from the default set
        Self {
            seed: None,
            colors: vec![
                PieceColor::Red,
                PieceColor::Blue,
                PieceColor::Green,
                PieceColor::Yellow,
                PieceColor::Purple,
            ],
            shapes: vec![
                ShapeConfig::new("I", &["1111"]),
                ShapeConfig::new("O", &["11", "11"]),
                ShapeConfig::new("T", &["010", "111"]),
                ShapeConfig::new("Z", &["110", "011"]),
                ShapeConfig::new("S", &["011", "110"]),
            ],
        }
    }
}

impl PiecesConfig {
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        let shapes = self
            .shapes
            .iter()
            .map(ShapeConfig::to_shape)
            .collect::<Result<Vec<_>, _>>()?;

        Catalog::new(shapes, self.colors.clone()).ok_or_else(|| {
            ConfigError::Invalid("piece catalog needs at least one shape and one color".into())
        })
    }
}

impl Config {
    /// Checks that a game can be built from this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.rows == 0 || self.board.columns == 0 {
            return Err(ConfigError::Invalid(
                "board needs at least one row and one column".into(),
            ));
        }
        if self.timing.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be positive".into()));
        }
        if !self.input.swipe_threshold.is_finite() || self.input.swipe_threshold < 0.0 {
            return Err(ConfigError::Invalid(
                "swipe_threshold must be a non-negative number".into(),
            ));
        }
        if self.board.spawn_column < 0 {
            return Err(ConfigError::Invalid(
                "spawn_column must not be negative".into(),
            ));
        }

        let columns = i64::try_from(self.board.columns).unwrap_or(i64::MAX);
        let rows = i64::try_from(self.board.rows).unwrap_or(i64::MAX);
        for (config, shape) in self.pieces.shapes.iter().zip(self.pieces.catalog()?.shapes()) {
            let right = i64::from(self.board.spawn_column) + shape.width() as i64;
            let bottom = i64::from(self.board.spawn_row) + shape.height() as i64;
            if right > columns || bottom > rows {
                return Err(ConfigError::Invalid(format!(
                    "shape '{}' does not fit the board at the spawn position",
                    config.name
                )));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        Grid::new(self.board.rows, self.board.columns)
    }

    #[must_use]
    pub fn rules(&self) -> Rules {
        Rules {
            spawn: Position {
                x: self.board.spawn_column,
                y: self.board.spawn_row,
            },
            points_per_row: self.scoring.points_per_row,
            end_on_blocked_spawn: self.board.end_on_blocked_spawn,
        }
    }

    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.timing.tick_ms)
    }
}
