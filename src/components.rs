#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Cyan,
    Orange,
}

impl PieceColor {
    #[must_use]
    pub fn get_color(self) -> ratatui::style::Color {
        match self {
            PieceColor::Red => ratatui::style::Color::Red,
            PieceColor::Blue => ratatui::style::Color::Blue,
            PieceColor::Green => ratatui::style::Color::Green,
            PieceColor::Yellow => ratatui::style::Color::Yellow,
            PieceColor::Purple => ratatui::style::Color::Magenta,
            PieceColor::Cyan => ratatui::style::Color::Cyan,
            PieceColor::Orange => ratatui::style::Color::LightRed,
        }
    }
}

/// A rectangular arrangement of filled and empty cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    cells: Vec<Vec<bool>>,
}

impl Shape {
    /// Builds a shape from its rows. Returns `None` for an empty or ragged
    /// arrangement, so every `Shape` in the game is rectangular.
    #[must_use]
    pub fn from_rows(cells: Vec<Vec<bool>>) -> Option<Self> {
        let width = cells.first().map(Vec::len)?;
        if width == 0 || cells.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self { cells })
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.cells[0].len()
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<bool>] {
        &self.cells
    }

    /// Clockwise quarter turn around the shape's own bounding box
    /// (transpose, then reverse each resulting row).
    #[must_use]
    pub fn rotated(&self) -> Self {
        let height = self.height();
        let cells = (0..self.width())
            .map(|col| (0..height).rev().map(|row| self.cells[row][col]).collect())
            .collect();
        Self { cells }
    }

    /// Offsets `(row, col)` of every filled cell, relative to the top-left anchor.
    pub fn filled_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(col, _)| (row as i32, col as i32))
        })
    }
}

/// Top-left anchor of a piece in grid coordinates. `y` may be negative while
/// the piece is still partly above the visible board.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub shape: Shape,
    pub color: PieceColor,
}

impl Piece {
    #[must_use]
    pub fn new(shape: Shape, color: PieceColor) -> Self {
        Self { shape, color }
    }

    /// Absolute `(row, col)` grid coordinates of the piece's filled cells.
    pub fn cells_at(&self, position: Position) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_cells()
            .map(move |(row, col)| (position.y + row, position.x + col))
    }
}

/// Locked blocks, stored row-major with row 0 at the top.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Vec<Option<PieceColor>>>,
}

impl Grid {
    #[must_use]
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![vec![None; columns]; rows],
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[Option<PieceColor>] {
        &self.cells[row]
    }

    /// Color of the locked block at `(row, col)`; `None` when empty or off the board.
    #[must_use]
    pub fn cell(&self, row: i32, col: i32) -> Option<PieceColor> {
        if row < 0 || col < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|cells| cells.get(col as usize))
            .copied()
            .flatten()
    }

    #[must_use]
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        self.cell(row, col).is_some()
    }

    #[cfg(test)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|row| row.iter().all(Option::is_none))
    }

    /// Writes a locked block. Callers must keep `row` on the board; a write
    /// above the top is game-over, not a grid mutation.
    pub fn lock(&mut self, row: usize, col: usize, color: PieceColor) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|cells| cells.get_mut(col)) {
            *cell = Some(color);
        }
    }

    /// Removes every full row in one pass, keeping the remaining rows in
    /// order, and tops the grid back up with empty rows.
    /// Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> usize {
        let before = self.cells.len();
        self.cells.retain(|row| !row.iter().all(Option::is_some));
        let cleared = before - self.cells.len();

        let columns = self.columns;
        self.cells
            .splice(0..0, std::iter::repeat_n(vec![None; columns], cleared));

        cleared
    }

    /// Collision oracle: would `shape`, anchored at `position` shifted by
    /// `(dx, dy)`, leave the board sideways or through the floor, or overlap
    /// a locked block? Cells above the top row never collide with the grid.
    #[must_use]
    pub fn collides(&self, position: Position, dx: i32, dy: i32, shape: &Shape) -> bool {
        shape.filled_cells().any(|(row, col)| {
            let x = position.x + col + dx;
            let y = position.y + row + dy;

            x < 0
                || x >= self.columns as i32
                || y >= self.rows as i32
                || (y >= 0 && self.is_occupied(y, x))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

#[derive(Debug, Resource, Clone)]
pub struct GameState {
    pub score: u32,
    pub lines_cleared: u32,
    pub pieces_locked: u32,
    pub run_state: RunState,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0,
            lines_cleared: 0,
            pieces_locked: 0,
            run_state: RunState::Running,
        }
    }
}

impl GameState {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn award_rows(&mut self, rows_cleared: usize, points_per_row: u32) {
        let rows = u32::try_from(rows_cleared).unwrap_or(u32::MAX);
        self.score = self
            .score
            .saturating_add(rows.saturating_mul(points_per_row));
        self.lines_cleared = self.lines_cleared.saturating_add(rows);
    }
}

/// Engine parameters that stay fixed for one game.
#[derive(Debug, Resource, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub spawn: Position,
    pub points_per_row: u32,
    /// End the game as soon as a piece spawns on top of locked blocks,
    /// instead of waiting for a lock above the board.
    pub end_on_blocked_spawn: bool,
}

/// Result of a single engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied,
    /// The move would collide; state is unchanged.
    Rejected,
    Locked { rows_cleared: usize },
    GameOver { final_score: u32 },
    /// The engine is stopped (or has no active piece).
    Inactive,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOver {
    pub final_score: u32,
}
