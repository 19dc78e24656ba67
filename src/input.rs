#![warn(clippy::all, clippy::pedantic)]

use crossterm::event::KeyCode;

use crate::game::{GESTURE_UNITS_PER_COLUMN, GESTURE_UNITS_PER_ROW};

/// Logical player actions the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
}

#[must_use]
pub fn command_for_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Left | KeyCode::Char('a') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') => Some(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('s') => Some(Command::SoftDrop),
        KeyCode::Up | KeyCode::Char('w' | ' ') => Some(Command::Rotate),
        _ => None,
    }
}

/// Turns a press/release displacement into a command.
///
/// Anything within `threshold` on both axes is a tap and rotates. Otherwise
/// the dominant axis decides: horizontal swipes move, a downward swipe drops
/// and an upward swipe rotates.
#[must_use]
pub fn classify_swipe(dx: f32, dy: f32, threshold: f32) -> Option<Command> {
    if dx.abs() <= threshold && dy.abs() <= threshold {
        return Some(Command::Rotate);
    }

    if dx.abs() > dy.abs() {
        if dx > threshold {
            Some(Command::MoveRight)
        } else if dx < -threshold {
            Some(Command::MoveLeft)
        } else {
            None
        }
    } else if dy > threshold {
        Some(Command::SoftDrop)
    } else {
        Some(Command::Rotate)
    }
}

/// Pairs a pointer press with its release. Terminal cells are scaled to
/// gesture units so the swipe threshold means the same as on a touch canvas.
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchTracker {
    start: Option<(f32, f32)>,
}

impl TouchTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, column: u16, row: u16) {
        self.start = Some(to_gesture_units(column, row));
    }

    /// Completes a gesture. A release without a matching press yields nothing.
    pub fn end(&mut self, column: u16, row: u16, threshold: f32) -> Option<Command> {
        let (start_x, start_y) = self.start.take()?;
        let (end_x, end_y) = to_gesture_units(column, row);
        classify_swipe(end_x - start_x, end_y - start_y, threshold)
    }

    #[cfg(test)]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }
}

fn to_gesture_units(column: u16, row: u16) -> (f32, f32) {
    (
        f32::from(column) * GESTURE_UNITS_PER_COLUMN,
        f32::from(row) * GESTURE_UNITS_PER_ROW,
    )
}
