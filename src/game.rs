#![warn(clippy::all, clippy::pedantic)]

// Game board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

// Where new pieces are anchored (top-left of the shape's bounding box)
pub const SPAWN_COLUMN: i32 = 4;
pub const SPAWN_ROW: i32 = 0;

// Game timing
pub const TICK_MS: u64 = 500; // Gravity period in milliseconds

// Scoring
pub const POINTS_PER_ROW: u32 = 100;

// Touch / drag gestures
pub const SWIPE_THRESHOLD: f32 = 20.0; // Minimum displacement before a gesture counts as a swipe
pub const GESTURE_UNITS_PER_COLUMN: f32 = 15.0; // A board cell is 30 units wide and two columns on screen
pub const GESTURE_UNITS_PER_ROW: f32 = 30.0;
