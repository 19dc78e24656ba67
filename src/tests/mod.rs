#![warn(clippy::all, clippy::pedantic)]

pub mod systems_tests;
pub mod time_tests;

// Import test utilities
#[cfg(test)]
pub mod test_utils {
    use crate::app::App;
    use crate::catalog::{RandomSource, Randomizer};
    use crate::components::{Grid, Piece, PieceColor, Position, Shape};
    use crate::config::Config;
    use bevy_ecs::prelude::*;

    /// Replays a fixed list of picks, cycling when it runs out.
    pub struct ScriptedSource {
        picks: Vec<usize>,
        next: usize,
    }

    impl ScriptedSource {
        #[must_use]
        pub fn new(picks: Vec<usize>) -> Self {
            Self { picks, next: 0 }
        }
    }

    impl RandomSource for ScriptedSource {
        fn index(&mut self, len: usize) -> usize {
            let pick = self.picks[self.next % self.picks.len()];
            self.next += 1;
            pick % len
        }
    }

    // Helper to build an app whose spawns follow `picks`
    // (shape index, then color index, for every spawn)
    #[must_use]
    pub fn create_test_app(picks: Vec<usize>) -> App {
        create_test_app_with_config(Config::default(), picks)
    }

    #[must_use]
    pub fn create_test_app_with_config(config: Config, picks: Vec<usize>) -> App {
        App::with_randomizer(config, Randomizer::new(ScriptedSource::new(picks)))
            .expect("test config should be valid")
    }

    // Helper to parse a shape from rows of '1' and '0'
    #[must_use]
    pub fn shape(rows: &[&str]) -> Shape {
        Shape::from_rows(
            rows.iter()
                .map(|row| row.chars().map(|c| c == '1').collect())
                .collect(),
        )
        .expect("test shape should be rectangular")
    }

    // Replace the active piece with a known one
    pub fn set_active_piece(world: &mut World, piece: Piece, position: Position) {
        let existing: Vec<Entity> = world
            .query_filtered::<Entity, With<Piece>>()
            .iter(world)
            .collect();
        for entity in existing {
            world.despawn(entity);
        }
        world.spawn((piece, position));
    }

    // Fill a whole row except the listed columns
    pub fn fill_row_except(grid: &mut Grid, row: usize, gaps: &[usize], color: PieceColor) {
        for col in 0..grid.columns() {
            if !gaps.contains(&col) {
                grid.lock(row, col, color);
            }
        }
    }

    #[must_use]
    pub fn active_position(world: &mut World) -> Position {
        *world
            .query::<&Position>()
            .iter(world)
            .next()
            .expect("an active piece")
    }

    #[must_use]
    pub fn active_piece(world: &mut World) -> Piece {
        world
            .query::<&Piece>()
            .iter(world)
            .next()
            .expect("an active piece")
            .clone()
    }
}
