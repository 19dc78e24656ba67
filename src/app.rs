#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::event::Events;
use bevy_ecs::prelude::*;
use log::info;
use std::time::Duration;

use crate::Time;
use crate::catalog::Randomizer;
use crate::components::{GameOver, GameState, Grid, MoveOutcome, PieceColor, Position};
use crate::config::Config;
use crate::config::loader::ConfigError;
use crate::input::{Command, TouchTracker};
use crate::scheduler::GravityTimer;
use crate::systems::{active_piece, apply_command, game_tick_system, spawn_piece};

pub struct App {
    pub world: World,
    pub config: Config,
    pub should_quit: bool,
    pub touch: TouchTracker,
    final_score: Option<u32>,
}

impl App {
    /// Builds a fresh game. Spawns are seeded from `pieces.seed` when set.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let randomizer = match config.pieces.seed {
            Some(seed) => Randomizer::seeded(seed),
            None => Randomizer::from_entropy(),
        };
        Self::with_randomizer(config, randomizer)
    }

    pub fn with_randomizer(config: Config, randomizer: Randomizer) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = World::new();
        world.insert_resource(Time::new());
        world.insert_resource(GameState::default());
        world.insert_resource(config.grid());
        world.insert_resource(config.rules());
        world.insert_resource(config.pieces.catalog()?);
        world.insert_resource(randomizer);
        world.insert_resource(GravityTimer::new(config.tick_period()));
        world.init_resource::<Events<GameOver>>();

        let mut app = Self {
            world,
            config,
            should_quit: false,
            touch: TouchTracker::new(),
            final_score: None,
        };

        // Spawn initial piece
        spawn_piece(&mut app.world);
        app.poll_game_over();

        Ok(app)
    }

    /// Locked blocks plus the on-board cells of the active piece.
    pub fn get_render_blocks(&mut self) -> Vec<(Position, PieceColor)> {
        let mut blocks = Vec::new();

        if let Some(grid) = self.world.get_resource::<Grid>() {
            for row in 0..grid.rows() {
                for (col, cell) in grid.row(row).iter().enumerate() {
                    if let Some(color) = cell {
                        blocks.push((
                            Position {
                                x: i32::try_from(col).unwrap_or(i32::MAX),
                                y: i32::try_from(row).unwrap_or(i32::MAX),
                            },
                            *color,
                        ));
                    }
                }
            }
        }

        if let Some((_, piece, position)) = active_piece(&mut self.world) {
            blocks.extend(
                piece
                    .cells_at(position)
                    .filter(|&(row, _)| row >= 0)
                    .map(|(row, col)| (Position { x: col, y: row }, piece.color)),
            );
        }

        blocks
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.world.resource::<GameState>().score
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.world.resource::<GameState>().is_running()
    }

    pub fn handle_command(&mut self, command: Command) -> MoveOutcome {
        let outcome = apply_command(&mut self.world, command);
        self.poll_game_over();
        outcome
    }

    /// Feeds wall-clock time since the last call into the gravity timer.
    pub fn on_tick(&mut self) {
        let delta = {
            let mut time = self.world.resource_mut::<Time>();
            time.update();
            time.delta()
        };
        self.advance(delta);
    }

    pub fn advance(&mut self, delta: Duration) {
        game_tick_system(&mut self.world, delta);
        self.poll_game_over();
    }

    /// Final score once the game has ended.
    #[must_use]
    pub fn game_over(&self) -> Option<u32> {
        self.final_score
    }

    // Drain game-over notifications sent by the engine
    fn poll_game_over(&mut self) {
        let latest = self
            .world
            .get_resource_mut::<Events<GameOver>>()
            .and_then(|mut events| events.drain().last());

        if let Some(game_over) = latest {
            self.final_score = Some(game_over.final_score);
        }
    }

    /// Starts over by rebuilding the whole game from the same configuration.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        info!("Restarting game");
        *self = Self::new(self.config.clone())?;
        Ok(())
    }
}
