#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow sign loss when going from signed to unsigned types since locked rows are checked to be non-negative
    clippy::cast_sign_loss
)]

use bevy_ecs::prelude::*;
use log::{debug, info, trace};
use std::time::Duration;

use crate::catalog::{Catalog, Randomizer};
use crate::components::{GameOver, GameState, Grid, MoveOutcome, Piece, Position, Rules, RunState};
use crate::input::Command;
use crate::scheduler::GravityTimer;

/// Spawns a new active piece at the spawn anchor. Returns `false` when the
/// spawn ended the game (only with `Rules::end_on_blocked_spawn`).
pub fn spawn_piece(world: &mut World) -> bool {
    let rules = *world.resource::<Rules>();
    let piece = world.resource_scope(|world, mut rng: Mut<Randomizer>| {
        world.resource::<Catalog>().draw(&mut rng)
    });

    let blocked = world
        .resource::<Grid>()
        .collides(rules.spawn, 0, 0, &piece.shape);

    debug!(
        "Spawning {:?} piece ({}x{}) at ({}, {})",
        piece.color,
        piece.shape.width(),
        piece.shape.height(),
        rules.spawn.x,
        rules.spawn.y
    );
    world.spawn((piece, rules.spawn));

    if blocked && rules.end_on_blocked_spawn {
        stop_game(world);
        return false;
    }
    true
}

/// The active piece and its anchor, if there is one.
pub fn active_piece(world: &mut World) -> Option<(Entity, Piece, Position)> {
    let mut query = world.query::<(Entity, &Piece, &Position)>();
    query
        .iter(world)
        .next()
        .map(|(entity, piece, position)| (entity, piece.clone(), *position))
}

fn is_running(world: &World) -> bool {
    world
        .get_resource::<GameState>()
        .is_some_and(GameState::is_running)
}

fn shift(world: &mut World, dx: i32) -> MoveOutcome {
    if !is_running(world) {
        return MoveOutcome::Inactive;
    }
    let Some((entity, piece, position)) = active_piece(world) else {
        return MoveOutcome::Inactive;
    };

    if world
        .resource::<Grid>()
        .collides(position, dx, 0, &piece.shape)
    {
        debug!("Horizontal move by {dx} rejected");
        return MoveOutcome::Rejected;
    }

    world.entity_mut(entity).insert(Position {
        x: position.x + dx,
        y: position.y,
    });
    MoveOutcome::Applied
}

pub fn move_left(world: &mut World) -> MoveOutcome {
    shift(world, -1)
}

pub fn move_right(world: &mut World) -> MoveOutcome {
    shift(world, 1)
}

/// Moves the active piece down one row, or locks it when it cannot move.
/// Manual drops and gravity ticks both come through here.
pub fn soft_drop(world: &mut World) -> MoveOutcome {
    if !is_running(world) {
        return MoveOutcome::Inactive;
    }
    let Some((entity, piece, position)) = active_piece(world) else {
        return MoveOutcome::Inactive;
    };

    if world
        .resource::<Grid>()
        .collides(position, 0, 1, &piece.shape)
    {
        return lock_piece(world, entity, &piece, position);
    }

    world.entity_mut(entity).insert(Position {
        x: position.x,
        y: position.y + 1,
    });
    MoveOutcome::Applied
}

/// Rotates the active piece clockwise in place. No wall kicks: a rotation
/// that collides at the current anchor is rejected.
pub fn rotate(world: &mut World) -> MoveOutcome {
    if !is_running(world) {
        return MoveOutcome::Inactive;
    }
    let Some((entity, piece, position)) = active_piece(world) else {
        return MoveOutcome::Inactive;
    };

    let rotated = piece.shape.rotated();
    if world.resource::<Grid>().collides(position, 0, 0, &rotated) {
        debug!("Rotation rejected at ({}, {})", position.x, position.y);
        return MoveOutcome::Rejected;
    }

    world
        .entity_mut(entity)
        .insert(Piece::new(rotated, piece.color));
    MoveOutcome::Applied
}

pub fn apply_command(world: &mut World, command: Command) -> MoveOutcome {
    match command {
        Command::MoveLeft => move_left(world),
        Command::MoveRight => move_right(world),
        Command::SoftDrop => soft_drop(world),
        Command::Rotate => rotate(world),
    }
}

fn lock_piece(world: &mut World, entity: Entity, piece: &Piece, position: Position) -> MoveOutcome {
    let cells: Vec<(i32, i32)> = piece.cells_at(position).collect();

    // Nothing is written when any block would sit above the board.
    if cells.iter().any(|&(row, _)| row < 0) {
        return stop_game(world);
    }

    let rows_cleared = {
        let mut grid = world.resource_mut::<Grid>();
        for (row, col) in cells {
            grid.lock(row as usize, col as usize, piece.color);
        }
        grid.clear_full_rows()
    };

    let points_per_row = world.resource::<Rules>().points_per_row;
    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.pieces_locked += 1;
        if rows_cleared > 0 {
            game_state.award_rows(rows_cleared, points_per_row);
        }
    }

    if rows_cleared > 0 {
        info!(
            "Locked piece at ({}, {}) and cleared {} rows",
            position.x, position.y, rows_cleared
        );
    } else {
        info!("Locked piece at ({}, {})", position.x, position.y);
    }

    world.despawn(entity);
    if !spawn_piece(world) {
        return MoveOutcome::GameOver {
            final_score: world.resource::<GameState>().score,
        };
    }

    MoveOutcome::Locked { rows_cleared }
}

/// Moves the engine to its terminal state: stops the gravity timer and
/// announces the final score.
fn stop_game(world: &mut World) -> MoveOutcome {
    let final_score = {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.run_state = RunState::Stopped;
        game_state.score
    };

    if let Some(mut timer) = world.get_resource_mut::<GravityTimer>() {
        timer.cancel();
        debug!("Gravity timer cancelled");
    }

    world.send_event(GameOver { final_score });
    info!("Game over! Final score: {final_score}");

    MoveOutcome::GameOver { final_score }
}

/// Advances the gravity timer by `delta` and runs a soft drop when a tick
/// came due. At most one drop happens per call, so every gravity step gets a
/// frame of its own. Nothing runs once the game has stopped.
pub fn game_tick_system(world: &mut World, delta: Duration) {
    if !is_running(world) {
        if let Some(mut timer) = world.get_resource_mut::<GravityTimer>() {
            timer.cancel();
        }
        return;
    }

    let due = world
        .get_resource_mut::<GravityTimer>()
        .is_some_and(|mut timer| timer.advance(delta));

    if due {
        trace!("Gravity tick");
        soft_drop(world);
    }
}
