#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::components::{GameState, Grid, MoveOutcome, Piece, PieceColor, Position, RunState};
    use crate::config::Config;
    use crate::input::Command;
    use crate::scheduler::GravityTimer;
    use crate::systems::*;
    use crate::tests::test_utils::{
        active_piece as current_piece, active_position, create_test_app,
        create_test_app_with_config, fill_row_except, set_active_piece, shape,
    };
    use std::time::Duration;

    // Catalog order: I, O, T, Z, S / red, blue, green, yellow, purple
    const I_RED: [usize; 2] = [0, 0];
    const O_BLUE: [usize; 2] = [1, 1];

    fn i_piece() -> Piece {
        Piece::new(shape(&["1111"]), PieceColor::Red)
    }

    #[test]
    fn test_spawn_uses_catalog_and_spawn_anchor() {
        let mut app = create_test_app(vec![2, 4]);

        let piece = current_piece(&mut app.world);
        assert_eq!(piece.shape, shape(&["010", "111"]));
        assert_eq!(piece.color, PieceColor::Purple);
        assert_eq!(active_position(&mut app.world), Position { x: 4, y: 0 });
    }

    #[test]
    fn test_spawn_sequence_follows_random_source() {
        // Shape/color pairs for the first three spawns
        let mut app = create_test_app(vec![0, 0, 1, 2, 4, 3]);
        assert_eq!(current_piece(&mut app.world).color, PieceColor::Red);

        // Drop the I piece to the floor and lock it
        for _ in 0..20 {
            if let MoveOutcome::Locked { .. } = soft_drop(&mut app.world) {
                break;
            }
        }
        let second = current_piece(&mut app.world);
        assert_eq!(second.shape, shape(&["11", "11"]));
        assert_eq!(second.color, PieceColor::Green);

        for _ in 0..20 {
            if let MoveOutcome::Locked { .. } = soft_drop(&mut app.world) {
                break;
            }
        }
        let third = current_piece(&mut app.world);
        assert_eq!(third.shape, shape(&["011", "110"]));
        assert_eq!(third.color, PieceColor::Yellow);
    }

    #[test]
    fn test_move_left_and_right() {
        let mut app = create_test_app(I_RED.to_vec());

        assert_eq!(move_left(&mut app.world), MoveOutcome::Applied);
        assert_eq!(active_position(&mut app.world).x, 3);

        assert_eq!(move_right(&mut app.world), MoveOutcome::Applied);
        assert_eq!(move_right(&mut app.world), MoveOutcome::Applied);
        assert_eq!(active_position(&mut app.world).x, 5);
    }

    #[test]
    fn test_moves_into_walls_are_rejected() {
        let mut app = create_test_app(I_RED.to_vec());

        // I piece at x=4 spans columns 4..=7; two moves reach the right wall
        assert_eq!(move_right(&mut app.world), MoveOutcome::Applied);
        assert_eq!(move_right(&mut app.world), MoveOutcome::Applied);
        assert_eq!(move_right(&mut app.world), MoveOutcome::Rejected);
        assert_eq!(active_position(&mut app.world), Position { x: 6, y: 0 });

        for _ in 0..6 {
            assert_eq!(move_left(&mut app.world), MoveOutcome::Applied);
        }
        assert_eq!(move_left(&mut app.world), MoveOutcome::Rejected);
        assert_eq!(active_position(&mut app.world), Position { x: 0, y: 0 });
    }

    #[test]
    fn test_move_into_locked_block_is_rejected() {
        let mut app = create_test_app(I_RED.to_vec());
        app.world.resource_mut::<Grid>().lock(0, 3, PieceColor::Blue);

        assert_eq!(move_left(&mut app.world), MoveOutcome::Rejected);
        assert_eq!(active_position(&mut app.world).x, 4);
    }

    #[test]
    fn test_rotation_applies_in_open_space() {
        let mut app = create_test_app(I_RED.to_vec());
        set_active_piece(&mut app.world, i_piece(), Position { x: 3, y: 5 });

        assert_eq!(rotate(&mut app.world), MoveOutcome::Applied);
        assert_eq!(
            current_piece(&mut app.world).shape,
            shape(&["1", "1", "1", "1"])
        );
        assert_eq!(active_position(&mut app.world), Position { x: 3, y: 5 });
    }

    #[test]
    fn test_rotation_through_floor_is_rejected() {
        let mut app = create_test_app(I_RED.to_vec());
        set_active_piece(&mut app.world, i_piece(), Position { x: 4, y: 18 });

        assert_eq!(rotate(&mut app.world), MoveOutcome::Rejected);
        assert_eq!(current_piece(&mut app.world).shape, shape(&["1111"]));
        assert_eq!(active_position(&mut app.world), Position { x: 4, y: 18 });
    }

    #[test]
    fn test_o_piece_rotation_is_never_rejected_in_open_board() {
        let mut app = create_test_app(O_BLUE.to_vec());
        set_active_piece(
            &mut app.world,
            Piece::new(shape(&["11", "11"]), PieceColor::Blue),
            Position { x: 4, y: 9 },
        );

        for _ in 0..4 {
            assert_eq!(rotate(&mut app.world), MoveOutcome::Applied);
            assert_eq!(current_piece(&mut app.world).shape, shape(&["11", "11"]));
        }
    }

    #[test]
    fn test_soft_drop_moves_down() {
        let mut app = create_test_app(I_RED.to_vec());

        assert_eq!(soft_drop(&mut app.world), MoveOutcome::Applied);
        assert_eq!(active_position(&mut app.world), Position { x: 4, y: 1 });
    }

    #[test]
    fn test_i_piece_locks_on_the_floor() {
        let mut app = create_test_app(I_RED.to_vec());
        set_active_piece(&mut app.world, i_piece(), Position { x: 4, y: 18 });

        assert_eq!(soft_drop(&mut app.world), MoveOutcome::Applied);
        assert_eq!(active_position(&mut app.world).y, 19);

        assert_eq!(
            soft_drop(&mut app.world),
            MoveOutcome::Locked { rows_cleared: 0 }
        );

        let grid = app.world.resource::<Grid>();
        for col in 4..=7 {
            assert_eq!(grid.cell(19, col), Some(PieceColor::Red));
        }
        assert!(!grid.is_occupied(19, 3));
        assert!(!grid.is_occupied(19, 8));

        // A new piece replaced the locked one
        assert_eq!(active_position(&mut app.world), Position { x: 4, y: 0 });
        assert_eq!(app.world.query::<&Piece>().iter(&app.world).count(), 1);
        assert_eq!(app.world.resource::<GameState>().score, 0);
        assert_eq!(app.world.resource::<GameState>().pieces_locked, 1);
    }

    #[test]
    fn test_completing_a_row_clears_it_and_scores() {
        let mut app = create_test_app(I_RED.to_vec());
        {
            let mut grid = app.world.resource_mut::<Grid>();
            fill_row_except(&mut grid, 19, &[4, 5, 6, 7], PieceColor::Blue);
            grid.lock(18, 0, PieceColor::Green);
        }
        set_active_piece(&mut app.world, i_piece(), Position { x: 4, y: 19 });

        assert_eq!(
            soft_drop(&mut app.world),
            MoveOutcome::Locked { rows_cleared: 1 }
        );

        let game_state = app.world.resource::<GameState>();
        assert_eq!(game_state.score, 100);
        assert_eq!(game_state.lines_cleared, 1);

        // Row 18 shifted into row 19 and an empty row appeared at the top
        let grid = app.world.resource::<Grid>();
        assert_eq!(grid.rows(), 20);
        assert_eq!(grid.cell(19, 0), Some(PieceColor::Green));
        assert!(!grid.is_occupied(19, 5));
        assert!(grid.row(0).iter().all(Option::is_none));
    }

    #[test]
    fn test_double_clear_scores_per_row() {
        let mut app = create_test_app(O_BLUE.to_vec());
        {
            let mut grid = app.world.resource_mut::<Grid>();
            fill_row_except(&mut grid, 18, &[4, 5], PieceColor::Red);
            fill_row_except(&mut grid, 19, &[4, 5], PieceColor::Red);
        }
        set_active_piece(
            &mut app.world,
            Piece::new(shape(&["11", "11"]), PieceColor::Blue),
            Position { x: 4, y: 18 },
        );

        assert_eq!(
            soft_drop(&mut app.world),
            MoveOutcome::Locked { rows_cleared: 2 }
        );
        assert_eq!(app.world.resource::<GameState>().score, 200);
        assert!(app.world.resource::<Grid>().is_empty());
    }

    #[test]
    fn test_points_per_row_comes_from_config() {
        let mut config = Config::default();
        config.scoring.points_per_row = 40;
        let mut app = create_test_app_with_config(config, I_RED.to_vec());
        fill_row_except(
            &mut app.world.resource_mut::<Grid>(),
            19,
            &[4, 5, 6, 7],
            PieceColor::Blue,
        );
        set_active_piece(&mut app.world, i_piece(), Position { x: 4, y: 19 });

        soft_drop(&mut app.world);
        assert_eq!(app.world.resource::<GameState>().score, 40);
    }

    #[test]
    fn test_lock_above_board_ends_game_without_touching_grid() {
        let mut app = create_test_app(I_RED.to_vec());
        {
            let mut grid = app.world.resource_mut::<Grid>();
            grid.lock(1, 4, PieceColor::Yellow);
            grid.lock(1, 5, PieceColor::Yellow);
            grid.lock(1, 6, PieceColor::Yellow);
            grid.lock(10, 0, PieceColor::Green);
        }
        app.world.resource_mut::<GameState>().score = 300;

        // T piece with its top block at row -1 and bottom row resting on row 0
        set_active_piece(
            &mut app.world,
            Piece::new(shape(&["010", "111"]), PieceColor::Purple),
            Position { x: 4, y: -1 },
        );
        let grid_before = app.world.resource::<Grid>().clone();

        assert_eq!(
            soft_drop(&mut app.world),
            MoveOutcome::GameOver { final_score: 300 }
        );

        assert_eq!(*app.world.resource::<Grid>(), grid_before);
        assert_eq!(
            app.world.resource::<GameState>().run_state,
            RunState::Stopped
        );
        assert!(app.world.resource::<GravityTimer>().is_cancelled());
    }

    #[test]
    fn test_operations_are_inactive_after_game_over() {
        let mut app = create_test_app(I_RED.to_vec());
        app.world.resource_mut::<Grid>().lock(0, 4, PieceColor::Red);
        set_active_piece(&mut app.world, i_piece(), Position { x: 4, y: -1 });

        assert!(matches!(
            soft_drop(&mut app.world),
            MoveOutcome::GameOver { .. }
        ));

        let position = active_position(&mut app.world);
        for command in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::SoftDrop,
            Command::Rotate,
        ] {
            assert_eq!(apply_command(&mut app.world, command), MoveOutcome::Inactive);
        }
        assert_eq!(active_position(&mut app.world), position);
    }

    #[test]
    fn test_overlapping_spawn_keeps_running() {
        let mut app = create_test_app(I_RED.to_vec());
        app.world.resource_mut::<Grid>().lock(1, 4, PieceColor::Blue);
        set_active_piece(&mut app.world, i_piece(), Position { x: 4, y: 0 });

        assert_eq!(
            soft_drop(&mut app.world),
            MoveOutcome::Locked { rows_cleared: 0 }
        );

        // The replacement spawned straight into the blocks just locked on row 0
        let position = active_position(&mut app.world);
        let piece = current_piece(&mut app.world);
        assert!(
            app.world
                .resource::<Grid>()
                .collides(position, 0, 0, &piece.shape)
        );
        assert!(app.world.resource::<GameState>().is_running());
    }

    #[test]
    fn test_blocked_spawn_can_end_the_game_when_enabled() {
        let mut config = Config::default();
        config.board.end_on_blocked_spawn = true;
        let mut app = create_test_app_with_config(config, I_RED.to_vec());
        fill_row_except(
            &mut app.world.resource_mut::<Grid>(),
            0,
            &[0, 1, 2, 3],
            PieceColor::Blue,
        );
        set_active_piece(&mut app.world, i_piece(), Position { x: 0, y: 1 });

        // Lock on row 1 completes nothing; the next spawn lands on row 0 blocks
        app.world.resource_mut::<Grid>().lock(2, 0, PieceColor::Green);
        assert_eq!(
            soft_drop(&mut app.world),
            MoveOutcome::GameOver { final_score: 0 }
        );
        assert!(!app.world.resource::<GameState>().is_running());
    }

    #[test]
    fn test_gravity_tick_drops_once_per_period() {
        let mut app = create_test_app(I_RED.to_vec());

        game_tick_system(&mut app.world, Duration::from_millis(499));
        assert_eq!(active_position(&mut app.world).y, 0);

        game_tick_system(&mut app.world, Duration::from_millis(1));
        assert_eq!(active_position(&mut app.world).y, 1);

        game_tick_system(&mut app.world, Duration::from_millis(500));
        assert_eq!(active_position(&mut app.world).y, 2);
    }

    #[test]
    fn test_gravity_stall_drops_a_single_row() {
        let mut app = create_test_app(I_RED.to_vec());

        // One long frame moves the piece once instead of replaying the backlog
        game_tick_system(&mut app.world, Duration::from_secs(30));
        assert_eq!(active_position(&mut app.world).y, 1);
        assert_eq!(app.world.resource::<GameState>().pieces_locked, 0);
        assert!(app.world.resource::<GameState>().is_running());

        game_tick_system(&mut app.world, Duration::from_millis(499));
        assert_eq!(active_position(&mut app.world).y, 1);
        game_tick_system(&mut app.world, Duration::from_millis(1));
        assert_eq!(active_position(&mut app.world).y, 2);
    }

    #[test]
    fn test_gravity_tick_stops_after_game_over() {
        let mut app = create_test_app(I_RED.to_vec());
        app.world.resource_mut::<Grid>().lock(0, 4, PieceColor::Red);
        set_active_piece(&mut app.world, i_piece(), Position { x: 4, y: -1 });

        // A stalled frame runs a single tick, and that tick ends the game
        game_tick_system(&mut app.world, Duration::from_millis(5000));
        assert!(!app.world.resource::<GameState>().is_running());

        let position = active_position(&mut app.world);
        let grid = app.world.resource::<Grid>().clone();

        game_tick_system(&mut app.world, Duration::from_millis(5000));
        assert_eq!(active_position(&mut app.world), position);
        assert_eq!(*app.world.resource::<Grid>(), grid);
        assert!(app.world.resource::<GravityTimer>().is_cancelled());
    }

    #[test]
    fn test_score_never_decreases_over_a_game() {
        let mut app = create_test_app(vec![0, 0, 1, 1, 2, 2, 3, 3, 4, 4]);
        let mut last_score = 0;

        for step in 0..2000 {
            let command = match step % 4 {
                0 => Command::MoveLeft,
                1 => Command::Rotate,
                2 => Command::MoveRight,
                _ => Command::SoftDrop,
            };
            apply_command(&mut app.world, command);
            game_tick_system(&mut app.world, Duration::from_millis(500));

            let score = app.world.resource::<GameState>().score;
            assert!(score >= last_score);
            last_score = score;

            let grid = app.world.resource::<Grid>();
            assert_eq!(grid.rows(), 20);
            assert_eq!(grid.columns(), 10);
        }
    }
}
