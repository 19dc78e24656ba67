#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting board coordinates to terminal coordinates since boards are small
    clippy::cast_possible_truncation,
    // Allow sign loss since only on-board (non-negative) positions are drawn
    clippy::cast_sign_loss
)]

use crate::app::App;
use crate::components::{GameState, Grid};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

// Each board cell is 2 characters wide and 1 tall
const CELL_WIDTH: u16 = 2;
const MIN_INFO_WIDTH: u16 = 22;

/// Smallest terminal area, `(width, height)`, that fits the board and the info panel.
#[must_use]
pub fn min_frame_size(grid: &Grid) -> (u16, u16) {
    let (board_width, board_height) = board_size(grid);
    (board_width + MIN_INFO_WIDTH, board_height + 2)
}

fn board_size(grid: &Grid) -> (u16, u16) {
    let columns = u16::try_from(grid.columns()).unwrap_or(u16::MAX);
    let rows = u16::try_from(grid.rows()).unwrap_or(u16::MAX);
    (
        columns.saturating_mul(CELL_WIDTH).saturating_add(2),
        rows.saturating_add(2),
    )
}

pub fn render(f: &mut Frame, app: &mut App) {
    let (min_width, min_height) = min_frame_size(app.world.resource::<Grid>());

    if f.area().width < min_width || f.area().height < min_height {
        let warning_text = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Tetblock"));

        let warning_area = centered_rect(80, 50, f.area());
        f.render_widget(warning_text, warning_area);
        return;
    }

    let (board_width, board_height) = board_size(app.world.resource::<Grid>());

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(board_width),
            Constraint::Min(MIN_INFO_WIDTH),
        ])
        .split(f.area());

    let game_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Title
            Constraint::Length(board_height), // Game board
            Constraint::Fill(1),
        ])
        .split(main_layout[0]);

    let title = Paragraph::new("TETBLOCK")
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(title, game_layout[0]);

    render_game_board(f, app, game_layout[1]);
    render_info(f, app, main_layout[1]);

    if let Some(final_score) = app.game_over() {
        render_game_over(f, final_score, game_layout[1]);
    }
}

fn render_game_board(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    // Empty cells
    {
        let grid = app.world.resource::<Grid>();
        let empty_style = Style::default().fg(Color::DarkGray);
        for row in 0..grid.rows() as u16 {
            for col in 0..grid.columns() as u16 {
                let x = inner_area.left() + col * CELL_WIDTH;
                let y = inner_area.top() + row;
                if x < inner_area.right() && y < inner_area.bottom() {
                    f.buffer_mut().set_string(x, y, "· ", empty_style);
                }
            }
        }
    }

    for (position, piece_color) in app.get_render_blocks() {
        if position.x < 0 || position.y < 0 {
            continue;
        }

        let x = inner_area.left() + position.x as u16 * CELL_WIDTH;
        let y = inner_area.top() + position.y as u16;

        if x + 1 < inner_area.right() && y < inner_area.bottom() {
            let color = piece_color.get_color();
            for offset in 0..CELL_WIDTH {
                if let Some(cell) = f.buffer_mut().cell_mut((x + offset, y)) {
                    cell.set_symbol("█");
                    cell.set_fg(color);
                    cell.set_bg(Color::Black);
                }
            }
        }
    }
}

fn render_info(f: &mut Frame, app: &App, area: Rect) {
    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(4), // Score
            Constraint::Min(6),    // Controls
        ])
        .split(area);

    let info_title = Paragraph::new("INFO").alignment(Alignment::Center);
    f.render_widget(info_title, info_layout[0]);

    let game_state = app.world.resource::<GameState>();
    let stats = format!(
        "Score: {}\nLines: {}\nPieces: {}",
        game_state.score, game_state.lines_cleared, game_state.pieces_locked
    );
    let stats_info = Paragraph::new(stats)
        .block(Block::default().borders(Borders::TOP))
        .wrap(Wrap { trim: true });
    f.render_widget(stats_info, info_layout[1]);

    let controls = Paragraph::new(
        "Controls:\n\
        ←/→: Move left/right\n\
        ↓: Soft drop\n\
        ↑/Space: Rotate\n\
        Drag: Swipe, click: Rotate\n\
        Q: Quit",
    )
    .block(Block::default().borders(Borders::TOP))
    .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[2]);
}

fn render_game_over(f: &mut Frame, final_score: u32, board_area: Rect) {
    let popup = centered_rect(90, 30, board_area);
    let text = format!("GAME OVER\nFinal score: {final_score}\nPress Enter to restart");
    let message = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup);
    f.render_widget(message, popup);
}

/// Helper function to create a centered rect using up certain percentage of the available rect
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
