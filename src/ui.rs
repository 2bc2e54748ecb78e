//! Layout and drawing: board, ghost, current piece, hold/next previews, score, overlays.

use crate::app::Screen;
use crate::game::GameState;
use crate::shape::Matrix;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Each board cell is two terminal columns wide so it reads as a square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 22;

/// Duration of the board fade when the game ends.
const GAME_OVER_FADE_MS: u32 = 800;

/// Preview box: enough for the I piece in any orientation.
const PREVIEW_ROWS: u16 = 4;

/// What one board cell shows after composing locked cells, ghost and current piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Empty,
    Ghost,
    Filled(Color),
}

/// Row-major grid of the board as it should be painted. The current piece is drawn over
/// the ghost; ghost and piece cells above the top row are skipped.
pub fn compose_cells(state: &GameState) -> Vec<Vec<CellView>> {
    let (width, height) = (state.board.width(), state.board.height());
    let mut grid = vec![vec![CellView::Empty; width]; height];
    for (x, y, kind) in state.board.locked_cells() {
        grid[y as usize][x as usize] = CellView::Filled(kind.color());
    }

    let mut paint = |x: i32, y: i32, view: CellView| {
        let (Ok(ux), Ok(uy)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if let Some(cell) = grid.get_mut(uy).and_then(|row| row.get_mut(ux)) {
            *cell = view;
        }
    };
    if !state.game_over {
        for (x, y) in state.ghost().occupied_cells() {
            paint(x, y, CellView::Ghost);
        }
    }
    let color = state.current.color();
    for (x, y) in state.current.occupied_cells() {
        paint(x, y, CellView::Filled(color));
    }
    grid
}

/// Board block size in terminal cells (border included).
fn board_outer_size(state: &GameState) -> (u16, u16) {
    let cols = u16::try_from(state.board.width()).unwrap_or(u16::MAX);
    let rows = u16::try_from(state.board.height()).unwrap_or(u16::MAX);
    (
        cols.saturating_mul(CELL_WIDTH).saturating_add(2),
        rows.saturating_add(2),
    )
}

/// Board block (with border) and sidebar, centred in `area`.
fn game_layout(area: Rect, state: &GameState) -> (Rect, Rect) {
    let (bw, bh) = board_outer_size(state);
    let total_w = bw.saturating_add(SIDEBAR_WIDTH);

    let horiz_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(bh),
            Constraint::Fill(1),
        ])
        .split(horiz_chunks[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert_chunks[1]);
    (inner[0], inner[1])
}

/// Draw the current screen. On game over the board fades out (unless `no_animation`)
/// and a summary panel is drawn on top.
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    state: &GameState,
    theme: &Theme,
    paused: bool,
    game_over_effect: &mut Option<Effect>,
    effect_process_time: &mut Option<Instant>,
    now: Instant,
    no_animation: bool,
) {
    let area = frame.area();
    let (board_area, sidebar_area) = game_layout(area, state);
    draw_board(frame, state, theme, board_area);
    draw_sidebar(frame, state, theme, sidebar_area);

    match screen {
        Screen::Playing => {
            if paused {
                draw_pause_overlay(frame, theme, area);
            }
        }
        Screen::GameOver => {
            if !no_animation {
                apply_game_over_effect(
                    frame,
                    theme,
                    board_area,
                    game_over_effect,
                    effect_process_time,
                    now,
                );
            }
            draw_game_over(frame, state, theme, board_area);
        }
    }
}

fn draw_board(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(
            format!(" Tetristui  Score: {} ", state.score),
            Style::default().fg(theme.title),
        ));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let empty_style = Style::default().fg(theme.div_line).bg(theme.bg);
    let ghost_style = Style::default().fg(theme.ghost).bg(theme.bg);
    let buf = frame.buffer_mut();
    for (y, row) in compose_cells(state).iter().enumerate() {
        let ry = inner.y + y as u16;
        if ry >= inner.y + inner.height {
            break;
        }
        for (x, cell) in row.iter().enumerate() {
            let rx = inner.x + x as u16 * CELL_WIDTH;
            if rx + CELL_WIDTH > inner.x + inner.width {
                break;
            }
            let (symbol, style) = match cell {
                CellView::Empty => (" .", empty_style),
                CellView::Ghost => ("[]", ghost_style),
                CellView::Filled(color) => ("[]", Style::default().fg(theme.bg).bg(*color)),
            };
            buf.set_string(rx, ry, symbol, style);
        }
    }
}

fn draw_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PREVIEW_ROWS + 2), // Hold
            Constraint::Length(PREVIEW_ROWS + 2), // Next
            Constraint::Length(5),                // Stats
            Constraint::Min(0),                   // Keys
        ])
        .split(area);

    let hold_title = if state.can_hold { " Hold " } else { " Hold (used) " };
    let hold_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(hold_title, title_style));
    let hold_inner = hold_block.inner(chunks[0]);
    hold_block.render(chunks[0], frame.buffer_mut());
    if let Some(held) = &state.hold {
        let color = if state.can_hold { held.color() } else { theme.ghost };
        draw_matrix_preview(frame, hold_inner, held.matrix(), color);
    }

    let next_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Next ", title_style));
    let next_inner = next_block.inner(chunks[1]);
    next_block.render(chunks[1], frame.buffer_mut());
    draw_matrix_preview(frame, next_inner, state.next.matrix(), state.next.color());

    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let stats_inner = stats_block.inner(chunks[2]);
    stats_block.render(chunks[2], frame.buffer_mut());
    let stats_lines = vec![
        Line::from(vec![
            Span::styled("Score: ", title_style),
            Span::styled(state.score.to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Lines: ", title_style),
            Span::styled(state.lines_cleared.to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Pieces: ", title_style),
            Span::styled(state.pieces_locked.to_string(), fg_style),
        ]),
    ];
    Paragraph::new(stats_lines).render(stats_inner, frame.buffer_mut());

    let keys = vec![
        Line::from(Span::styled(" ←→  Move", fg_style)),
        Line::from(Span::styled(" ↑   Rotate", fg_style)),
        Line::from(Span::styled(" ↓   Soft drop", fg_style)),
        Line::from(Span::styled(" Spc Hard drop", fg_style)),
        Line::from(Span::styled(" C   Hold", fg_style)),
        Line::from(Span::styled(" P   Pause  Q Quit", fg_style)),
    ];
    Paragraph::new(keys).render(chunks[3], frame.buffer_mut());
}

/// Draw a piece matrix centred in `area`, two columns per cell.
fn draw_matrix_preview(frame: &mut Frame, area: Rect, matrix: &Matrix, color: Color) {
    let rows = matrix.len() as u16;
    let cols = matrix.first().map_or(0, Vec::len) as u16;
    let off_x = area.width.saturating_sub(cols * CELL_WIDTH) / 2;
    let off_y = area.height.saturating_sub(rows) / 2;
    let style = Style::default().fg(color).bg(color);
    let buf = frame.buffer_mut();
    for (dy, row) in matrix.iter().enumerate() {
        for (dx, filled) in row.iter().enumerate() {
            let rx = area.x + off_x + dx as u16 * CELL_WIDTH;
            let ry = area.y + off_y + dy as u16;
            if *filled && rx + CELL_WIDTH <= area.x + area.width && ry < area.y + area.height {
                buf.set_string(rx, ry, "██", style);
            }
        }
    }
}

/// Create or advance the board fade (TachyonFX) shown behind the game-over panel.
fn apply_game_over_effect(
    frame: &mut Frame,
    theme: &Theme,
    board_area: Rect,
    effect: &mut Option<Effect>,
    process_time: &mut Option<Instant>,
    now: Instant,
) {
    let delta = process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *process_time = Some(now);

    if effect.is_none() {
        let bg = theme.bg;
        *effect = Some(
            fx::fade_to(bg, bg, (GAME_OVER_FADE_MS, Interpolation::Linear)).with_area(board_area),
        );
    }
    if let Some(effect) = effect {
        frame.render_effect(effect, board_area, TfxDuration::from_millis(delta_ms));
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered(area, 26, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P Resume    Q Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, state: &GameState, theme: &Theme, board_area: Rect) {
    let popup = centered(board_area, board_area.width.max(20), 9);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Score: {} ", state.score),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            format!(" Lines: {} ", state.lines_cleared),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " R Restart  Q Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .title(Span::styled(" Tetristui ", Style::default().fg(theme.title))),
    );
    p.render(popup, frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::piece::Piece;
    use crate::shape::ShapeKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn state_with(current: ShapeKind) -> GameState {
        let mut state = GameState::new(&GameConfig::default(), StdRng::seed_from_u64(1));
        state.current = Piece::spawn(current, state.board.width());
        state
    }

    fn count(grid: &[Vec<CellView>], want: impl Fn(&CellView) -> bool) -> usize {
        grid.iter().flatten().filter(|c| want(*c)).count()
    }

    #[test]
    fn test_compose_shows_piece_and_ghost() {
        let state = state_with(ShapeKind::O);
        let grid = compose_cells(&state);
        assert_eq!(grid.len(), 20);
        assert_eq!(grid[0].len(), 10);
        assert_eq!(grid[0][3], CellView::Filled(ShapeKind::O.color()));
        assert_eq!(grid[19][4], CellView::Ghost);
        assert_eq!(count(&grid, |c| *c == CellView::Ghost), 4);
    }

    #[test]
    fn test_piece_drawn_over_ghost() {
        let mut state = state_with(ShapeKind::O);
        state.current.y = 18;
        let grid = compose_cells(&state);
        assert_eq!(count(&grid, |c| *c == CellView::Ghost), 0);
        assert_eq!(count(&grid, |c| matches!(c, CellView::Filled(_))), 4);
    }

    #[test]
    fn test_cells_above_top_are_skipped() {
        let mut state = state_with(ShapeKind::I);
        state.current.rotate();
        state.current.y = -2;
        let grid = compose_cells(&state);
        assert_eq!(count(&grid, |c| matches!(c, CellView::Filled(_))), 2);
    }

    #[test]
    fn test_locked_cells_keep_their_colour() {
        let mut state = state_with(ShapeKind::T);
        state.board.set(0, 19, ShapeKind::Z);
        let grid = compose_cells(&state);
        assert_eq!(grid[19][0], CellView::Filled(ShapeKind::Z.color()));
    }

    #[test]
    fn test_board_layout_fits_default_board() {
        let state = state_with(ShapeKind::T);
        let (board, sidebar) = game_layout(Rect::new(0, 0, 80, 30), &state);
        assert_eq!((board.width, board.height), (22, 22));
        assert_eq!(sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(sidebar.x, board.x + board.width);
    }

    #[test]
    fn test_outer_size_saturates_for_wide_boards() {
        let config = GameConfig {
            width: 40_000,
            height: 4,
            ..GameConfig::default()
        };
        let state = GameState::new(&config, StdRng::seed_from_u64(1));
        assert_eq!(board_outer_size(&state), (u16::MAX, 6));
    }
}
