//! Game state: board, current/next/held piece, gravity, commands, score.

use crate::GameConfig;
use crate::board::Board;
use crate::ghost;
use crate::piece::Piece;
use crate::shape::ShapeKind;
use rand::rngs::StdRng;
use std::mem;
use tracing::{debug, info};

/// Flat score per cleared row.
pub const POINTS_PER_LINE: u32 = 100;

/// Gravity interval: one row every 500 ms.
pub const DEFAULT_FALL_SPEED_MS: u64 = 500;

/// Discrete player command applied between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    Hold,
}

/// What a gravity tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not enough time accumulated (or the game is over).
    Idle,
    /// The current piece moved down one row.
    Fell,
    /// The current piece could not move and was locked; `lines` rows were cleared.
    Locked { lines: usize },
}

/// Game state. The current, next and held pieces are owned values; moving a piece
/// between slots moves it, and no two slots share a matrix.
#[derive(Debug)]
pub struct GameState {
    pub board: Board,
    pub current: Piece,
    pub next: Piece,
    pub hold: Option<Piece>,
    /// Reset on every lock, cleared by a hold.
    pub can_hold: bool,
    pub fall_accumulator_ms: u64,
    pub fall_speed_ms: u64,
    pub score: u32,
    pub lines_cleared: u32,
    pub pieces_locked: u32,
    /// Set when a new piece cannot spawn or a piece locked above the visible rows.
    pub game_over: bool,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: &GameConfig, mut rng: StdRng) -> Self {
        let width = config.width;
        let current = Piece::spawn(ShapeKind::random(&mut rng), width);
        let next = Piece::spawn(ShapeKind::random(&mut rng), width);
        Self {
            board: Board::new(config.width, config.height),
            current,
            next,
            hold: None,
            can_hold: true,
            fall_accumulator_ms: 0,
            fall_speed_ms: config.fall_speed_ms,
            score: 0,
            lines_cleared: 0,
            pieces_locked: 0,
            game_over: false,
            rng,
        }
    }

    /// Start over on an empty board of the same size, continuing the RNG stream.
    pub fn restart(&mut self) {
        let (width, height) = (self.board.width(), self.board.height());
        self.board = Board::new(width, height);
        self.current = self.draw_piece();
        self.next = self.draw_piece();
        self.hold = None;
        self.can_hold = true;
        self.fall_accumulator_ms = 0;
        self.score = 0;
        self.lines_cleared = 0;
        self.pieces_locked = 0;
        self.game_over = false;
        info!(width, height, "game restarted");
    }

    fn draw_piece(&mut self) -> Piece {
        Piece::spawn(ShapeKind::random(&mut self.rng), self.board.width())
    }

    /// Landing preview of the current piece.
    pub fn ghost(&self) -> Piece {
        ghost::project(&self.current, &self.board)
    }

    /// Advance gravity by `elapsed_ms`. Once the accumulator reaches the fall speed the
    /// piece tries to move down; if it cannot, it locks and the next piece comes in.
    pub fn tick(&mut self, elapsed_ms: u64) -> TickOutcome {
        if self.game_over {
            return TickOutcome::Idle;
        }
        self.fall_accumulator_ms = self.fall_accumulator_ms.saturating_add(elapsed_ms);
        if self.fall_accumulator_ms < self.fall_speed_ms {
            return TickOutcome::Idle;
        }
        self.fall_accumulator_ms = 0;

        self.current.y += 1;
        if self.board.is_valid(&self.current) {
            return TickOutcome::Fell;
        }
        self.current.y -= 1;
        let lines = self.lock_and_advance();
        TickOutcome::Locked { lines }
    }

    fn lock_and_advance(&mut self) -> usize {
        let dropped = self.board.lock(&self.current);
        self.pieces_locked += 1;
        debug!(
            kind = ?self.current.kind,
            x = self.current.x,
            y = self.current.y,
            "piece locked"
        );

        let fresh = self.draw_piece();
        let mut promoted = mem::replace(&mut self.next, fresh);
        promoted.reset_origin(self.board.width());
        self.current = promoted;
        self.can_hold = true;

        let lines = self.board.clear_full_rows();
        if lines > 0 {
            self.lines_cleared += lines as u32;
            self.score += lines as u32 * POINTS_PER_LINE;
            info!(lines, score = self.score, "lines cleared");
        }

        if dropped > 0 || !self.board.is_valid(&self.current) {
            self.top_out();
        }
        lines
    }

    fn top_out(&mut self) {
        self.game_over = true;
        info!(
            score = self.score,
            lines = self.lines_cleared,
            pieces = self.pieces_locked,
            "game over"
        );
    }

    /// Apply one command. Invalid results are rolled back; returns whether anything changed.
    pub fn apply(&mut self, command: Command) -> bool {
        if self.game_over {
            return false;
        }
        match command {
            Command::MoveLeft => self.try_shift(-1, 0),
            Command::MoveRight => self.try_shift(1, 0),
            Command::SoftDrop => self.try_shift(0, 1),
            Command::Rotate => self.try_rotate(),
            Command::HardDrop => self.hard_drop(),
            Command::Hold => self.hold(),
        }
    }

    fn try_shift(&mut self, dx: i32, dy: i32) -> bool {
        self.current.x += dx;
        self.current.y += dy;
        if self.board.is_valid(&self.current) {
            true
        } else {
            self.current.x -= dx;
            self.current.y -= dy;
            false
        }
    }

    /// No wall kicks: a rotation that does not fit is undone.
    fn try_rotate(&mut self) -> bool {
        self.current.rotate();
        if self.board.is_valid(&self.current) {
            true
        } else {
            self.current.rotate_back();
            false
        }
    }

    /// Snap to the lowest valid row. Locking is left to the next gravity tick.
    fn hard_drop(&mut self) -> bool {
        let start = self.current.y;
        while self.board.is_valid(&self.current) {
            self.current.y += 1;
        }
        self.current.y -= 1;
        self.current.y != start
    }

    fn hold(&mut self) -> bool {
        if !self.can_hold {
            return false;
        }
        let width = self.board.width();
        let mut incoming = match self.hold.take() {
            Some(held) => held,
            None => {
                let fresh = self.draw_piece();
                mem::replace(&mut self.next, fresh)
            }
        };
        incoming.reset_origin(width);
        let outgoing = mem::replace(&mut self.current, incoming);
        debug!(held = ?outgoing.kind, current = ?self.current.kind, "hold");
        self.hold = Some(outgoing);
        self.can_hold = false;

        if !self.board.is_valid(&self.current) {
            self.top_out();
        }
        true
    }
}
