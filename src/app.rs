//! App: terminal init, frame loop, tick and key handling.

use crate::GameConfig;
use crate::clock::FrameClock;
use crate::game::{GameState, TickOutcome};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

/// Whether the loop keeps going after handling an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    state: GameState,
    screen: Screen,
    paused: bool,
    clock: FrameClock,
    /// TachyonFX fade for the game-over screen (created on first game-over frame).
    game_over_effect: Option<Effect>,
    /// Last time we processed the effect (for delta).
    game_over_effect_process_time: Option<Instant>,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = GameState::new(&config, rng);
        let clock = FrameClock::new(config.frame_rate);
        Self {
            config,
            theme,
            state,
            screen: Screen::Playing,
            paused: false,
            clock,
            game_over_effect: None,
            game_over_effect_process_time: None,
        }
    }

    fn reset_game(&mut self) {
        self.state.restart();
        self.screen = Screen::Playing;
        self.paused = false;
        self.game_over_effect = None;
        self.game_over_effect_process_time = None;
    }

    fn handle_action(&mut self, action: Action) -> Flow {
        match (self.screen, action) {
            (_, Action::Quit) => return Flow::Quit,
            (Screen::Playing, Action::Pause) => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "pause toggled");
            }
            (Screen::Playing, Action::Game(command)) if !self.paused => {
                self.state.apply(command);
                self.check_game_over();
            }
            (Screen::GameOver, Action::Restart) => self.reset_game(),
            _ => {}
        }
        Flow::Continue
    }

    fn check_game_over(&mut self) {
        if self.state.game_over && self.screen == Screen::Playing {
            self.screen = Screen::GameOver;
        }
    }

    /// Gravity step for this frame.
    fn update(&mut self, elapsed_ms: u64) {
        if self.screen != Screen::Playing || self.paused {
            return;
        }
        if let TickOutcome::Locked { lines } = self.state.tick(elapsed_ms) {
            debug!(lines, score = self.state.score, "tick locked piece");
        }
        self.check_game_over();
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{KeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
            execute,
            terminal::{EnterAlternateScreen, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Press/repeat/release kinds let the loop act on press edges only.
        let _ = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        );

        let result = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))
            .map_err(anyhow::Error::from)
            .and_then(|mut terminal| self.run_loop(&mut terminal));

        restore_terminal()?;

        info!(score = self.state.score, lines = self.state.lines_cleared, "quit");
        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        info!(
            width = self.config.width,
            height = self.config.height,
            fall_speed_ms = self.config.fall_speed_ms,
            frame_ms = self.clock.frame_duration().as_millis() as u64,
            "game started"
        );
        loop {
            let elapsed_ms = self.clock.tick();
            self.update(elapsed_ms);

            // Wait out the rest of the frame for input, then drain everything pending.
            if event::poll(self.clock.until_next_frame())? {
                while event::poll(Duration::ZERO)? {
                    let Event::Key(key) = event::read()? else {
                        continue;
                    };
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_action(key_to_action(key)) == Flow::Quit {
                        return Ok(());
                    }
                }
            }

            let now = Instant::now();
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    self.screen,
                    &self.state,
                    &self.theme,
                    self.paused,
                    &mut self.game_over_effect,
                    &mut self.game_over_effect_process_time,
                    now,
                    self.config.no_animation,
                )
            })?;
        }
    }
}

/// Undo `App::run`'s terminal setup. Also called from the panic hook.
pub fn restore_terminal() -> std::io::Result<()> {
    use crossterm::{
        event::PopKeyboardEnhancementFlags,
        execute,
        terminal::{LeaveAlternateScreen, disable_raw_mode},
    };
    let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
    run_restore_steps(
        || execute!(std::io::stdout(), LeaveAlternateScreen),
        disable_raw_mode,
    )
}

/// Both steps always run; the first error wins.
fn run_restore_steps(
    leave_screen: impl FnOnce() -> std::io::Result<()>,
    leave_raw_mode: impl FnOnce() -> std::io::Result<()>,
) -> std::io::Result<()> {
    let screen = leave_screen();
    let raw = leave_raw_mode();
    screen.and(raw)
}
