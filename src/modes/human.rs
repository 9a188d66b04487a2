use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use super::menu::{MenuItem, Screen};
use crate::game::{GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::logging::chain_panic_hook;
use crate::metrics::SessionMetrics;
use crate::render::{Renderer, View};

/// Keyboard-driven play in the terminal
pub struct HumanMode {
    engine: GameEngine,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    screen: Screen,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        Self::from_engine(GameEngine::new(config))
    }

    /// Same as [`HumanMode::new`] but with reproducible apples and obstacles
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::from_engine(GameEngine::with_seed(config, seed))
    }

    fn from_engine(engine: GameEngine) -> Self {
        let controls = engine.config().controls;
        Self {
            engine,
            metrics: SessionMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(controls),
            screen: Screen::default(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Leave raw mode and the alternate screen even if the loop panics
        chain_panic_hook(|_| restore_terminal());

        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        tracing::info!(
            games_played = self.metrics.games_played,
            best_score = self.metrics.best_score,
            "session ended"
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.engine.config().tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let view = View {
                        screen: &self.screen,
                        state: self.engine.state(),
                        metrics: &self.metrics,
                        controls: self.input_handler.controls(),
                    };
                    let renderer = &self.renderer;
                    terminal.draw(|frame| {
                        renderer.render(frame, &view);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.apply(action);
        }
    }

    /// Drive the screen state machine with one key action
    fn apply(&mut self, action: KeyAction) {
        if action == KeyAction::Quit {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Menu(mut menu) => match action {
                KeyAction::Steer(direction) => {
                    menu.move_cursor(direction);
                    self.screen = Screen::Menu(menu);
                }
                KeyAction::Confirm => match menu.selected() {
                    MenuItem::Start => self.start_game(),
                    MenuItem::HowToPlay => self.screen = Screen::HowToPlay,
                    MenuItem::Exit => self.should_quit = true,
                },
                _ => {}
            },
            Screen::HowToPlay => {
                if action != KeyAction::None {
                    self.screen = Screen::default();
                }
            }
            Screen::Playing => {
                if let KeyAction::Steer(direction) = action {
                    self.engine.set_direction(direction);
                }
            }
            Screen::GameOver => {
                if matches!(action, KeyAction::Confirm | KeyAction::Restart) {
                    self.start_game();
                }
            }
        }
    }

    fn update_game(&mut self) {
        if self.screen != Screen::Playing {
            return;
        }

        let outcome = self.engine.tick();

        if outcome.terminated {
            self.metrics
                .on_game_over(self.engine.state().score, outcome.collision);
            self.screen = Screen::GameOver;
        }
    }

    fn start_game(&mut self) {
        self.engine.initialize();
        self.metrics.on_game_start();
        self.screen = Screen::Playing;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Best-effort terminal reset for the panic path
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(stderr(), LeaveAlternateScreen, crossterm::cursor::Show);
}
