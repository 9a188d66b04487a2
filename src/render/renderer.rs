use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{ControlScheme, GameState, Position};
use crate::metrics::SessionMetrics;
use crate::modes::menu::{Menu, MenuItem, Screen, how_to_play};

/// What occupies one board tile, in increasing draw priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Cell {
    Empty,
    Obstacle,
    Apple,
    Body,
    Head,
}

/// Everything the renderer needs for one frame
pub struct View<'a> {
    pub screen: &'a Screen,
    pub state: &'a GameState,
    pub metrics: &'a SessionMetrics,
    pub controls: ControlScheme,
}

/// Classify every tile of the board, row-major
///
/// Obstacles cover every tile their rectangle overlaps; entities off the
/// board are skipped.
pub fn board_cells(state: &GameState) -> Vec<Cell> {
    let width = state.grid_width;
    let height = state.grid_height;
    let tile = state.tile_size;
    let mut cells = vec![Cell::Empty; width * height];

    let mut paint = |tx: i32, ty: i32, cell: Cell| {
        if tx < 0 || ty < 0 || tx as usize >= width || ty as usize >= height {
            return;
        }
        let slot = &mut cells[ty as usize * width + tx as usize];
        *slot = (*slot).max(cell);
    };

    for obstacle in &state.obstacles {
        let (x0, y0) = state.tile_of(obstacle.origin);
        let (x1, y1) = state.tile_of(Position::new(
            obstacle.origin.x + obstacle.width - 1,
            obstacle.origin.y + obstacle.height - 1,
        ));
        for ty in y0..=y1 {
            for tx in x0..=x1 {
                paint(tx, ty, Cell::Obstacle);
            }
        }
    }

    let (ax, ay) = state.tile_of(state.apple);
    paint(ax, ay, Cell::Apple);

    for &segment in state.snake.body_segments() {
        let (bx, by) = state.tile_of(segment);
        paint(bx, by, Cell::Body);
    }

    let (hx, hy) = state.tile_of(state.snake.head());
    paint(hx, hy, Cell::Head);

    cells
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, view: &View) {
        match view.screen {
            Screen::Menu(menu) => self.render_menu(frame, menu),
            Screen::HowToPlay => self.render_how_to_play(frame, view.controls),
            Screen::Playing | Screen::GameOver => self.render_game(frame, view),
        }
    }

    fn render_game(&self, frame: &mut Frame, view: &View) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(view), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if *view.screen == Screen::GameOver {
            frame.render_widget(self.render_game_over(view), game_area);
        } else {
            frame.render_widget(self.render_grid(view.state), game_area);
        }

        frame.render_widget(self.render_controls(view.controls), chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let cells = board_cells(state);

        let lines: Vec<Line> = cells
            .chunks(state.grid_width.max(1))
            .map(|row| {
                let spans: Vec<Span> = row.iter().map(|cell| cell_span(*cell)).collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, view: &View) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.state.steps.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(view.metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.metrics.best_score.to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, view: &View) -> Paragraph<'_> {
        let cause = view
            .metrics
            .last_collision
            .map(|collision| format!("The snake {}.", collision.describe()))
            .unwrap_or_default();

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(Span::styled(cause, Style::default().fg(Color::Gray))),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    view.state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Best Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    view.metrics.best_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to exit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, controls: ControlScheme) -> Paragraph<'_> {
        let keys = match controls {
            ControlScheme::Arrows => "↑↓←→",
            ControlScheme::Wasd => "WASD",
            ControlScheme::Both => "↑↓←→/WASD",
        };

        let text = vec![Line::from(vec![
            Span::styled(keys, Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_menu(&self, frame: &mut Frame, menu: &Menu) {
        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for item in MenuItem::ALL {
            let line = if item == menu.selected() {
                Line::from(Span::styled(
                    format!("> {} <", item.label()),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    item.label(),
                    Style::default().fg(Color::White),
                ))
            };
            text.push(line);
        }

        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            "Move with the steering keys, Enter to select",
            Style::default().fg(Color::DarkGray),
        )));

        let menu = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Snake Game Menu "),
        );
        frame.render_widget(menu, centered(frame.area(), 50, 12));
    }

    fn render_how_to_play(&self, frame: &mut Frame, controls: ControlScheme) {
        let mut text = vec![Line::from("")];
        text.extend(how_to_play(controls).into_iter().map(Line::from));
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            "Press any key to return",
            Style::default().fg(Color::DarkGray),
        )));

        let help = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" How to Play "),
        );
        frame.render_widget(help, centered(frame.area(), 64, 10));
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_span(cell: Cell) -> Span<'static> {
    match cell {
        Cell::Head => Span::styled(
            "■ ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Cell::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
        Cell::Apple => Span::styled(
            "O ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Cell::Obstacle => Span::styled("# ", Style::default().fg(Color::Yellow)),
        Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
    }
}

/// Rect of at most `width` x `height` centred in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
