//! Screen state machine shown around the simulation

use crate::game::{ControlScheme, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    HowToPlay,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::Start, MenuItem::HowToPlay, MenuItem::Exit];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Start => "Start Game",
            MenuItem::HowToPlay => "How to Play",
            MenuItem::Exit => "Exit",
        }
    }
}

/// Main menu with a wrapping cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Menu {
    selected: usize,
}

impl Menu {
    pub fn selected(&self) -> MenuItem {
        MenuItem::ALL[self.selected]
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        let count = MenuItem::ALL.len();
        match direction {
            Direction::Up | Direction::Left => self.selected = (self.selected + count - 1) % count,
            Direction::Down | Direction::Right => self.selected = (self.selected + 1) % count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu(Menu),
    HowToPlay,
    Playing,
    GameOver,
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Menu(Menu::default())
    }
}

pub fn how_to_play(controls: ControlScheme) -> [&'static str; 4] {
    let steer = match controls {
        ControlScheme::Arrows => "Use the arrow keys to control the snake.",
        ControlScheme::Wasd => "Use W, A, S, D to control the snake.",
        ControlScheme::Both => "Use the arrow keys or W, A, S, D to control the snake.",
    };

    [
        steer,
        "Eat the red apples to grow longer.",
        "Avoid the walls, your own body and the obstacles.",
        "Hitting any of them ends the game.",
    ]
}
