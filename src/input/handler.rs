use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{ControlScheme, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    Confirm,
    Restart,
    Quit,
    None,
}

pub struct InputHandler {
    controls: ControlScheme,
}

impl InputHandler {
    pub fn new(controls: ControlScheme) -> Self {
        Self { controls }
    }

    pub fn controls(&self) -> ControlScheme {
        self.controls
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        if let Some(direction) = self.steering(key.code) {
            return KeyAction::Steer(direction);
        }

        match key.code {
            KeyCode::Enter => KeyAction::Confirm,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            _ => KeyAction::None,
        }
    }

    fn steering(&self, code: KeyCode) -> Option<Direction> {
        let arrows = matches!(self.controls, ControlScheme::Arrows | ControlScheme::Both);
        let wasd = matches!(self.controls, ControlScheme::Wasd | ControlScheme::Both);

        match code {
            KeyCode::Up if arrows => Some(Direction::Up),
            KeyCode::Down if arrows => Some(Direction::Down),
            KeyCode::Left if arrows => Some(Direction::Left),
            KeyCode::Right if arrows => Some(Direction::Right),
            KeyCode::Char(c) if wasd => match c.to_ascii_lowercase() {
                'w' => Some(Direction::Up),
                's' => Some(Direction::Down),
                'a' => Some(Direction::Left),
                'd' => Some(Direction::Right),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(ControlScheme::Both)
    }
}
