//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! A host drives it with timer ticks and direction changes and reads back the state.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::{ControlScheme, GameConfig, StartCell};
pub use direction::Direction;
pub use engine::{GameEngine, TickOutcome};
pub use state::{CollisionType, GameState, Obstacle, Position, RunState, Snake};
