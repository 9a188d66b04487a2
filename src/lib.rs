//! Snake Games - a grid-based Snake simulation with a terminal front end
//!
//! This library provides:
//! - The simulation engine (game module): movement, apples, obstacles, collisions
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - Interactive play with menu and game-over screens (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
