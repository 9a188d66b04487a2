pub mod renderer;

pub use renderer::{Cell, Renderer, View, board_cells};
