pub mod human;
pub mod menu;

pub use human::HumanMode;
pub use menu::{Menu, MenuItem, Screen};
