use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Where the snake's head is placed when a game starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartCell {
    /// Middle of the grid
    Center,
    /// Top-left tile
    Origin,
}

/// Which keys steer the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlScheme {
    Arrows,
    Wasd,
    Both,
}

/// Configuration for the game
///
/// Positions are measured in world units; every position the engine produces
/// is a multiple of `tile_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in tiles
    pub grid_width: usize,
    /// Height of the game grid in tiles
    pub grid_height: usize,
    /// Edge length of one tile in world units
    pub tile_size: i32,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    pub start_cell: StartCell,
    /// Number of obstacles placed at game start
    pub obstacle_count: usize,
    /// Edge length of each obstacle in tiles
    pub obstacle_tiles: u32,
    /// Period of the simulation tick in milliseconds
    pub tick_interval_ms: u64,
    pub controls: ControlScheme,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl GameConfig {
    /// Classic layout: arrow keys, short snake, single-tile obstacles
    pub fn classic() -> Self {
        Self {
            grid_width: 30,
            grid_height: 30,
            tile_size: 25,
            initial_snake_length: 3,
            start_cell: StartCell::Center,
            obstacle_count: 5,
            obstacle_tiles: 1,
            tick_interval_ms: 150,
            controls: ControlScheme::Arrows,
        }
    }

    /// Arcade layout: WASD, faster ticks, longer snake, big obstacle blocks
    pub fn arcade() -> Self {
        Self {
            grid_width: 48,
            grid_height: 27,
            tile_size: 20,
            initial_snake_length: 6,
            start_cell: StartCell::Origin,
            obstacle_count: 4,
            obstacle_tiles: 5,
            tick_interval_ms: 100,
            controls: ControlScheme::Wasd,
        }
    }

    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Read a JSON configuration file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_over(Self::default(), path)
    }

    /// Read a JSON configuration file whose fields replace those of `base`
    pub fn load_over(base: GameConfig, path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let overrides: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;

        let mut merged = serde_json::to_value(base).context("Failed to serialize base config")?;
        if let Some(fields) = merged.as_object_mut() {
            fields.extend(overrides);
        }

        serde_json::from_value(merged).with_context(|| format!("Invalid config in {:?}", path))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Number of tiles on the board
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Validate configuration parameters
    ///
    /// Returns `Err` with a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.tile_size <= 0 {
            return Err(format!("tile_size must be positive, got {}", self.tile_size));
        }

        if self.grid_width.max(self.grid_height) as i64 * self.tile_size as i64 > i32::MAX as i64 / 2
        {
            return Err("grid extent in world units does not fit in i32".to_string());
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        if self.initial_snake_length > self.cell_count() {
            return Err(format!(
                "initial_snake_length ({}) cannot exceed the number of cells ({})",
                self.initial_snake_length,
                self.cell_count()
            ));
        }

        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be at least 1".to_string());
        }

        if self.obstacle_count > 0 {
            if self.obstacle_tiles == 0 {
                return Err("obstacle_tiles must be at least 1".to_string());
            }

            // Each of the apple and the start cell rules out at most
            // obstacle_tiles^2 origins.
            let footprint = self.obstacle_tiles as usize * self.obstacle_tiles as usize;
            if self.cell_count() <= 2 * footprint {
                return Err(format!(
                    "grid of {} cells is too small for {}x{} obstacles",
                    self.cell_count(),
                    self.obstacle_tiles,
                    self.obstacle_tiles
                ));
            }
        }

        Ok(())
    }
}
