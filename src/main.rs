use anyhow::Result;
use clap::{Parser, ValueEnum};
use snake_games::game::GameConfig;
use snake_games::logging::init_tracing;
use snake_games::modes::HumanMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snake_games")]
#[command(version, about = "Snake on a grid, with obstacles")]
struct Cli {
    /// Preset to start from
    #[arg(long, value_enum, default_value = "classic")]
    variant: Variant,

    /// JSON config file layered over the preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in tiles
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in tiles
    #[arg(long)]
    height: Option<usize>,

    /// Tile edge length in world units
    #[arg(long)]
    tile_size: Option<i32>,

    /// Milliseconds between simulation ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Number of obstacles per game
    #[arg(long)]
    obstacles: Option<usize>,

    /// Starting snake length
    #[arg(long)]
    initial_length: Option<usize>,

    /// Seed for apple and obstacle placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write tracing output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Variant {
    /// Arrow keys, 30x30 grid, single-tile obstacles
    Classic,
    /// WASD, faster, longer snake, large obstacle blocks
    Arcade,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let preset = match self.variant {
            Variant::Classic => GameConfig::classic(),
            Variant::Arcade => GameConfig::arcade(),
        };
        let mut config = match &self.config {
            Some(path) => GameConfig::load_over(preset, path)?,
            None => preset,
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(obstacles) = self.obstacles {
            config.obstacle_count = obstacles;
        }
        if let Some(length) = self.initial_length {
            config.initial_snake_length = length;
        }

        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    tracing::info!(?config, seed = ?cli.seed, "configuration loaded");

    let mut human_mode = match cli.seed {
        Some(seed) => HumanMode::with_seed(config, seed),
        None => HumanMode::new(config),
    };
    human_mode.run().await?;

    Ok(())
}
