use super::{
    config::{GameConfig, StartCell},
    direction::Direction,
    state::{CollisionType, GameState, Obstacle, Position, RunState, Snake},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Random draws per obstacle before falling back to a full scan of the grid
const SPAWN_ATTEMPTS: usize = 1000;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether the snake ate the apple this tick
    pub ate_apple: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
    /// Whether the game is over after this tick
    pub terminated: bool,
}

impl TickOutcome {
    fn idle(state: &GameState) -> Self {
        Self {
            ate_apple: false,
            collision: None,
            terminated: state.run_state == RunState::GameOver,
        }
    }
}

/// The simulation engine
///
/// Owns the whole game state. The host calls [`GameEngine::tick`] from a
/// fixed-interval timer and [`GameEngine::set_direction`] from input events.
/// The configuration is expected to pass [`GameConfig::validate`].
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    state: GameState,
}

impl GameEngine {
    /// Create an engine seeded from OS entropy
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine with a reproducible apple and obstacle sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let mut engine = Self {
            state: Self::blank_state(&config),
            config,
            rng,
        };
        engine.populate();
        engine.state.run_state = RunState::NotStarted;
        engine
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Snapshot of the current game
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Reset every entity and start a new game
    pub fn initialize(&mut self) {
        self.state = Self::blank_state(&self.config);
        self.populate();
        self.state.run_state = RunState::Running;

        tracing::info!(
            grid_width = self.config.grid_width,
            grid_height = self.config.grid_height,
            tile_size = self.config.tile_size,
            initial_length = self.config.initial_snake_length,
            obstacles = self.state.obstacles.len(),
            "game started"
        );
    }

    /// Queue a turn for the next tick; reversals are ignored
    pub fn set_direction(&mut self, requested: Direction) {
        if !self.state.is_running() {
            return;
        }
        if !self.state.snake.steer(requested) {
            tracing::debug!(?requested, current = ?self.state.snake.direction, "reversal ignored");
        }
    }

    /// Advance the game by one step
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.run_state != RunState::Running {
            return TickOutcome::idle(&self.state);
        }

        self.state.snake.advance(self.config.tile_size);
        self.state.steps += 1;

        if let Some(collision) = self.check_collision() {
            self.state.run_state = RunState::GameOver;
            tracing::info!(
                score = self.state.score,
                steps = self.state.steps,
                cause = collision.describe(),
                "game over"
            );

            return TickOutcome {
                ate_apple: false,
                collision: Some(collision),
                terminated: true,
            };
        }

        let ate_apple = self.state.snake.head() == self.state.apple;
        if ate_apple {
            self.state.score += 1;
            self.state.snake.grow();
            self.state.apple = self.random_tile();
            tracing::debug!(
                score = self.state.score,
                length = self.state.snake.len(),
                apple = ?self.state.apple,
                "apple eaten"
            );
        }

        TickOutcome {
            ate_apple,
            collision: None,
            terminated: false,
        }
    }

    /// Check the moved head against walls, the body and obstacles, in that order
    fn check_collision(&self) -> Option<CollisionType> {
        let head = self.state.snake.head();

        if !self.state.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if self.state.snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        if self.state.hits_obstacle(head) {
            return Some(CollisionType::Obstacle);
        }

        None
    }

    fn blank_state(config: &GameConfig) -> GameState {
        let tile = config.tile_size;
        let start = match config.start_cell {
            StartCell::Center => Position::new(
                (config.grid_width / 2) as i32 * tile,
                (config.grid_height / 2) as i32 * tile,
            ),
            StartCell::Origin => Position::new(0, 0),
        };

        // The last moves of a live snake cover distinct cells, so growth
        // stops short of cells + initial length even while it uncoils.
        let snake = Snake::new(
            start,
            Direction::Right,
            config.initial_snake_length,
            config.cell_count() + config.initial_snake_length + 1,
        );

        GameState::new(
            snake,
            start,
            config.grid_width,
            config.grid_height,
            tile,
        )
    }

    /// Spawn the apple, then obstacles that keep clear of it and the snake
    fn populate(&mut self) {
        self.state.apple = self.random_tile();

        let size = self.config.obstacle_tiles as i32 * self.config.tile_size;
        let mut obstacles = Vec::with_capacity(self.config.obstacle_count);

        for _ in 0..self.config.obstacle_count {
            match self.spawn_obstacle(size) {
                Some(obstacle) => obstacles.push(obstacle),
                None => {
                    tracing::warn!(
                        placed = obstacles.len(),
                        requested = self.config.obstacle_count,
                        "no room left for obstacles"
                    );
                    break;
                }
            }
        }

        tracing::debug!(count = obstacles.len(), "obstacles placed");
        self.state.obstacles = obstacles;
    }

    fn spawn_obstacle(&mut self, size: i32) -> Option<Obstacle> {
        for _ in 0..SPAWN_ATTEMPTS {
            let candidate = Obstacle::square(self.random_tile(), size);
            if !self.blocks_spawn(&candidate) {
                return Some(candidate);
            }
        }

        let tile = self.config.tile_size;
        (0..self.config.grid_height as i32)
            .flat_map(|y| (0..self.config.grid_width as i32).map(move |x| (x, y)))
            .map(|(x, y)| Obstacle::square(Position::new(x * tile, y * tile), size))
            .find(|candidate| !self.blocks_spawn(candidate))
    }

    fn blocks_spawn(&self, candidate: &Obstacle) -> bool {
        let tile = self.config.tile_size;
        candidate.overlaps_tile(self.state.apple, tile)
            || self
                .state
                .snake
                .body()
                .iter()
                .any(|&segment| candidate.overlaps_tile(segment, tile))
    }

    /// Uniformly random tile-aligned position on the grid
    fn random_tile(&mut self) -> Position {
        let tile = self.config.tile_size;
        let x = self.rng.gen_range(0..self.config.grid_width) as i32;
        let y = self.rng.gen_range(0..self.config.grid_height) as i32;
        Position::new(x * tile, y * tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_config(width: usize, height: usize, tile_size: i32) -> GameConfig {
        GameConfig {
            grid_width: width,
            grid_height: height,
            tile_size,
            obstacle_count: 0,
            ..GameConfig::default()
        }
    }

    /// Engine running a hand-built layout with the apple parked far away
    fn engine_with(config: GameConfig, body: Vec<Position>, direction: Direction) -> GameEngine {
        let mut engine = GameEngine::with_seed(config, 7);
        let capacity = engine.config.cell_count() + body.len() + 1;
        let far = Position::new(
            (engine.config.grid_width as i32 - 1) * engine.config.tile_size,
            (engine.config.grid_height as i32 - 1) * engine.config.tile_size,
        );
        engine.state = GameState::new(
            Snake::from_segments(body, direction, capacity),
            far,
            engine.config.grid_width,
            engine.config.grid_height,
            engine.config.tile_size,
        );
        engine
    }

    fn row(head: (i32, i32), length: i32) -> Vec<Position> {
        (0..length)
            .map(|i| Position::new(head.0 - i, head.1))
            .collect()
    }

    #[test]
    fn test_new_engine_waits_for_initialize() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        assert_eq!(engine.state().run_state, RunState::NotStarted);

        let before = engine.state().clone();
        let outcome = engine.tick();
        assert!(!outcome.terminated);
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_initialize() {
        let mut engine = GameEngine::with_seed(GameConfig::classic(), 3);
        engine.initialize();
        let state = engine.state();

        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.snake.head(), Position::new(15 * 25, 15 * 25));
        assert_eq!(state.obstacles.len(), 5);
        assert_eq!(state.snake.capacity(), 30 * 30 + 3 + 1);

        assert_eq!(state.apple.x % 25, 0);
        assert_eq!(state.apple.y % 25, 0);
        assert!(state.is_in_bounds(state.apple));
    }

    #[test]
    fn test_arcade_starts_at_origin() {
        let mut engine = GameEngine::with_seed(GameConfig::arcade(), 3);
        engine.initialize();
        let state = engine.state();

        assert_eq!(state.snake.head(), Position::new(0, 0));
        assert_eq!(state.snake.len(), 6);
        assert!(state.obstacles.iter().all(|o| o.width == 100 && o.height == 100));
    }

    #[test]
    fn test_obstacles_avoid_apple_and_snake() {
        for seed in 0..200 {
            let mut config = GameConfig::new(8, 8);
            config.obstacle_count = 6;
            config.obstacle_tiles = 2;
            let mut engine = GameEngine::with_seed(config, seed);
            engine.initialize();
            let state = engine.state();

            for obstacle in &state.obstacles {
                assert!(!obstacle.overlaps_tile(state.apple, state.tile_size));
                for &segment in state.snake.body() {
                    assert!(!obstacle.overlaps_tile(segment, state.tile_size));
                }
                assert_eq!(obstacle.origin.x % state.tile_size, 0);
                assert_eq!(obstacle.origin.y % state.tile_size, 0);
            }
        }
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine_with(bare_config(20, 20, 1), row((5, 5), 4), Direction::Right);
        let before: Vec<Position> = engine.state().snake.body().to_vec();

        let outcome = engine.tick();

        assert!(!outcome.terminated);
        assert!(!outcome.ate_apple);
        let after = engine.state().snake.body();
        assert_eq!(after[0], Position::new(6, 5));
        assert_eq!(&after[1..], &before[..3]);
        assert_eq!(engine.state().snake.len(), 4);
        assert_eq!(engine.state().steps, 1);
    }

    #[test]
    fn test_movement_uses_tile_size() {
        let body = vec![Position::new(100, 100), Position::new(75, 100)];
        let mut engine = engine_with(bare_config(10, 10, 25), body, Direction::Right);

        engine.set_direction(Direction::Down);
        engine.tick();

        assert_eq!(engine.state().snake.head(), Position::new(100, 125));
        assert_eq!(engine.state().snake.body()[1], Position::new(100, 100));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine_with(bare_config(10, 10, 1), row((5, 5), 3), Direction::Right);

        engine.set_direction(Direction::Left);
        assert_eq!(engine.state().snake.direction, Direction::Right);
        assert_eq!(engine.state().snake.next_direction, Direction::Right);

        engine.tick();
        assert_eq!(engine.state().snake.head(), Position::new(6, 5));
    }

    #[test]
    fn test_quick_double_turn_cannot_reverse() {
        let mut engine = engine_with(bare_config(10, 10, 1), row((5, 5), 3), Direction::Right);

        engine.set_direction(Direction::Up);
        engine.set_direction(Direction::Left);
        let outcome = engine.tick();

        assert!(!outcome.terminated);
        assert_eq!(engine.state().snake.direction, Direction::Up);
        assert_eq!(engine.state().snake.head(), Position::new(5, 4));
    }

    #[test]
    fn test_apple_consumption() {
        let mut engine = engine_with(bare_config(10, 10, 1), row((5, 5), 3), Direction::Right);
        engine.state.apple = Position::new(6, 5);

        let outcome = engine.tick();

        assert!(outcome.ate_apple);
        assert_eq!(engine.state().score, 1);
        assert_eq!(engine.state().snake.len(), 4);
        assert!(engine.state().is_in_bounds(engine.state().apple));

        // The revealed segment is the cell the tail just left
        assert_eq!(engine.state().snake.body()[3], Position::new(3, 5));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine_with(bare_config(10, 10, 1), row((0, 5), 1), Direction::Left);

        let outcome = engine.tick();

        assert!(outcome.terminated);
        assert_eq!(outcome.collision, Some(CollisionType::Wall));
        assert_eq!(engine.state().run_state, RunState::GameOver);
        assert_eq!(engine.state().score, 0);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine_with(bare_config(10, 10, 1), row((5, 5), 4), Direction::Right);

        // Grow to five segments on the first step
        engine.state.apple = Position::new(6, 5);
        assert!(engine.tick().ate_apple);
        engine.state.apple = Position::new(0, 9);

        // Body: (6,5) (5,5) (4,5) (3,5) (2,5)
        engine.set_direction(Direction::Down);
        engine.tick();
        engine.set_direction(Direction::Left);
        engine.tick();
        engine.set_direction(Direction::Up);
        let outcome = engine.tick();

        assert!(outcome.terminated);
        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
        assert_eq!(engine.state().snake.head(), Position::new(5, 5));
    }

    #[test]
    fn test_square_loop_bites_vacated_tail() {
        let mut engine = engine_with(bare_config(10, 10, 1), row((5, 5), 4), Direction::Right);

        engine.set_direction(Direction::Down);
        assert!(!engine.tick().terminated);
        engine.set_direction(Direction::Left);
        assert!(!engine.tick().terminated);
        engine.set_direction(Direction::Up);
        let outcome = engine.tick();

        assert!(outcome.terminated);
        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
        assert_eq!(engine.state().snake.head(), Position::new(4, 5));
        assert_eq!(engine.state().run_state, RunState::GameOver);
    }

    #[test]
    fn test_full_grid_snake_never_outgrows_its_buffer() {
        let config = GameConfig {
            grid_width: 2,
            grid_height: 2,
            tile_size: 1,
            initial_snake_length: 4,
            start_cell: StartCell::Origin,
            obstacle_count: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());

        let mut engine = GameEngine::with_seed(config, 5);
        engine.initialize();

        // Eat while the body is still uncoiling from the origin
        engine.state.apple = Position::new(1, 1);
        assert!(!engine.tick().terminated);
        engine.set_direction(Direction::Down);
        assert!(engine.tick().ate_apple);
        assert_eq!(engine.state().snake.len(), 5);

        engine.state.apple = Position::new(0, 0);
        engine.set_direction(Direction::Left);
        assert!(!engine.tick().terminated);
        engine.set_direction(Direction::Up);
        let outcome = engine.tick();

        assert!(outcome.terminated);
        assert!(!outcome.ate_apple);
        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
        assert_eq!(engine.state().score, 1);
    }

    #[test]
    fn test_unplaceable_obstacles_are_skipped() {
        // One tile holds the apple and the snake, leaving nowhere for obstacles
        let mut engine = GameEngine::with_seed(GameConfig::new(1, 1), 0);
        assert!(engine.state().obstacles.is_empty());

        engine.initialize();
        assert!(engine.state().obstacles.is_empty());
        assert_eq!(engine.tick().collision, Some(CollisionType::Wall));
    }

    #[test]
    fn test_crowded_grid_still_places_obstacles() {
        let config = GameConfig {
            grid_width: 3,
            grid_height: 1,
            tile_size: 1,
            initial_snake_length: 1,
            obstacle_count: 3,
            ..GameConfig::default()
        };
        let mut engine = GameEngine::with_seed(config, 9);
        engine.initialize();
        let state = engine.state();

        assert_eq!(state.obstacles.len(), 3);
        for obstacle in &state.obstacles {
            assert!(!obstacle.overlaps_tile(state.apple, 1));
            assert!(!obstacle.overlaps_tile(state.snake.head(), 1));
        }
    }

    #[test]
    fn test_obstacle_collision() {
        let mut engine = engine_with(bare_config(10, 10, 1), row((4, 5), 3), Direction::Right);
        engine
            .state
            .obstacles
            .push(Obstacle::square(Position::new(5, 5), 1));

        let outcome = engine.tick();

        assert!(outcome.terminated);
        assert_eq!(outcome.collision, Some(CollisionType::Obstacle));
    }

    #[test]
    fn test_large_obstacle_hit_by_overlap() {
        let body = vec![Position::new(60, 200), Position::new(40, 200)];
        let mut engine = engine_with(bare_config(20, 20, 20), body, Direction::Right);
        engine
            .state
            .obstacles
            .push(Obstacle::square(Position::new(80, 120), 100));

        let outcome = engine.tick();

        assert_eq!(outcome.collision, Some(CollisionType::Obstacle));
    }

    #[test]
    fn test_wall_checked_before_obstacle() {
        let mut engine = engine_with(bare_config(10, 10, 1), row((9, 0), 1), Direction::Right);
        engine
            .state
            .obstacles
            .push(Obstacle::square(Position::new(10, 0), 1));

        assert_eq!(engine.tick().collision, Some(CollisionType::Wall));
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let mut engine = engine_with(bare_config(10, 10, 1), row((0, 5), 2), Direction::Left);
        engine.tick();
        let frozen = engine.state().clone();

        for _ in 0..5 {
            engine.set_direction(Direction::Up);
            let outcome = engine.tick();
            assert!(outcome.terminated);
            assert_eq!(outcome.collision, None);
        }
        assert_eq!(engine.state(), &frozen);

        engine.initialize();
        assert!(engine.state().is_running());
        assert_eq!(engine.state().steps, 0);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let mut a = GameEngine::with_seed(GameConfig::arcade(), 42);
        let mut b = GameEngine::with_seed(GameConfig::arcade(), 42);
        a.initialize();
        b.initialize();

        assert_eq!(a.state().apple, b.state().apple);
        assert_eq!(a.state().obstacles, b.state().obstacles);
    }
}
