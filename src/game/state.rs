use super::direction::Direction;

/// A position in world units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one tile in a direction
    pub fn stepped(&self, direction: Direction, tile_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * tile_size, dy * tile_size)
    }
}

/// An axis-aligned block the snake must not touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obstacle {
    pub origin: Position,
    pub width: i32,
    pub height: i32,
}

impl Obstacle {
    pub fn new(origin: Position, width: i32, height: i32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Square obstacle of `size` world units
    pub fn square(origin: Position, size: i32) -> Self {
        Self::new(origin, size, size)
    }

    /// Rectangle overlap against the tile whose top-left corner is `pos`
    pub fn overlaps_tile(&self, pos: Position, tile_size: i32) -> bool {
        pos.x < self.origin.x + self.width
            && pos.x + tile_size > self.origin.x
            && pos.y < self.origin.y + self.height
            && pos.y + tile_size > self.origin.y
    }
}

/// The snake in the game
///
/// Segments live in a fixed-capacity buffer. Only the first `length` entries
/// are body; the slot at `length` remembers the cell the tail just left so
/// that growing reveals it on the next move.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    segments: Vec<Position>,
    length: usize,
    /// Direction applied by the last tick
    pub direction: Direction,
    /// Direction the next tick will apply
    pub next_direction: Direction,
}

impl Snake {
    /// Create a snake whose segments are all coiled on `head`
    pub fn new(head: Position, direction: Direction, length: usize, capacity: usize) -> Self {
        Self::from_segments(vec![head; length], direction, capacity)
    }

    /// Create a snake from explicit body positions, head first
    pub fn from_segments(body: Vec<Position>, direction: Direction, capacity: usize) -> Self {
        let length = body.len();
        assert!(length > 0, "snake needs at least one segment");
        assert!(
            capacity > length,
            "snake capacity {} must exceed its length {}",
            capacity,
            length
        );

        let tail = body[length - 1];
        let mut segments = body;
        segments.resize(capacity, tail);

        Self {
            segments,
            length,
            direction,
            next_direction: direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.segments[0]
    }

    /// Occupied segments, head first
    pub fn body(&self) -> &[Position] {
        &self.segments[..self.length]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.segments[1..self.length]
    }

    /// Check if position collides with snake body (excluding head)
    ///
    /// The trailing slot counts: a head that moves onto the cell the tail
    /// just left has bitten itself.
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.segments[1..=self.length].contains(&pos)
    }

    /// Queue a turn unless it reverses the committed direction
    pub fn steer(&mut self, requested: Direction) -> bool {
        if self.direction.is_opposite(requested) {
            return false;
        }
        self.next_direction = requested;
        true
    }

    /// Commit the queued turn, shift every segment into its predecessor's
    /// cell and move the head one tile
    pub fn advance(&mut self, tile_size: i32) {
        self.direction = self.next_direction;

        for i in (1..=self.length).rev() {
            self.segments[i] = self.segments[i - 1];
        }

        self.segments[0] = self.segments[0].stepped(self.direction, tile_size);
    }

    /// Extend the body by the trailing slot
    ///
    /// Panics if the buffer has no room left. The engine sizes capacity to
    /// the grid plus the initial length, which a live snake cannot outgrow.
    pub fn grow(&mut self) {
        assert!(
            self.length + 1 < self.segments.len(),
            "snake length {} exhausted capacity {}",
            self.length,
            self.segments.len()
        );
        self.length += 1;
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.length
    }

    /// A snake always keeps its head, so this never holds after construction
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn capacity(&self) -> usize {
        self.segments.len()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake ran into an obstacle
    Obstacle,
}

impl CollisionType {
    pub fn describe(&self) -> &'static str {
        match self {
            CollisionType::Wall => "hit the wall",
            CollisionType::SelfCollision => "bit itself",
            CollisionType::Obstacle => "crashed into an obstacle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub apple: Position,
    pub obstacles: Vec<Obstacle>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub tile_size: i32,
    pub score: u32,
    pub steps: u32,
    pub run_state: RunState,
}

impl GameState {
    /// Create a running game state with no obstacles
    pub fn new(
        snake: Snake,
        apple: Position,
        grid_width: usize,
        grid_height: usize,
        tile_size: i32,
    ) -> Self {
        Self {
            snake,
            apple,
            obstacles: Vec::new(),
            grid_width,
            grid_height,
            tile_size,
            score: 0,
            steps: 0,
            run_state: RunState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Width of the board in world units
    pub fn world_width(&self) -> i32 {
        self.grid_width as i32 * self.tile_size
    }

    /// Height of the board in world units
    pub fn world_height(&self) -> i32 {
        self.grid_height as i32 * self.tile_size
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.world_width() && pos.y >= 0 && pos.y < self.world_height()
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body().contains(&pos)
    }

    /// Check if the tile at `pos` touches any obstacle
    pub fn hits_obstacle(&self, pos: Position) -> bool {
        self.obstacles
            .iter()
            .any(|obstacle| obstacle.overlaps_tile(pos, self.tile_size))
    }

    /// Tile coordinates of a world position
    pub fn tile_of(&self, pos: Position) -> (i32, i32) {
        (
            pos.x.div_euclid(self.tile_size),
            pos.y.div_euclid(self.tile_size),
        )
    }
}
