use std::time::{Duration, Instant};

use crate::game::CollisionType;

/// Statistics kept for the lifetime of one process
pub struct SessionMetrics {
    pub started_at: Option<Instant>,
    pub elapsed: Duration,
    pub best_score: u32,
    pub games_played: u32,
    pub last_collision: Option<CollisionType>,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            started_at: None,
            elapsed: Duration::ZERO,
            best_score: 0,
            games_played: 0,
            last_collision: None,
        }
    }

    /// Refresh the clock of the game in progress
    pub fn update(&mut self) {
        if let Some(started_at) = self.started_at {
            self.elapsed = started_at.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.started_at = Some(Instant::now());
        self.elapsed = Duration::ZERO;
        self.last_collision = None;
    }

    /// Freeze the clock and fold the final score into the session
    pub fn on_game_over(&mut self, final_score: u32, collision: Option<CollisionType>) {
        self.update();
        self.started_at = None;
        self.games_played += 1;
        self.best_score = self.best_score.max(final_score);
        self.last_collision = collision;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
