//! Gameplay tuning for player avatars.
//!
//! Keep this separate from runtime/server configuration (ports, buffer sizes, etc.).

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Half-width of the square footprint used for terrain and bounds checks.
    pub radius: f64,

    /// Time a victim stays out of the world before respawning.
    pub respawn_delay: Duration,

    /// Candidate positions the spawn allocator draws before falling back to the map center.
    pub max_spawn_attempts: usize,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 20.0,
            respawn_delay: Duration::from_millis(5000),
            max_spawn_attempts: 100,
        }
    }
}
