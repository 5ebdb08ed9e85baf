//! Gameplay tuning for projectiles.
//!
//! Flight and collision are simulated by clients; the server only needs to know
//! when an unreported projectile can be forgotten.

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Age after which an unreported projectile is discarded.
    pub life_time: Duration,

    /// How often the world task sweeps expired projectiles.
    pub sweep_interval: Duration,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            // Clients move bullets 600 px/s; a map diagonal takes ~3.3s.
            life_time: Duration::from_millis(5000),
            sweep_interval: Duration::from_secs(1),
        }
    }
}
