// Domain layer: core simulation types and rules.

pub mod map;
pub mod state;
pub mod systems;
pub mod tuning;

pub use map::{ArenaMap, MapError, Obstacle};
pub use state::{Direction, Player, Position, Projectile, SessionId, World};
