// Use cases layer: the arena state machine and the world task that drives it.

pub mod arena;
pub mod dispatch;
pub mod game;
pub mod types;

pub use arena::{Arena, Life};
pub use dispatch::Dispatcher;
pub use game::{WorldSettings, world_task};
pub use types::{Effects, GameEvent, Outbound, Outbox, Recipients, RespawnTicket, ServerEvent};
