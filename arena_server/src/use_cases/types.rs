// Use-case level inputs/outputs for the world task.

use crate::domain::{ArenaMap, Direction, Player, Position, Projectile, SessionId};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Per-session queue of outbound events, drained by the connection task.
pub type Outbox = mpsc::Sender<ServerEvent>;

#[derive(Debug, Clone)]
pub enum GameEvent {
    Connect { session_id: SessionId, outbox: Outbox },
    Disconnect { session_id: SessionId },
    Move { session_id: SessionId, to: Position },
    Shoot {
        session_id: SessionId,
        origin: Position,
        direction: Direction,
    },
    HitReport {
        session_id: SessionId,
        projectile_id: u64,
        target_id: SessionId,
    },
    Respawn(RespawnTicket),
}

/// Scheduled respawn, valid only while the session's epoch is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespawnTicket {
    pub session_id: SessionId,
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    MapData(Arc<ArenaMap>),
    Roster(Vec<Player>),
    PlayerJoined(Player),
    PlayerMoved { id: SessionId, position: Position },
    ProjectileSpawned(Projectile),
    KillUpdate {
        killer: SessionId,
        victim: SessionId,
        killer_kills: u32,
    },
    Eliminated,
    PlayerRemoved(SessionId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    Session(SessionId),
    All,
    AllExcept(SessionId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: Recipients,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn session(id: &SessionId, event: ServerEvent) -> Self {
        Self {
            to: Recipients::Session(id.clone()),
            event,
        }
    }

    pub fn all(event: ServerEvent) -> Self {
        Self {
            to: Recipients::All,
            event,
        }
    }

    pub fn all_except(id: &SessionId, event: ServerEvent) -> Self {
        Self {
            to: Recipients::AllExcept(id.clone()),
            event,
        }
    }
}

/// What a handled event asks the world task to do next.
#[derive(Debug, Default)]
pub struct Effects {
    pub messages: Vec<Outbound>,
    pub respawn: Option<RespawnTicket>,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn messages(messages: Vec<Outbound>) -> Self {
        Self {
            messages,
            respawn: None,
        }
    }
}
