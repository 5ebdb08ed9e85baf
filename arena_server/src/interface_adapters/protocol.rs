// Wire protocol DTOs and conversions for the public game socket.
// Client payloads are validated here, before anything reaches the world task.

use crate::domain::{ArenaMap, Direction, Obstacle, Player, Position, Projectile, SessionId};
use crate::use_cases::{GameEvent, ServerEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upper bound on client-supplied session ids (generated ids are 20 chars).
pub const MAX_TARGET_ID_LEN: usize = 64;

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Assigned identity, sent before anything else.
    Identity { player_id: String },
    // Static arena layout, once per connection.
    MapData(MapDto),
    // Full roster keyed by player id.
    CurrentPlayers(BTreeMap<String, PlayerDto>),
    NewPlayer(PlayerDto),
    PlayerMoved { id: String, x: f64, y: f64 },
    BulletFired(ProjectileDto),
    PlayerKilled {
        killer: String,
        victim: String,
        kills: u32,
    },
    // Sent only to the eliminated player.
    Killed,
    RemovePlayer(String),
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    // Proposed absolute position.
    PlayerMovement { x: f64, y: f64 },
    Shoot { x: f64, y: f64, direction: VectorDto },
    // Unverified claim that `bullet_id` struck `target_id`.
    BulletHit { bullet_id: u64, target_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorDto {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    NonFinitePosition,
    InvalidDirection,
    InvalidTargetId,
}

impl ClientMessage {
    /// Turns a decoded message into a world event on behalf of `session_id`.
    pub fn into_event(self, session_id: &SessionId) -> Result<GameEvent, InputError> {
        match self {
            ClientMessage::PlayerMovement { x, y } => {
                let to = finite_position(x, y)?;
                Ok(GameEvent::Move {
                    session_id: session_id.clone(),
                    to,
                })
            }
            ClientMessage::Shoot { x, y, direction } => {
                let origin = finite_position(x, y)?;
                let direction =
                    Direction::new(direction.x, direction.y).ok_or(InputError::InvalidDirection)?;
                Ok(GameEvent::Shoot {
                    session_id: session_id.clone(),
                    origin,
                    direction,
                })
            }
            ClientMessage::BulletHit {
                bullet_id,
                target_id,
            } => {
                let target_id = target_id.trim();
                if target_id.is_empty() || target_id.len() > MAX_TARGET_ID_LEN {
                    return Err(InputError::InvalidTargetId);
                }
                Ok(GameEvent::HitReport {
                    session_id: session_id.clone(),
                    projectile_id: bullet_id,
                    target_id: SessionId::from(target_id),
                })
            }
        }
    }
}

fn finite_position(x: f64, y: f64) -> Result<Position, InputError> {
    let pos = Position::new(x, y);
    if pos.is_finite() {
        Ok(pos)
    } else {
        Err(InputError::NonFinitePosition)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MapDto {
    pub width: f64,
    pub height: f64,
    pub obstacles: Vec<ObstacleDto>,
}

impl From<&ArenaMap> for MapDto {
    fn from(map: &ArenaMap) -> Self {
        Self {
            width: map.width,
            height: map.height,
            obstacles: map.obstacles.iter().map(ObstacleDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ObstacleDto {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&Obstacle> for ObstacleDto {
    fn from(o: &Obstacle) -> Self {
        Self {
            x: o.x,
            y: o.y,
            width: o.width,
            height: o.height,
            kind: o.kind.clone(),
        }
    }
}

/// Flattened player state for wire transmission.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerDto {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub letter: String,
    pub kills: u32,
}

impl From<&Player> for PlayerDto {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id.to_string(),
            x: p.position.x,
            y: p.position.y,
            letter: p.label.to_string(),
            kills: p.kills,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileDto {
    pub id: u64,
    pub owner: String,
    pub x: f64,
    pub y: f64,
    pub direction: VectorDto,
    pub created_at: u64,
}

impl From<&Projectile> for ProjectileDto {
    fn from(p: &Projectile) -> Self {
        Self {
            id: p.id,
            owner: p.owner_id.to_string(),
            x: p.position.x,
            y: p.position.y,
            direction: VectorDto {
                x: p.direction.dx(),
                y: p.direction.dy(),
            },
            created_at: p.created_at,
        }
    }
}

impl From<ServerEvent> for ServerMessage {
    fn from(event: ServerEvent) -> Self {
        match event {
            ServerEvent::MapData(map) => ServerMessage::MapData(MapDto::from(map.as_ref())),
            ServerEvent::Roster(players) => ServerMessage::CurrentPlayers(
                players
                    .iter()
                    .map(|p| (p.id.to_string(), PlayerDto::from(p)))
                    .collect(),
            ),
            ServerEvent::PlayerJoined(player) => ServerMessage::NewPlayer(PlayerDto::from(&player)),
            ServerEvent::PlayerMoved { id, position } => ServerMessage::PlayerMoved {
                id: id.to_string(),
                x: position.x,
                y: position.y,
            },
            ServerEvent::ProjectileSpawned(p) => ServerMessage::BulletFired(ProjectileDto::from(&p)),
            ServerEvent::KillUpdate {
                killer,
                victim,
                killer_kills,
            } => ServerMessage::PlayerKilled {
                killer: killer.to_string(),
                victim: victim.to_string(),
                kills: killer_kills,
            },
            ServerEvent::Eliminated => ServerMessage::Killed,
            ServerEvent::PlayerRemoved(id) => ServerMessage::RemovePlayer(id.to_string()),
        }
    }
}
