// Authoritative arena: session lifecycle plus the move/shoot/hit/respawn state machine.
//
// Every method runs to completion on the world task and returns the messages to fan
// out; nothing here touches the network.

use super::types::{Effects, Outbound, RespawnTicket, ServerEvent};
use crate::domain::systems::combat::{self, HitResolution};
use crate::domain::systems::{movement, spawn};
use crate::domain::tuning::player::PlayerTuning;
use crate::domain::{ArenaMap, Direction, Player, Position, SessionId, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Life {
    Alive,
    PendingRespawn,
}

#[derive(Debug)]
struct SessionRecord {
    // Bumped on every elimination so only the latest respawn ticket is honored.
    epoch: u64,
    life: Life,
    // Kill count carried across a death.
    banked_kills: u32,
}

pub struct Arena<R = StdRng> {
    map: Arc<ArenaMap>,
    tuning: PlayerTuning,
    world: World,
    sessions: HashMap<SessionId, SessionRecord>,
    next_epoch: u64,
    rng: R,
}

impl Arena<StdRng> {
    pub fn new(map: Arc<ArenaMap>, tuning: PlayerTuning) -> Self {
        Self::with_rng(map, tuning, StdRng::from_entropy())
    }
}

impl<R: Rng> Arena<R> {
    pub fn with_rng(map: Arc<ArenaMap>, tuning: PlayerTuning, rng: R) -> Self {
        Self {
            map,
            tuning,
            world: World::new(),
            sessions: HashMap::new(),
            next_epoch: 1,
            rng,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn map(&self) -> &Arc<ArenaMap> {
        &self.map
    }

    pub fn life(&self, id: &SessionId) -> Option<Life> {
        self.sessions.get(id).map(|s| s.life)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn bump_epoch(&mut self) -> u64 {
        let epoch = self.next_epoch;
        self.next_epoch = self.next_epoch.wrapping_add(1);
        epoch
    }

    fn spawn_point(&mut self) -> Position {
        spawn::allocate_spawn(
            &self.map,
            self.tuning.radius,
            self.tuning.max_spawn_attempts,
            &mut self.rng,
        )
    }

    /// Places a fresh player for a newly opened session.
    pub fn connect(&mut self, id: SessionId) -> Effects {
        if self.sessions.contains_key(&id) {
            warn!(session_id = %id, "duplicate session id; connect ignored");
            return Effects::none();
        }

        let epoch = self.bump_epoch();
        self.sessions.insert(
            id.clone(),
            SessionRecord {
                epoch,
                life: Life::Alive,
                banked_kills: 0,
            },
        );

        let position = self.spawn_point();
        let player = Player::new(id.clone(), position, 0);
        self.world.insert_player(player.clone());
        info!(session_id = %id, x = position.x, y = position.y, "player joined");

        Effects::messages(vec![
            Outbound::session(&id, ServerEvent::MapData(self.map.clone())),
            Outbound::session(&id, ServerEvent::Roster(self.world.roster())),
            Outbound::all_except(&id, ServerEvent::PlayerJoined(player)),
        ])
    }

    /// Forgets the session. Removal is announced only if a player was live.
    pub fn disconnect(&mut self, id: &SessionId) -> Effects {
        let Some(record) = self.sessions.remove(id) else {
            return Effects::none();
        };
        let dropped = self.world.remove_projectiles_of(id);
        let removed = self.world.remove_player(id).is_some();
        info!(
            session_id = %id,
            life = ?record.life,
            dropped_projectiles = dropped,
            "player left"
        );

        if removed {
            Effects::messages(vec![Outbound::all(ServerEvent::PlayerRemoved(id.clone()))])
        } else {
            Effects::none()
        }
    }

    /// Commits `to` if the validator accepts it; rejections are silent.
    pub fn move_player(&mut self, id: &SessionId, to: Position) -> Effects {
        let radius = self.tuning.radius;
        let Some(player) = self.world.player_mut(id) else {
            return Effects::none();
        };

        match movement::validate_move(&self.map, to, radius) {
            Ok(position) => {
                player.position = position;
                Effects::messages(vec![Outbound::all_except(
                    id,
                    ServerEvent::PlayerMoved {
                        id: id.clone(),
                        position,
                    },
                )])
            }
            Err(reason) => {
                debug!(session_id = %id, ?reason, x = to.x, y = to.y, "move rejected");
                Effects::none()
            }
        }
    }

    pub fn shoot(
        &mut self,
        id: &SessionId,
        origin: Position,
        direction: Direction,
        now_ms: u64,
    ) -> Effects {
        match combat::fire(&mut self.world, id, origin, direction, now_ms) {
            Some(projectile) => {
                Effects::messages(vec![Outbound::all(ServerEvent::ProjectileSpawned(projectile))])
            }
            None => {
                debug!(session_id = %id, "shot from player not in world ignored");
                Effects::none()
            }
        }
    }

    /// Honors a client's hit claim and schedules the victim's respawn.
    pub fn report_hit(
        &mut self,
        reporter: &SessionId,
        projectile_id: u64,
        target: &SessionId,
    ) -> Effects {
        let outcome = combat::resolve_hit(&mut self.world, reporter, projectile_id, target);
        let HitResolution::Eliminated {
            victim,
            killer_kills,
        } = outcome.resolution
        else {
            return Effects::none();
        };

        let epoch = self.bump_epoch();
        let respawn = match self.sessions.get_mut(&victim.id) {
            Some(record) => {
                record.epoch = epoch;
                record.life = Life::PendingRespawn;
                record.banked_kills = victim.kills;
                Some(RespawnTicket {
                    session_id: victim.id.clone(),
                    epoch,
                })
            }
            None => {
                warn!(victim_id = %victim.id, "eliminated player had no session record");
                None
            }
        };

        Effects {
            messages: vec![
                Outbound::all(ServerEvent::KillUpdate {
                    killer: reporter.clone(),
                    victim: victim.id.clone(),
                    killer_kills,
                }),
                Outbound::session(&victim.id, ServerEvent::Eliminated),
                Outbound::all(ServerEvent::PlayerRemoved(victim.id.clone())),
            ],
            respawn,
        }
    }

    /// Brings a pending victim back. Stale tickets (session gone or re-killed) are dropped.
    pub fn respawn(&mut self, ticket: &RespawnTicket) -> Effects {
        let kills = match self.sessions.get(&ticket.session_id) {
            Some(record) if record.epoch == ticket.epoch && record.life == Life::PendingRespawn => {
                record.banked_kills
            }
            Some(_) => {
                debug!(session_id = %ticket.session_id, epoch = ticket.epoch, "stale respawn dropped");
                return Effects::none();
            }
            None => {
                debug!(session_id = %ticket.session_id, "respawn for closed session dropped");
                return Effects::none();
            }
        };

        let position = self.spawn_point();
        let player = Player::new(ticket.session_id.clone(), position, kills);
        self.world.insert_player(player.clone());
        if let Some(record) = self.sessions.get_mut(&ticket.session_id) {
            record.life = Life::Alive;
        }
        info!(session_id = %ticket.session_id, x = position.x, y = position.y, "player respawned");

        Effects::messages(vec![
            Outbound::all(ServerEvent::PlayerJoined(player)),
            Outbound::session(&ticket.session_id, ServerEvent::Roster(self.world.roster())),
        ])
    }

    /// Forgets projectiles older than `life_time_ms`; returns how many were dropped.
    pub fn expire_projectiles(&mut self, now_ms: u64, life_time_ms: u64) -> usize {
        self.world
            .remove_projectiles_before(now_ms.saturating_sub(life_time_ms))
    }
}
