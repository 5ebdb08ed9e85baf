// Domain-level simulation entities and the authoritative world registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Opaque identity of a client session; also the identity of its player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(Arc<str>);

impl SessionId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// One-character display label: the first character of the id, upper-cased.
    pub fn label(&self) -> char {
        self.0
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Unit-length direction vector. Construction normalizes the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    dx: f64,
    dy: f64,
}

impl Direction {
    /// Returns `None` for non-finite or zero-length vectors.
    pub fn new(dx: f64, dy: f64) -> Option<Self> {
        if !dx.is_finite() || !dy.is_finite() {
            return None;
        }
        let len = dx.hypot(dy);
        if !len.is_finite() || len <= f64::EPSILON {
            return None;
        }
        Some(Self {
            dx: dx / len,
            dy: dy / len,
        })
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: SessionId,
    pub position: Position,
    pub label: char,
    pub kills: u32,
}

impl Player {
    pub fn new(id: SessionId, position: Position, kills: u32) -> Self {
        let label = id.label();
        Self {
            id,
            position,
            label,
            kills,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u64,
    pub owner_id: SessionId,
    pub position: Position,
    pub direction: Direction,
    // Epoch milliseconds at creation.
    pub created_at: u64,
}

/// Live players and in-flight projectiles.
///
/// Only the world task owns a `World`; everything else sees snapshots.
#[derive(Debug)]
pub struct World {
    players: HashMap<SessionId, Player>,
    projectiles: Vec<Projectile>,
    next_projectile_id: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
            projectiles: Vec::new(),
            next_projectile_id: 1,
        }
    }

    pub fn player(&self, id: &SessionId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn player_mut(&mut self, id: &SessionId) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    pub fn contains_player(&self, id: &SessionId) -> bool {
        self.players.contains_key(id)
    }

    pub fn insert_player(&mut self, player: Player) {
        self.players.insert(player.id.clone(), player);
    }

    pub fn remove_player(&mut self, id: &SessionId) -> Option<Player> {
        self.players.remove(id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Snapshot of every live player, sorted by id for stable output.
    pub fn roster(&self) -> Vec<Player> {
        let mut players: Vec<Player> = self.players.values().cloned().collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        players
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn spawn_projectile(
        &mut self,
        owner_id: SessionId,
        position: Position,
        direction: Direction,
        created_at: u64,
    ) -> Projectile {
        let projectile = Projectile {
            id: self.next_projectile_id,
            owner_id,
            position,
            direction,
            created_at,
        };
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        self.projectiles.push(projectile.clone());
        projectile
    }

    pub fn remove_projectile(&mut self, id: u64) -> Option<Projectile> {
        let index = self.projectiles.iter().position(|p| p.id == id)?;
        Some(self.projectiles.remove(index))
    }

    /// Drops every projectile owned by `owner_id`; returns how many were dropped.
    pub fn remove_projectiles_of(&mut self, owner_id: &SessionId) -> usize {
        let before = self.projectiles.len();
        self.projectiles.retain(|p| &p.owner_id != owner_id);
        before - self.projectiles.len()
    }

    /// Drops projectiles created before `cutoff` (epoch millis).
    pub fn remove_projectiles_before(&mut self, cutoff: u64) -> usize {
        let before = self.projectiles.len();
        self.projectiles.retain(|p| p.created_at >= cutoff);
        before - self.projectiles.len()
    }
}
