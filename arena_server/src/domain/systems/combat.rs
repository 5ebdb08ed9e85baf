use crate::domain::{Direction, Player, Position, Projectile, SessionId, World};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum HitResolution {
    /// Victim was removed from the world and the reporter credited with a kill.
    Eliminated { victim: Player, killer_kills: u32 },
    /// Target is not a live player (already dead, disconnected or never existed).
    StaleTarget,
    /// Reporter is not alive.
    RejectedReporter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitOutcome {
    pub resolution: HitResolution,
    pub projectile_removed: bool,
}

/// Spawns a projectile for a live `owner`. Dead or unknown shooters get `None`.
pub fn fire(
    world: &mut World,
    owner: &SessionId,
    origin: Position,
    direction: Direction,
    now_ms: u64,
) -> Option<Projectile> {
    if !world.contains_player(owner) {
        return None;
    }
    Some(world.spawn_projectile(owner.clone(), origin, direction, now_ms))
}

/// Applies a client hit claim without geometric verification.
///
/// The named projectile is discarded whatever the outcome.
pub fn resolve_hit(
    world: &mut World,
    reporter: &SessionId,
    projectile_id: u64,
    target: &SessionId,
) -> HitOutcome {
    let projectile_removed = world.remove_projectile(projectile_id).is_some();

    if !world.contains_player(reporter) {
        debug!(%reporter, %target, projectile_id, "hit report from dead reporter ignored");
        return HitOutcome {
            resolution: HitResolution::RejectedReporter,
            projectile_removed,
        };
    }

    if !world.contains_player(target) {
        debug!(%reporter, %target, projectile_id, "hit report for absent target");
        return HitOutcome {
            resolution: HitResolution::StaleTarget,
            projectile_removed,
        };
    }

    // Credit before removal: a victim may report its own death.
    let killer_kills = world
        .player_mut(reporter)
        .map(|killer| {
            killer.kills = killer.kills.saturating_add(1);
            killer.kills
        })
        .unwrap_or_default();

    let Some(victim) = world.remove_player(target) else {
        return HitOutcome {
            resolution: HitResolution::StaleTarget,
            projectile_removed,
        };
    };

    info!(
        victim_id = %victim.id,
        shooter_id = %reporter,
        projectile_id,
        killer_kills,
        "player eliminated"
    );

    HitOutcome {
        resolution: HitResolution::Eliminated {
            victim,
            killer_kills,
        },
        projectile_removed,
    }
}
