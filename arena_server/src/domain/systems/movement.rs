use crate::domain::{ArenaMap, Obstacle, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    NonFinite,
    OutOfBounds,
    Blocked,
}

/// Bounds are inclusive: a player may touch the map edge with its footprint.
pub fn within_bounds(map: &ArenaMap, pos: Position, radius: f64) -> bool {
    pos.x >= radius
        && pos.x <= map.width - radius
        && pos.y >= radius
        && pos.y <= map.height - radius
}

/// Square footprint (side 2*radius) vs obstacle rectangle; touching edges do not overlap.
pub fn overlaps(obstacle: &Obstacle, pos: Position, radius: f64) -> bool {
    pos.x + radius > obstacle.x
        && pos.x - radius < obstacle.x + obstacle.width
        && pos.y + radius > obstacle.y
        && pos.y - radius < obstacle.y + obstacle.height
}

pub fn overlaps_terrain(map: &ArenaMap, pos: Position, radius: f64) -> bool {
    map.obstacles.iter().any(|o| overlaps(o, pos, radius))
}

/// Accepts `to` iff it is finite, inside the bounds and clear of terrain.
pub fn validate_move(map: &ArenaMap, to: Position, radius: f64) -> Result<Position, MoveRejection> {
    if !to.is_finite() {
        return Err(MoveRejection::NonFinite);
    }
    if !within_bounds(map, to, radius) {
        return Err(MoveRejection::OutOfBounds);
    }
    if overlaps_terrain(map, to, radius) {
        return Err(MoveRejection::Blocked);
    }
    Ok(to)
}
