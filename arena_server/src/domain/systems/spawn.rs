use crate::domain::systems::movement::overlaps_terrain;
use crate::domain::{ArenaMap, Position};
use rand::Rng;

/// Picks a spawn point clear of terrain by rejection sampling.
///
/// Candidates are drawn uniformly from the area where the player's footprint stays
/// inside the map. After `max_attempts` misses the map center is returned, even
/// if terrain covers it. Calls are independent: two players may share a point.
pub fn allocate_spawn<R: Rng + ?Sized>(
    map: &ArenaMap,
    radius: f64,
    max_attempts: usize,
    rng: &mut R,
) -> Position {
    let (min_x, max_x) = (radius, map.width - radius);
    let (min_y, max_y) = (radius, map.height - radius);
    if !(min_x <= max_x && min_y <= max_y) {
        return map.center();
    }

    for _ in 0..max_attempts {
        let candidate = Position::new(rng.gen_range(min_x..=max_x), rng.gen_range(min_y..=max_y));
        if !overlaps_terrain(map, candidate, radius) {
            return candidate;
        }
    }

    map.center()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Obstacle;
    use crate::domain::systems::movement::within_bounds;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn when_free_space_exists_then_spawn_is_valid() {
        let map = ArenaMap::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let pos = allocate_spawn(&map, 20.0, 100, &mut rng);
            assert!(within_bounds(&map, pos, 20.0), "{pos:?}");
            assert!(!overlaps_terrain(&map, pos, 20.0), "{pos:?}");
        }
    }

    #[test]
    fn when_terrain_covers_the_whole_map_then_spawn_falls_back_to_center() {
        let map = ArenaMap {
            width: 800.0,
            height: 600.0,
            obstacles: vec![Obstacle::new(0.0, 0.0, 800.0, 600.0, "pond")],
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            allocate_spawn(&map, 20.0, 100, &mut rng),
            Position::new(400.0, 300.0)
        );
    }

    #[test]
    fn when_only_a_narrow_strip_is_free_then_spawn_lands_in_it() {
        // Everything except the band y in [0, 60] is terrain.
        let map = ArenaMap {
            width: 400.0,
            height: 400.0,
            obstacles: vec![Obstacle::new(0.0, 60.0, 400.0, 340.0, "home")],
        };
        let mut rng = StdRng::seed_from_u64(42);
        let pos = allocate_spawn(&map, 20.0, 10_000, &mut rng);
        assert!(!overlaps_terrain(&map, pos, 20.0), "{pos:?}");
        assert!(pos.y <= 40.0, "{pos:?}");
    }

    #[test]
    fn when_map_is_smaller_than_footprint_then_center_is_returned() {
        let map = ArenaMap {
            width: 30.0,
            height: 30.0,
            obstacles: Vec::new(),
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            allocate_spawn(&map, 20.0, 100, &mut rng),
            Position::new(15.0, 15.0)
        );
    }
}
