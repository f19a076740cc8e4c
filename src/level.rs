use crate::collision::Sphere;
use crate::config::{ArenaConfig, FoodConfig};
use crate::math::V3;

/// Static layout of an arena: the obstacles the agent must avoid and the
/// squares food is sampled from.
#[derive(Debug, Clone)]
pub struct Level {
    pub obstacles: Vec<Sphere>,
    pub placement_extent: i32,
    pub resample_extent: i32,
    pub clearance: f32,
}

impl Level {
    pub fn empty(food: &FoodConfig) -> Self {
        Self {
            obstacles: Vec::new(),
            placement_extent: food.placement_extent,
            resample_extent: food.resample_extent,
            clearance: food.clearance,
        }
    }

    pub fn new(arena: &ArenaConfig, food: &FoodConfig) -> Self {
        let mut level = Self::empty(food);
        if arena.boundary {
            level.obstacles = boundary_ring(arena);
        }
        level
    }
}

/// Four walls of evenly spaced spheres around the origin. Each wall starts at
/// a corner and runs toward the next one, so the ring closes when
/// `per_wall * spacing == 2 * extent`.
pub fn boundary_ring(arena: &ArenaConfig) -> Vec<Sphere> {
    let e = arena.extent;
    let r = arena.obstacle_radius;
    let mut obstacles = Vec::with_capacity(arena.per_wall * 4);

    for i in 0..arena.per_wall {
        let d = arena.spacing * i as f32;
        obstacles.push(Sphere::new(V3::new(-e, 0.0, e - d), r));
    }
    for i in 0..arena.per_wall {
        let d = arena.spacing * i as f32;
        obstacles.push(Sphere::new(V3::new(e, 0.0, d - e), r));
    }
    for i in 0..arena.per_wall {
        let d = arena.spacing * i as f32;
        obstacles.push(Sphere::new(V3::new(d - e, 0.0, -e), r));
    }
    for i in 0..arena.per_wall {
        let d = arena.spacing * i as f32;
        obstacles.push(Sphere::new(V3::new(e - d, 0.0, e), r));
    }

    obstacles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ring_layout() {
        let obstacles = boundary_ring(&ArenaConfig::default());
        assert_eq!(obstacles.len(), 100);

        assert_eq!(obstacles[0].center, V3::new(-100.0, 0.0, 100.0));
        assert_eq!(obstacles[24].center, V3::new(-100.0, 0.0, -92.0));
        assert_eq!(obstacles[25].center, V3::new(100.0, 0.0, -100.0));
        assert_eq!(obstacles[50].center, V3::new(-100.0, 0.0, -100.0));
        assert_eq!(obstacles[75].center, V3::new(100.0, 0.0, 100.0));
        assert!(obstacles.iter().all(|o| o.radius == 5.0));
    }

    #[test]
    fn every_obstacle_sits_on_the_boundary() {
        for o in boundary_ring(&ArenaConfig::default()) {
            let c = o.center;
            assert!(c.x().abs() == 100.0 || c.z().abs() == 100.0);
            assert_eq!(c.y(), 0.0);
        }
    }

    #[test]
    fn boundary_can_be_disabled() {
        let arena = ArenaConfig {
            boundary: false,
            ..ArenaConfig::default()
        };
        let level = Level::new(&arena, &FoodConfig::default());
        assert!(level.obstacles.is_empty());
        assert_eq!(level.placement_extent, 90);
        assert_eq!(level.resample_extent, 95);
    }
}
