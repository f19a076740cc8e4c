use crate::math::{F, V3};

/// Bounding sphere used for every collision test in the game.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    pub center: V3,
    pub radius: F,
}

impl Sphere {
    pub fn new(center: V3, radius: F) -> Self {
        Self { center, radius }
    }

    pub fn intersects(&self, other: &Sphere) -> bool {
        sphere_sphere(self.center, self.radius, other.center, other.radius)
    }
}

/// Strict overlap test, spheres that only touch do not collide.
pub fn sphere_sphere(a: V3, radius_a: F, b: V3, radius_b: F) -> bool {
    a.distance(b) < radius_a + radius_b
}
