//! Sampling helpers used when generating the two target configurations.
//!
//! Generation never touches a process-wide RNG: callers hand a
//! [`SpawnContext`] whatever [`Rng`] they like, usually a seeded
//! [`SmallRng`](rand::rngs::SmallRng) so tests are reproducible.
//!
//! ```
//! use arix::spawn::SpawnContext;
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let mut rng = SmallRng::seed_from_u64(1);
//! let mut ctx = SpawnContext::new(&mut rng);
//! let p = ctx.random_in_sphere(25.0);
//! assert!(p.length() <= 25.0 + 1e-3);
//! ```

use glam::Vec3;
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// A point sampled inside the tree cone, plus the normalized height it was
/// drawn at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeSample {
    pub position: Vec3,
    /// Height in `[0, 1)`, 0 at the base and 1 at the tip.
    pub height_norm: f32,
}

/// Wraps an explicit random source with the distributions the fields need.
pub struct SpawnContext<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> SpawnContext<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }

    // ========== Random primitives ==========

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Random angle in `[0, 2π)`.
    #[inline]
    pub fn random_angle(&mut self) -> f32 {
        self.random() * TAU
    }

    // ========== Position helpers ==========

    /// Uniform point inside a ball of the given radius.
    ///
    /// Direction uses `phi = acos(2v - 1)` so it is uniform on the sphere,
    /// and the radius uses a cube root so the ball fills by volume instead of
    /// piling up near the centre.
    pub fn random_in_sphere(&mut self, radius: f32) -> Vec3 {
        let u = self.random();
        let v = self.random();
        let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
        let theta = TAU * u;
        let r = self.random().cbrt() * radius;

        Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        )
    }

    /// Uniform point inside a cone standing on the XZ plane, centred on the
    /// Y axis and spanning `-height/2 ..= height/2`.
    ///
    /// Each horizontal slice is filled by area (square-root radius).
    pub fn random_in_cone(&mut self, height: f32, radius: f32) -> ConeSample {
        let height_norm = self.random();
        let y = (height_norm - 0.5) * height;
        let radius_at_h = (1.0 - height_norm) * radius;
        let theta = self.random_angle();
        let r = self.random().sqrt() * radius_at_h;

        ConeSample {
            position: Vec3::new(r * theta.cos(), y, r * theta.sin()),
            height_norm,
        }
    }

    /// Point on the cone surface pushed `outset` units outward.
    pub fn random_on_cone(&mut self, height: f32, radius: f32, outset: f32) -> ConeSample {
        let height_norm = self.random();
        let y = (height_norm - 0.5) * height;
        let r = (1.0 - height_norm) * radius + outset;
        let theta = self.random_angle();

        ConeSample {
            position: Vec3::new(r * theta.cos(), y, r * theta.sin()),
            height_norm,
        }
    }

    /// Point in the band `band` units tall at the base of the cone, at the
    /// cone radius for its height times a random spread factor in
    /// `[spread_min, spread_max)`.
    pub fn random_around_base(
        &mut self,
        height: f32,
        radius: f32,
        band: f32,
        spread_min: f32,
        spread_max: f32,
    ) -> ConeSample {
        let y = -height / 2.0 + self.random() * band;
        let height_norm = if height > 0.0 { y / height + 0.5 } else { 0.0 };
        let spread = self.random_range(spread_min, spread_max);
        let r = (1.0 - height_norm) * radius * spread;
        let theta = self.random_angle();

        ConeSample {
            position: Vec3::new(r * theta.cos(), y, r * theta.sin()),
            height_norm,
        }
    }

    // ========== Orientation helpers ==========

    /// Euler angles with each component in `[0, π)`.
    pub fn random_rotation(&mut self) -> Vec3 {
        Vec3::new(self.random() * PI, self.random() * PI, self.random() * PI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const SAMPLES: usize = 20_000;

    #[test]
    fn test_random_in_sphere_bounds() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut ctx = SpawnContext::new(&mut rng);
        for _ in 0..1000 {
            let pos = ctx.random_in_sphere(25.0);
            assert!(pos.length() <= 25.0 + 1e-3);
        }
    }

    #[test]
    fn test_sphere_fills_by_volume() {
        // With a cube-root radius, P(r <= R/2) = 1/8
        let mut rng = SmallRng::seed_from_u64(11);
        let mut ctx = SpawnContext::new(&mut rng);
        let inner = (0..SAMPLES)
            .filter(|_| ctx.random_in_sphere(1.0).length() <= 0.5)
            .count();
        let fraction = inner as f32 / SAMPLES as f32;
        assert!((fraction - 0.125).abs() < 0.015, "fraction {}", fraction);
    }

    #[test]
    fn test_sphere_direction_is_uniform() {
        // Uniform directions put half the points in the upper hemisphere (z > 0)
        // and a quarter in the polar caps |z| > r * 0.75
        let mut rng = SmallRng::seed_from_u64(5);
        let mut ctx = SpawnContext::new(&mut rng);
        let mut upper = 0;
        let mut caps = 0;
        for _ in 0..SAMPLES {
            let p = ctx.random_in_sphere(1.0);
            let n = p.normalize_or_zero();
            if n.z > 0.0 {
                upper += 1;
            }
            if n.z.abs() > 0.75 {
                caps += 1;
            }
        }
        let upper = upper as f32 / SAMPLES as f32;
        let caps = caps as f32 / SAMPLES as f32;
        assert!((upper - 0.5).abs() < 0.02, "upper {}", upper);
        assert!((caps - 0.25).abs() < 0.02, "caps {}", caps);
    }

    #[test]
    fn test_cone_bounds() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut ctx = SpawnContext::new(&mut rng);
        for _ in 0..2000 {
            let s = ctx.random_in_cone(16.0, 6.5);
            let planar = (s.position.x * s.position.x + s.position.z * s.position.z).sqrt();
            assert!(s.position.y >= -8.0 && s.position.y < 8.0);
            assert!(planar <= (1.0 - s.height_norm) * 6.5 + 1e-4);
        }
    }

    #[test]
    fn test_cone_slices_fill_by_area() {
        // With a square-root radius, P(r <= radius_at_h / 2) = 1/4
        let mut rng = SmallRng::seed_from_u64(21);
        let mut ctx = SpawnContext::new(&mut rng);
        let mut inner = 0;
        let mut counted = 0;
        for _ in 0..SAMPLES {
            let s = ctx.random_in_cone(16.0, 6.5);
            let radius_at_h = (1.0 - s.height_norm) * 6.5;
            if radius_at_h < 1e-3 {
                continue;
            }
            counted += 1;
            let planar = (s.position.x * s.position.x + s.position.z * s.position.z).sqrt();
            if planar <= radius_at_h * 0.5 {
                inner += 1;
            }
        }
        let fraction = inner as f32 / counted as f32;
        assert!((fraction - 0.25).abs() < 0.02, "fraction {}", fraction);
    }

    #[test]
    fn test_cone_surface_outset() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut ctx = SpawnContext::new(&mut rng);
        for _ in 0..500 {
            let s = ctx.random_on_cone(16.0, 6.5, 0.2);
            let planar = (s.position.x * s.position.x + s.position.z * s.position.z).sqrt();
            let expected = (1.0 - s.height_norm) * 6.5 + 0.2;
            assert!((planar - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_around_base_band() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut ctx = SpawnContext::new(&mut rng);
        for _ in 0..500 {
            let s = ctx.random_around_base(16.0, 6.5, 2.0, 0.8, 1.3);
            assert!(s.position.y >= -8.0 && s.position.y < -6.0);
            let planar = (s.position.x * s.position.x + s.position.z * s.position.z).sqrt();
            let cone = (1.0 - s.height_norm) * 6.5;
            assert!(planar >= cone * 0.8 - 1e-3);
            assert!(planar <= cone * 1.3 + 1e-3);
        }
    }

    #[test]
    fn test_rotation_range() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut ctx = SpawnContext::new(&mut rng);
        for _ in 0..200 {
            let r = ctx.random_rotation();
            for c in r.to_array() {
                assert!((0.0..=PI).contains(&c));
            }
        }
    }

    #[test]
    fn test_same_seed_same_points() {
        let mut a = SmallRng::seed_from_u64(77);
        let mut b = SmallRng::seed_from_u64(77);
        let pa = SpawnContext::new(&mut a).random_in_sphere(3.0);
        let pb = SpawnContext::new(&mut b).random_in_sphere(3.0);
        assert_eq!(pa, pb);
    }
}
