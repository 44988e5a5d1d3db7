//! The foliage point cloud.
//!
//! Fifteen thousand points, each with a fixed position inside the tree cone
//! and a fixed position inside the scatter ball. The field itself only tracks
//! progress and time; the blend and the secondary motion run in the vertex
//! shader (`shaders/foliage.wgsl`). The functions at the bottom of this module
//! are the CPU reference for that shader and must stay in sync with it.
//!
//! # Secondary motion
//!
//! With `e = ease(progress)`:
//!
//! ```text
//! pos     = lerp(scatter, tree, e)
//! wind    = lerp(0.5, 0.05, e)
//! pos.x  += sin(time * 0.5 + pos.y) * wind
//! pos.z  += cos(time * 0.3 + pos.x) * wind
//! pos    += normalize(pos) * sin(time * 2 + seed * 10) * 0.1
//! size    = lerp(8, 12, seed) * 30 / depth
//! alpha   = 0.8 + 0.2 * sin(time + seed * 10)
//! ```

use crate::config::TreeDimensions;
use crate::easing::{ease_in_out_cubic, lerp, lerp_vec3};
use crate::progress::Progress;
use crate::spawn::SpawnContext;
use crate::state::TreeState;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

/// Wind amplitude when fully scattered.
pub const WIND_SCATTERED: f32 = 0.5;
/// Wind amplitude when fully formed.
pub const WIND_FORMED: f32 = 0.05;
/// Peak radial breathing offset.
pub const BREATHING_AMPLITUDE: f32 = 0.1;
/// Point size range in pixels at the reference depth.
pub const POINT_SIZE_MIN: f32 = 8.0;
pub const POINT_SIZE_MAX: f32 = 12.0;
/// Depth at which a point is drawn at its base size.
pub const POINT_SIZE_REFERENCE_DEPTH: f32 = 30.0;

/// One foliage point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoliageParticle {
    pub tree_position: Vec3,
    pub scatter_position: Vec3,
    /// Per-particle phase in `[0, 1)`.
    pub seed: f32,
}

impl FoliageParticle {
    pub fn generate<R: Rng + ?Sized>(ctx: &mut SpawnContext<'_, R>, dims: &TreeDimensions) -> Self {
        let seed = ctx.random();
        let tree = ctx.random_in_cone(dims.height, dims.radius);
        let scatter_position = ctx.random_in_sphere(dims.scatter_radius);

        Self {
            tree_position: tree.position,
            scatter_position,
            seed,
        }
    }
}

/// GPU vertex layout of one foliage point (instance-rate).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FoliageVertex {
    pub tree_position: [f32; 3],
    pub seed: f32,
    pub scatter_position: [f32; 3],
    pub _pad: f32,
}

impl From<&FoliageParticle> for FoliageVertex {
    fn from(p: &FoliageParticle) -> Self {
        Self {
            tree_position: p.tree_position.to_array(),
            seed: p.seed,
            scatter_position: p.scatter_position.to_array(),
            _pad: 0.0,
        }
    }
}

/// The two scalars the foliage shader needs each frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FoliageUniforms {
    /// Clock time in seconds.
    pub time: f32,
    /// Raw progress; the shader eases it.
    pub progress: f32,
}

/// The point cloud and its progress.
#[derive(Debug, Clone)]
pub struct FoliageField {
    particles: Vec<FoliageParticle>,
    progress: Progress,
    time: f32,
}

impl FoliageField {
    /// Generate `count` points from `rng`.
    pub fn generate<R: Rng + ?Sized>(
        count: u32,
        dims: &TreeDimensions,
        transition_speed: f32,
        rng: &mut R,
    ) -> Self {
        let mut ctx = SpawnContext::new(rng);
        let particles: Vec<FoliageParticle> = (0..count)
            .map(|_| FoliageParticle::generate(&mut ctx, dims))
            .collect();

        log::debug!("Generated {} foliage points", particles.len());

        Self {
            particles,
            progress: Progress::new(transition_speed),
            time: 0.0,
        }
    }

    pub fn particles(&self) -> &[FoliageParticle] {
        &self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    /// Read the selector, advance progress and record the clock.
    pub fn update(&mut self, state: TreeState, elapsed: f32, delta: f32) -> FoliageUniforms {
        self.progress.step(state.target_progress(), delta);
        self.time = elapsed;
        self.uniforms()
    }

    pub fn uniforms(&self) -> FoliageUniforms {
        FoliageUniforms {
            time: self.time,
            progress: self.progress.value(),
        }
    }

    /// Vertex data for the GPU, uploaded once.
    pub fn vertices(&self) -> Vec<FoliageVertex> {
        self.particles.iter().map(FoliageVertex::from).collect()
    }

    /// CPU evaluation of every point's rendered position.
    pub fn animated_positions(&self) -> Vec<Vec3> {
        let uniforms = self.uniforms();
        self.particles
            .iter()
            .map(|p| animated_position(p, uniforms.time, uniforms.progress))
            .collect()
    }
}

// ========== Shader reference ==========

/// Wind amplitude at eased progress `eased`.
#[inline]
pub fn wind_strength(eased: f32) -> f32 {
    lerp(WIND_SCATTERED, WIND_FORMED, eased)
}

/// Radial breathing offset.
#[inline]
pub fn breathing(time: f32, seed: f32) -> f32 {
    (time * 2.0 + seed * 10.0).sin() * BREATHING_AMPLITUDE
}

/// Rendered position of `particle` at `time` and raw `progress`.
pub fn animated_position(particle: &FoliageParticle, time: f32, progress: f32) -> Vec3 {
    let eased = ease_in_out_cubic(progress);
    let mut pos = lerp_vec3(particle.scatter_position, particle.tree_position, eased);

    let wind = wind_strength(eased);
    pos.x += (time * 0.5 + pos.y).sin() * wind;
    pos.z += (time * 0.3 + pos.x).cos() * wind;

    pos + pos.normalize_or_zero() * breathing(time, particle.seed)
}

/// Point size in pixels at view-space depth `depth` (positive, in front of
/// the camera).
pub fn point_size(seed: f32, depth: f32) -> f32 {
    lerp(POINT_SIZE_MIN, POINT_SIZE_MAX, seed) * (POINT_SIZE_REFERENCE_DEPTH / depth.max(1e-3))
}

/// Per-point alpha flicker.
#[inline]
pub fn flicker_alpha(time: f32, seed: f32) -> f32 {
    0.8 + 0.2 * (time + seed * 10.0).sin()
}

/// Soft falloff across a point sprite, `dist` measured from its centre in
/// sprite units (rim at 0.5). Scales both the gold tint and the alpha.
#[inline]
pub fn point_coverage(dist: f32) -> f32 {
    if dist > 0.5 {
        return 0.0;
    }
    (1.0 - dist * 2.0).max(0.0).powf(1.5)
}

/// Alpha written by the fragment stage.
#[inline]
pub fn fragment_alpha(time: f32, seed: f32, dist: f32) -> f32 {
    flicker_alpha(time, seed) * point_coverage(dist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn field(count: u32, seed: u64) -> FoliageField {
        let mut rng = SmallRng::seed_from_u64(seed);
        FoliageField::generate(count, &TreeDimensions::default(), 2.5, &mut rng)
    }

    fn planar(v: Vec3) -> f32 {
        (v.x * v.x + v.z * v.z).sqrt()
    }

    #[test]
    fn test_generation_counts_and_seeds() {
        let f = field(500, 1);
        assert_eq!(f.len(), 500);
        assert!(f.particles().iter().all(|p| (0.0..1.0).contains(&p.seed)));
        assert_eq!(f.vertices().len(), 500);
    }

    #[test]
    fn test_tree_positions_form_a_cone() {
        let dims = TreeDimensions::default();
        let f = field(5000, 2);
        for p in f.particles() {
            let r = planar(p.tree_position);
            let h = p.tree_position.y / dims.height + 0.5;
            assert!(r <= dims.radius + 1e-4);
            // Allowed radius shrinks as y grows
            assert!(r <= (1.0 - h) * dims.radius + 1e-3);
        }
    }

    #[test]
    fn test_scatter_positions_inside_ball() {
        let dims = TreeDimensions::default();
        let f = field(5000, 3);
        for p in f.particles() {
            assert!(p.scatter_position.length() <= dims.scatter_radius + 1e-3);
        }
    }

    #[test]
    fn test_scatter_radius_histogram_is_volumetric() {
        // Shell k of 4 equal-width shells holds ((k+1)^3 - k^3) / 64 of a uniform ball
        let dims = TreeDimensions::default();
        let f = field(20_000, 4);
        let mut shells = [0usize; 4];
        for p in f.particles() {
            let k = ((p.scatter_position.length() / dims.scatter_radius) * 4.0) as usize;
            shells[k.min(3)] += 1;
        }
        let expected = [1.0 / 64.0, 7.0 / 64.0, 19.0 / 64.0, 37.0 / 64.0];
        for (count, want) in shells.iter().zip(expected) {
            let got = *count as f32 / f.len() as f32;
            assert!((got - want).abs() < 0.015, "shell {} vs {}", got, want);
        }
    }

    #[test]
    fn test_update_tracks_selector() {
        let mut f = field(10, 5);
        let u = f.update(TreeState::TreeShape, 0.25, 1.0 / 60.0);
        assert_eq!(u.time, 0.25);
        assert!(u.progress > 0.0);

        let formed = u.progress;
        let u = f.update(TreeState::Scattered, 0.5, 1.0 / 60.0);
        assert!(u.progress < formed);
    }

    #[test]
    fn test_zero_delta_keeps_progress() {
        let mut f = field(10, 6);
        for i in 0..10 {
            f.update(TreeState::TreeShape, i as f32 / 60.0, 1.0 / 60.0);
        }
        let before = f.progress();
        f.update(TreeState::Scattered, 1.0, 0.0);
        assert_eq!(f.progress(), before);
    }

    #[test]
    fn test_empty_field_updates() {
        let mut f = field(0, 7);
        assert!(f.is_empty());
        f.update(TreeState::TreeShape, 1.0, 1.0 / 60.0);
        assert!(f.animated_positions().is_empty());
    }

    #[test]
    fn test_wind_strength_endpoints() {
        assert_eq!(wind_strength(0.0), WIND_SCATTERED);
        assert_eq!(wind_strength(1.0), WIND_FORMED);
        assert!(wind_strength(0.5) < WIND_SCATTERED && wind_strength(0.5) > WIND_FORMED);
    }

    #[test]
    fn test_formed_position_stays_near_tree() {
        let p = FoliageParticle {
            tree_position: Vec3::new(2.0, 1.0, -1.0),
            scatter_position: Vec3::new(20.0, -5.0, 3.0),
            seed: 0.37,
        };
        for step in 0..50 {
            let t = step as f32 * 0.37;
            let pos = animated_position(&p, t, 1.0);
            let bound = WIND_FORMED * 2.0_f32.sqrt() + BREATHING_AMPLITUDE + 1e-4;
            assert!((pos - p.tree_position).length() <= bound);
        }
    }

    #[test]
    fn test_scattered_wind_is_stronger() {
        let p = FoliageParticle {
            tree_position: Vec3::new(0.0, 3.0, 0.0),
            scatter_position: Vec3::new(0.0, 3.0, 0.0),
            seed: 0.0,
        };
        // At time 0 the X sway is sin(y) * wind
        let scattered = animated_position(&p, 0.0, 0.0);
        let formed = animated_position(&p, 0.0, 1.0);
        assert!((scattered.x - 3.0f32.sin() * WIND_SCATTERED).abs() < 1e-2);
        assert!(scattered.x.abs() > formed.x.abs());
    }

    #[test]
    fn test_origin_point_does_not_explode() {
        let p = FoliageParticle {
            tree_position: Vec3::ZERO,
            scatter_position: Vec3::ZERO,
            seed: 0.5,
        };
        let pos = animated_position(&p, 0.0, 1.0);
        assert!(pos.is_finite());
    }

    #[test]
    fn test_point_size_and_alpha_ranges() {
        assert_eq!(point_size(0.0, 30.0), 8.0);
        assert_eq!(point_size(1.0, 30.0), 12.0);
        assert!(point_size(0.5, 60.0) < point_size(0.5, 30.0));
        assert!(point_size(0.5, 0.0).is_finite());
        for i in 0..100 {
            let a = flicker_alpha(i as f32 * 0.13, (i % 10) as f32 / 10.0);
            assert!((0.6 - 1e-6..=1.0 + 1e-6).contains(&a));
        }
    }

    #[test]
    fn test_point_coverage_fades_to_rim() {
        assert_eq!(point_coverage(0.0), 1.0);
        assert_eq!(point_coverage(0.5), 0.0);
        assert_eq!(point_coverage(0.7), 0.0);

        let mut last = point_coverage(0.0);
        for i in 1..=50 {
            let c = point_coverage(i as f32 * 0.01);
            assert!(c <= last);
            last = c;
        }
    }

    #[test]
    fn test_rim_pixels_add_almost_nothing() {
        // Full flicker, just inside the rim.
        let a = fragment_alpha(0.0, std::f32::consts::FRAC_PI_2 / 10.0, 0.49);
        assert!(a < 5e-3);
        assert!((fragment_alpha(0.0, std::f32::consts::FRAC_PI_2 / 10.0, 0.0) - 1.0).abs() < 1e-6);
    }
}
