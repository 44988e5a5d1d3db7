//! Instanced ornament fields.
//!
//! Each population (gold baubles, red velvet balls, gifts, fairy lights) is an
//! [`OrnamentField`]: a fixed set of rigid instances sharing one mesh, one
//! material and one progress value. Unlike the foliage, the blend is done on
//! the CPU every frame and handed to an [`InstanceSink`] as transforms.
//!
//! # Motion
//!
//! With `e` the eased progress of the field and `t` the clock:
//!
//! - position: `lerp(scatter, tree, e)`, plus `sin(t + i) * (1 - e) * 0.5` on Y
//!   while `e < 0.9`
//! - rotation: X spins at `0.1 * (1 - e)` rad/s, Y always spins at `0.1` rad/s,
//!   Z stays at its base angle
//! - scale: `base_scale * (0.5 + 0.5 * e)`

use crate::config::TreeDimensions;
use crate::easing::{ease_in_out_cubic, lerp_vec3};
use crate::progress::Progress;
use crate::sink::InstanceSink;
use crate::spawn::SpawnContext;
use crate::state::TreeState;
use crate::visuals::srgb;
use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;

/// Ornaments stop floating once eased progress reaches this value.
pub const FLOAT_CUTOFF: f32 = 0.9;
/// Peak vertical float offset when fully scattered.
pub const FLOAT_AMPLITUDE: f32 = 0.5;
/// Spin rate in radians per second.
pub const SPIN_RATE: f32 = 0.1;
/// How far sphere ornaments sit outside the cone surface.
pub const SURFACE_OUTSET: f32 = 0.2;
/// Height of the band at the base of the tree where gifts are placed.
pub const GIFT_BAND: f32 = 2.0;

/// Mesh used by a population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrnamentShape {
    /// Baubles and lights, hung on the cone surface.
    Sphere,
    /// Gifts, piled around the base.
    Box,
}

/// Surface parameters handed straight to the renderer.
///
/// Colors are linear RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            emissive: Vec3::ZERO,
            emissive_intensity: 0.0,
            roughness: 0.2,
            metalness: 1.0,
        }
    }
}

/// One ornament population.
#[derive(Debug, Clone, PartialEq)]
pub struct OrnamentConfig {
    pub name: String,
    pub shape: OrnamentShape,
    pub count: u32,
    /// Nominal scale; each instance gets `0.8..1.2` times this.
    pub base_scale: f32,
    pub material: Material,
}

impl OrnamentConfig {
    pub fn new(name: impl Into<String>, shape: OrnamentShape, count: u32, base_scale: f32) -> Self {
        Self {
            name: name.into(),
            shape,
            count,
            base_scale,
            material: Material::default(),
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Base color from an sRGB hex value such as `0xFFD700`.
    pub fn with_color(mut self, hex: u32) -> Self {
        self.material.color = srgb(hex);
        self
    }

    pub fn with_emissive(mut self, hex: u32, intensity: f32) -> Self {
        self.material.emissive = srgb(hex);
        self.material.emissive_intensity = intensity.max(0.0);
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.material.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.material.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    // ========== Presets ==========

    /// Polished gold spheres.
    pub fn gold_baubles() -> Self {
        Self::new("gold baubles", OrnamentShape::Sphere, crate::config::BAUBLE_COUNT, 0.4)
            .with_color(0xFFD700)
            .with_roughness(0.1)
            .with_metalness(1.0)
    }

    /// Soft red spheres, half as many as the gold ones.
    pub fn red_velvet() -> Self {
        Self::new("red velvet", OrnamentShape::Sphere, crate::config::BAUBLE_COUNT / 2, 0.5)
            .with_color(0x8a0a18)
            .with_roughness(0.6)
            .with_metalness(0.2)
    }

    /// Gift boxes around the base.
    pub fn gifts() -> Self {
        Self::new("gifts", OrnamentShape::Box, crate::config::GIFT_COUNT, 0.8)
            .with_color(0xfff2b0)
            .with_roughness(0.2)
            .with_metalness(0.9)
    }

    /// Tiny glowing spheres.
    pub fn fairy_lights() -> Self {
        Self::new("fairy lights", OrnamentShape::Sphere, crate::config::LIGHTS_COUNT, 0.08)
            .with_color(0xffffff)
            .with_emissive(0xffddaa, 2.0)
    }

    /// The four populations of the default scene.
    pub fn default_populations() -> Vec<Self> {
        vec![
            Self::gold_baubles(),
            Self::red_velvet(),
            Self::gifts(),
            Self::fairy_lights(),
        ]
    }
}

/// Immutable per-instance data, fixed at generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ornament {
    pub tree_position: Vec3,
    pub scatter_position: Vec3,
    /// Euler angles (XYZ order).
    pub base_rotation: Vec3,
    pub base_scale: f32,
}

impl Ornament {
    /// Draw one instance of the given shape.
    pub fn generate<R: Rng + ?Sized>(
        ctx: &mut SpawnContext<'_, R>,
        shape: OrnamentShape,
        base_scale: f32,
        dims: &TreeDimensions,
    ) -> Self {
        let tree = match shape {
            OrnamentShape::Sphere => ctx.random_on_cone(dims.height, dims.radius, SURFACE_OUTSET),
            OrnamentShape::Box => {
                ctx.random_around_base(dims.height, dims.radius, GIFT_BAND, 0.8, 1.3)
            }
        };
        let scatter_position = ctx.random_in_sphere(dims.ornament_scatter_radius());
        let base_rotation = ctx.random_rotation();
        let base_scale = base_scale * ctx.random_range(0.8, 1.2);

        Self {
            tree_position: tree.position,
            scatter_position,
            base_rotation,
            base_scale,
        }
    }
}

/// Rendered transform of one instance for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    pub position: Vec3,
    /// Euler angles (XYZ order).
    pub rotation: Vec3,
    /// Uniform scale.
    pub scale: f32,
}

impl InstanceTransform {
    /// Model matrix: scale, then XYZ rotation, then translation.
    pub fn to_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rotation, self.position)
    }
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

/// Transform of instance `index` at eased progress `eased` and clock `time`.
pub fn instance_transform(ornament: &Ornament, index: usize, eased: f32, time: f32) -> InstanceTransform {
    let mut position = lerp_vec3(ornament.scatter_position, ornament.tree_position, eased);
    if eased < FLOAT_CUTOFF {
        position.y += (time + index as f32).sin() * (1.0 - eased) * FLOAT_AMPLITUDE;
    }

    let base = ornament.base_rotation;
    let rotation = Vec3::new(
        base.x + time * SPIN_RATE * (1.0 - eased),
        base.y + time * SPIN_RATE,
        base.z,
    );

    InstanceTransform {
        position,
        rotation,
        scale: ornament.base_scale * (0.5 + 0.5 * eased),
    }
}

/// Transforms for every instance at raw (un-eased) `progress`.
pub fn compute_transforms(instances: &[Ornament], progress: f32, time: f32) -> Vec<InstanceTransform> {
    let eased = ease_in_out_cubic(progress);
    instances
        .iter()
        .enumerate()
        .map(|(i, o)| instance_transform(o, i, eased, time))
        .collect()
}

/// A population of ornaments with its own progress.
#[derive(Debug, Clone)]
pub struct OrnamentField {
    config: OrnamentConfig,
    instances: Vec<Ornament>,
    progress: Progress,
}

impl OrnamentField {
    /// Generate every instance of `config` from `rng`.
    pub fn generate<R: Rng + ?Sized>(
        config: OrnamentConfig,
        dims: &TreeDimensions,
        transition_speed: f32,
        rng: &mut R,
    ) -> Self {
        let mut ctx = SpawnContext::new(rng);
        let instances: Vec<Ornament> = (0..config.count)
            .map(|_| Ornament::generate(&mut ctx, config.shape, config.base_scale, dims))
            .collect();

        log::debug!(
            "Generated {} {:?} ornaments for '{}'",
            instances.len(),
            config.shape,
            config.name
        );

        Self {
            config,
            instances,
            progress: Progress::new(transition_speed),
        }
    }

    pub fn config(&self) -> &OrnamentConfig {
        &self.config
    }

    pub fn instances(&self) -> &[Ornament] {
        &self.instances
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Raw progress of this population.
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    /// Advance progress towards `state`, then write every instance transform
    /// into `sink` and mark it dirty once.
    pub fn update<S: InstanceSink + ?Sized>(
        &mut self,
        state: TreeState,
        elapsed: f32,
        delta: f32,
        sink: &mut S,
    ) {
        self.progress.step(state.target_progress(), delta);

        if self.instances.is_empty() {
            return;
        }

        for (i, transform) in self.transforms(elapsed).iter().enumerate() {
            sink.set_transform(i, transform);
        }
        sink.mark_dirty();
    }

    /// Current transforms at clock `time`, without advancing progress.
    pub fn transforms(&self, time: f32) -> Vec<InstanceTransform> {
        compute_transforms(&self.instances, self.progress.value(), time)
    }
}
