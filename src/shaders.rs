//! WGSL sources and the uniform layouts they expect.
//!
//! Each `*Uniform` struct mirrors a WGSL struct byte for byte; the size tests
//! at the bottom catch drift between the two.

use crate::ornaments::Material;
use crate::visuals::{Lighting, PointLight, PostEffects, VisualConfig};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Foliage point shader.
pub const FOLIAGE_WGSL: &str = include_str!("shaders/foliage.wgsl");
/// Instanced ornament shader.
pub const ORNAMENT_WGSL: &str = include_str!("shaders/ornament.wgsl");
/// Fullscreen finishing shader.
pub const POST_WGSL: &str = include_str!("shaders/post.wgsl");

/// Per-frame camera and clock data shared by the scene passes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GlobalsUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    pub scene_offset: [f32; 4],
    pub viewport: [f32; 2],
    pub time: f32,
    pub _pad: f32,
}

impl GlobalsUniform {
    pub fn new(
        view: Mat4,
        proj: Mat4,
        camera_position: Vec3,
        scene_offset: Vec3,
        viewport: (u32, u32),
        time: f32,
    ) -> Self {
        Self {
            view_proj: (proj * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            camera_position: camera_position.extend(1.0).to_array(),
            scene_offset: scene_offset.extend(0.0).to_array(),
            viewport: [viewport.0.max(1) as f32, viewport.1.max(1) as f32],
            time,
            _pad: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FoliageParamsUniform {
    pub base_color: [f32; 4],
    pub glow_color: [f32; 4],
    pub progress: f32,
    pub _pad: [f32; 3],
}

impl FoliageParamsUniform {
    pub fn new(visuals: &VisualConfig, progress: f32) -> Self {
        Self {
            base_color: visuals.foliage_color.extend(1.0).to_array(),
            glow_color: visuals.foliage_highlight.extend(1.0).to_array(),
            progress,
            _pad: [0.0; 3],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

impl From<&PointLight> for LightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.extend(light.range).to_array(),
            color: (light.color * light.intensity).extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightingUniform {
    pub ambient: [f32; 4],
    pub key: LightUniform,
    pub rim: LightUniform,
    pub glow: LightUniform,
}

impl From<&Lighting> for LightingUniform {
    fn from(lighting: &Lighting) -> Self {
        Self {
            ambient: (lighting.ambient * lighting.ambient_intensity)
                .extend(1.0)
                .to_array(),
            key: (&lighting.key).into(),
            rim: (&lighting.rim).into(),
            glow: (&lighting.glow).into(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 4],
    pub emissive: [f32; 4],
    pub surface: [f32; 4],
}

impl From<&Material> for MaterialUniform {
    fn from(material: &Material) -> Self {
        Self {
            color: material.color.extend(1.0).to_array(),
            emissive: (material.emissive * material.emissive_intensity)
                .extend(1.0)
                .to_array(),
            surface: [material.roughness, material.metalness, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PostParamsUniform {
    pub bloom: [f32; 4],
    pub finish: [f32; 4],
    pub texel: [f32; 4],
}

impl PostParamsUniform {
    pub fn new(post: &PostEffects, width: u32, height: u32, time: f32) -> Self {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        Self {
            bloom: [
                post.bloom_threshold,
                post.bloom_intensity,
                post.bloom_radius,
                post.exposure,
            ],
            finish: [
                post.vignette_offset,
                post.vignette_darkness,
                post.noise_opacity,
                time,
            ],
            texel: [1.0 / width, 1.0 / height, width / height, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_uniform_sizes_match_wgsl() {
        assert_eq!(size_of::<GlobalsUniform>(), 176);
        assert_eq!(size_of::<FoliageParamsUniform>(), 48);
        assert_eq!(size_of::<LightUniform>(), 32);
        assert_eq!(size_of::<LightingUniform>(), 112);
        assert_eq!(size_of::<MaterialUniform>(), 48);
        assert_eq!(size_of::<PostParamsUniform>(), 48);
    }

    #[test]
    fn test_light_premultiplies_intensity() {
        let light = PointLight {
            position: Vec3::new(1.0, 2.0, 3.0),
            color: Vec3::new(0.5, 0.25, 1.0),
            intensity: 2.0,
            range: 10.0,
        };
        let raw = LightUniform::from(&light);
        assert_eq!(raw.position, [1.0, 2.0, 3.0, 10.0]);
        assert_eq!(raw.color, [1.0, 0.5, 2.0, 1.0]);
    }

    #[test]
    fn test_post_params_texel() {
        let raw = PostParamsUniform::new(&PostEffects::default(), 200, 100, 3.0);
        assert_eq!(raw.texel, [0.005, 0.01, 2.0, 0.0]);
        assert_eq!(raw.finish[3], 3.0);
        assert_eq!(raw.bloom[0], 0.8);
    }

    #[test]
    fn test_sources_declare_entry_points() {
        for src in [FOLIAGE_WGSL, ORNAMENT_WGSL, POST_WGSL] {
            assert!(src.contains("fn vs_main"));
            assert!(src.contains("fn fs_main"));
        }
    }
}
