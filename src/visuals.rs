//! Look of the scene: palette, lights and post-processing.
//!
//! None of this affects the animation; the renderer reads it once at startup.
//! All colors are stored linear, converted from the sRGB hex codes the palette
//! is authored in.

use glam::Vec3;

/// Convert an sRGB hex color (`0xRRGGBB`) to linear RGB.
pub fn srgb(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(channel(16), channel(8), channel(0))
}

/// Authored palette, as sRGB hex.
pub struct Palette;

impl Palette {
    pub const BACKGROUND: u32 = 0x000502;
    pub const EMERALD: u32 = 0x00472e;
    pub const EMERALD_LIGHT: u32 = 0x006b45;
    pub const GOLD: u32 = 0xFFD700;
    pub const GOLD_HOT: u32 = 0xfff2b0;
    pub const RED_VELVET: u32 = 0x8a0a18;
}

/// A point light. `range == 0` means no cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
}

/// The fixed light rig around the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: Vec3,
    pub ambient_intensity: f32,
    /// Warm gold key light above and to the right.
    pub key: PointLight,
    /// Cool emerald rim light from behind.
    pub rim: PointLight,
    /// Short-range orange glow inside the tree.
    pub glow: PointLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: srgb(0x001100),
            ambient_intensity: 0.2,
            key: PointLight {
                position: Vec3::new(10.0, 20.0, 10.0),
                color: srgb(Palette::GOLD_HOT),
                intensity: 1500.0,
                range: 0.0,
            },
            rim: PointLight {
                position: Vec3::new(-10.0, 5.0, -10.0),
                color: srgb(Palette::EMERALD_LIGHT),
                intensity: 500.0,
                range: 0.0,
            },
            glow: PointLight {
                position: Vec3::new(0.0, -2.0, 0.0),
                color: srgb(0xffaa00),
                intensity: 200.0,
                range: 10.0,
            },
        }
    }
}

/// Screen-space finishing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostEffects {
    pub exposure: f32,
    pub bloom_threshold: f32,
    pub bloom_intensity: f32,
    /// Bloom spread. 1.0 reaches 5% of the screen height.
    pub bloom_radius: f32,
    pub noise_opacity: f32,
    pub vignette_offset: f32,
    pub vignette_darkness: f32,
}

impl Default for PostEffects {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            bloom_threshold: 0.8,
            bloom_intensity: 1.5,
            bloom_radius: 0.6,
            noise_opacity: 0.02,
            vignette_offset: 0.1,
            vignette_darkness: 1.1,
        }
    }
}

/// Everything the renderer needs to know about appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualConfig {
    pub background: Vec3,
    /// Foliage base color (deep emerald).
    pub foliage_color: Vec3,
    /// Foliage highlight at the centre of each point.
    pub foliage_highlight: Vec3,
    pub lighting: Lighting,
    pub post: PostEffects,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            background: srgb(Palette::BACKGROUND),
            foliage_color: srgb(Palette::EMERALD),
            foliage_highlight: srgb(Palette::GOLD),
            lighting: Lighting::default(),
            post: PostEffects::default(),
        }
    }
}
