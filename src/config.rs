//! Scene constants and the [`SceneConfig`] builder.
//!
//! Everything here is fixed once the scene is generated. Restarting with the
//! same configuration and seed reproduces the same particles.
//!
//! ```ignore
//! let config = SceneConfig::new()
//!     .with_foliage_count(8_000)
//!     .with_seed(7)
//!     .with_population(OrnamentConfig::gifts().with_count(20));
//! ```

use crate::ornaments::OrnamentConfig;
use glam::Vec3;

/// Height of the tree silhouette in world units.
pub const TREE_HEIGHT: f32 = 16.0;
/// Radius of the cone at the base of the tree.
pub const TREE_RADIUS: f32 = 6.5;
/// Radius of the ball the foliage scatters into.
pub const SCATTER_RADIUS: f32 = 25.0;
/// Ornaments scatter this much wider than the foliage.
pub const ORNAMENT_SCATTER_FACTOR: f32 = 1.5;
/// Damping rate of every progress accumulator, per second.
pub const TRANSITION_SPEED: f32 = 2.5;

/// Number of foliage points.
pub const FOLIAGE_COUNT: u32 = 15_000;
/// Number of gold baubles (the red velvet population uses half).
pub const BAUBLE_COUNT: u32 = 200;
/// Number of gift boxes around the base.
pub const GIFT_COUNT: u32 = 50;
/// Number of fairy lights.
pub const LIGHTS_COUNT: u32 = 400;

/// Offset applied to the whole tree group when rendering.
pub const SCENE_OFFSET: Vec3 = Vec3::new(0.0, -2.0, 0.0);

/// Environment variable overriding the generation seed.
pub const SEED_ENV: &str = "ARIX_SEED";
/// Environment variable overriding the foliage count.
pub const FOLIAGE_COUNT_ENV: &str = "ARIX_FOLIAGE_COUNT";

/// Geometry of the two target configurations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeDimensions {
    /// Total tree height; the tree spans `-height/2 ..= height/2`.
    pub height: f32,
    /// Cone radius at the bottom of the tree.
    pub radius: f32,
    /// Radius of the foliage scatter ball.
    pub scatter_radius: f32,
}

impl TreeDimensions {
    /// Radius of the ball ornaments scatter into.
    #[inline]
    pub fn ornament_scatter_radius(&self) -> f32 {
        self.scatter_radius * ORNAMENT_SCATTER_FACTOR
    }

    /// Y coordinate of the bottom of the tree.
    #[inline]
    pub fn base_y(&self) -> f32 {
        -self.height / 2.0
    }
}

impl Default for TreeDimensions {
    fn default() -> Self {
        Self {
            height: TREE_HEIGHT,
            radius: TREE_RADIUS,
            scatter_radius: SCATTER_RADIUS,
        }
    }
}

/// Full description of a scene: dimensions, counts, populations and seed.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub dimensions: TreeDimensions,
    pub transition_speed: f32,
    pub foliage_count: u32,
    pub ornaments: Vec<OrnamentConfig>,
    /// Seed for generation. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Translation of the tree group in the rendered scene.
    pub offset: Vec3,
}

impl SceneConfig {
    /// Defaults: the full tree with all four ornament populations.
    pub fn new() -> Self {
        Self {
            dimensions: TreeDimensions::default(),
            transition_speed: TRANSITION_SPEED,
            foliage_count: FOLIAGE_COUNT,
            ornaments: OrnamentConfig::default_populations(),
            seed: None,
            offset: SCENE_OFFSET,
        }
    }

    pub fn with_tree_height(mut self, height: f32) -> Self {
        self.dimensions.height = height.max(0.0);
        self
    }

    pub fn with_tree_radius(mut self, radius: f32) -> Self {
        self.dimensions.radius = radius.max(0.0);
        self
    }

    pub fn with_scatter_radius(mut self, radius: f32) -> Self {
        self.dimensions.scatter_radius = radius.max(0.0);
        self
    }

    /// Damping rate of the progress accumulators, per second.
    pub fn with_transition_speed(mut self, speed: f32) -> Self {
        self.transition_speed = speed.max(0.0);
        self
    }

    pub fn with_foliage_count(mut self, count: u32) -> Self {
        self.foliage_count = count;
        self
    }

    /// Add an ornament population.
    pub fn with_population(mut self, population: OrnamentConfig) -> Self {
        self.ornaments.push(population);
        self
    }

    /// Replace all ornament populations.
    pub fn with_populations(mut self, populations: Vec<OrnamentConfig>) -> Self {
        self.ornaments = populations;
        self
    }

    /// Drop every ornament population.
    pub fn without_ornaments(mut self) -> Self {
        self.ornaments.clear();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Apply `ARIX_SEED` / `ARIX_FOLIAGE_COUNT` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        let seed = std::env::var(SEED_ENV).ok();
        let count = std::env::var(FOLIAGE_COUNT_ENV).ok();
        self.with_overrides(seed.as_deref(), count.as_deref())
    }

    /// Apply textual overrides. Values that fail to parse are logged and
    /// ignored.
    pub fn with_overrides(mut self, seed: Option<&str>, foliage_count: Option<&str>) -> Self {
        if let Some(raw) = seed {
            match raw.trim().parse::<u64>() {
                Ok(seed) => self.seed = Some(seed),
                Err(e) => log::warn!("Ignoring {}={:?}: {}", SEED_ENV, raw, e),
            }
        }
        if let Some(raw) = foliage_count {
            match raw.trim().parse::<u32>() {
                Ok(count) => self.foliage_count = count,
                Err(e) => log::warn!("Ignoring {}={:?}: {}", FOLIAGE_COUNT_ENV, raw, e),
            }
        }
        self
    }

    /// Total number of ornament instances across all populations.
    pub fn ornament_count(&self) -> u32 {
        self.ornaments.iter().map(|o| o.count).sum()
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ornaments::OrnamentShape;

    #[test]
    fn test_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.dimensions.height, 16.0);
        assert_eq!(config.dimensions.radius, 6.5);
        assert_eq!(config.dimensions.scatter_radius, 25.0);
        assert_eq!(config.transition_speed, 2.5);
        assert_eq!(config.foliage_count, 15_000);
        assert_eq!(config.ornaments.len(), 4);
        assert_eq!(config.ornament_count(), 200 + 100 + 50 + 400);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_ornament_scatter_is_wider() {
        let dims = TreeDimensions::default();
        assert_eq!(dims.ornament_scatter_radius(), 37.5);
        assert_eq!(dims.base_y(), -8.0);
    }

    #[test]
    fn test_builder_chain() {
        let config = SceneConfig::new()
            .without_ornaments()
            .with_population(OrnamentConfig::gifts().with_count(3))
            .with_foliage_count(10)
            .with_seed(99)
            .with_transition_speed(-1.0);

        assert_eq!(config.ornaments.len(), 1);
        assert_eq!(config.ornaments[0].shape, OrnamentShape::Box);
        assert_eq!(config.foliage_count, 10);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.transition_speed, 0.0);
    }

    #[test]
    fn test_overrides() {
        let config = SceneConfig::new().with_overrides(Some(" 42 "), Some("1200"));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.foliage_count, 1200);

        let config = SceneConfig::new().with_overrides(Some("nope"), Some("-5"));
        assert_eq!(config.seed, None);
        assert_eq!(config.foliage_count, FOLIAGE_COUNT);
    }
}
