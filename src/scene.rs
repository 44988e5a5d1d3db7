//! The whole tree: one foliage field plus every ornament population.
//!
//! [`TreeScene::tick`] is the single per-frame entry point. It reads the
//! selector once, updates each field independently and leaves the new
//! ornament transforms in one [`InstanceBuffer`] per population for the
//! renderer to upload.

use crate::config::{SceneConfig, TreeDimensions};
use crate::foliage::{FoliageField, FoliageUniforms};
use crate::ornaments::OrnamentField;
use crate::sink::InstanceBuffer;
use crate::state::TreeState;
use crate::time::FrameTime;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Generated scene state.
#[derive(Debug, Clone)]
pub struct TreeScene {
    dimensions: TreeDimensions,
    offset: Vec3,
    seed: u64,
    foliage: FoliageField,
    ornaments: Vec<OrnamentField>,
    buffers: Vec<InstanceBuffer>,
}

impl TreeScene {
    /// Generate from `config`, drawing a seed from the OS if none is set.
    pub fn new(config: &SceneConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut scene = Self::generate(config, &mut rng);
        scene.seed = seed;

        log::info!(
            "Generated tree: {} foliage points, {} ornaments in {} populations (seed {})",
            scene.foliage.len(),
            scene.ornament_count(),
            scene.ornaments.len(),
            seed
        );

        scene
    }

    /// Generate from `config` using an explicit random source.
    pub fn generate<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Self {
        let dims = config.dimensions;
        let foliage =
            FoliageField::generate(config.foliage_count, &dims, config.transition_speed, rng);

        let ornaments: Vec<OrnamentField> = config
            .ornaments
            .iter()
            .map(|o| OrnamentField::generate(o.clone(), &dims, config.transition_speed, rng))
            .collect();
        let buffers = ornaments
            .iter()
            .map(|o| InstanceBuffer::new(o.len()))
            .collect();

        Self {
            dimensions: dims,
            offset: config.offset,
            seed: config.seed.unwrap_or_default(),
            foliage,
            ornaments,
            buffers,
        }
    }

    /// Advance every field by one frame. Returns the foliage uniforms.
    pub fn tick(&mut self, state: TreeState, frame: FrameTime) -> FoliageUniforms {
        let uniforms = self.foliage.update(state, frame.elapsed, frame.delta);
        for (field, buffer) in self.ornaments.iter_mut().zip(self.buffers.iter_mut()) {
            field.update(state, frame.elapsed, frame.delta, buffer);
        }
        uniforms
    }

    pub fn dimensions(&self) -> &TreeDimensions {
        &self.dimensions
    }

    /// Translation of the tree group.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn foliage(&self) -> &FoliageField {
        &self.foliage
    }

    pub fn ornaments(&self) -> &[OrnamentField] {
        &self.ornaments
    }

    /// Instance buffer of population `index`.
    pub fn buffer(&self, index: usize) -> Option<&InstanceBuffer> {
        self.buffers.get(index)
    }

    /// Instance buffers, one per population, in population order.
    pub fn buffers_mut(&mut self) -> &mut [InstanceBuffer] {
        &mut self.buffers
    }

    pub fn ornament_count(&self) -> usize {
        self.ornaments.iter().map(OrnamentField::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ornaments::OrnamentConfig;

    fn small_config() -> SceneConfig {
        SceneConfig::new()
            .with_foliage_count(100)
            .with_populations(vec![
                OrnamentConfig::gold_baubles().with_count(10),
                OrnamentConfig::gifts().with_count(5),
            ])
            .with_seed(12)
    }

    #[test]
    fn test_scene_generation() {
        let scene = TreeScene::new(&small_config());
        assert_eq!(scene.foliage().len(), 100);
        assert_eq!(scene.ornaments().len(), 2);
        assert_eq!(scene.ornament_count(), 15);
        assert_eq!(scene.buffer(0).map(InstanceBuffer::len), Some(10));
        assert_eq!(scene.buffer(1).map(InstanceBuffer::len), Some(5));
        assert_eq!(scene.seed(), 12);
        assert_eq!(scene.offset(), Vec3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn test_same_seed_same_scene() {
        let a = TreeScene::new(&small_config());
        let b = TreeScene::new(&small_config());
        assert_eq!(a.foliage().particles(), b.foliage().particles());
        assert_eq!(a.ornaments()[1].instances(), b.ornaments()[1].instances());
    }

    #[test]
    fn test_fields_progress_together() {
        let mut scene = TreeScene::new(&small_config());
        for i in 0..40 {
            scene.tick(TreeState::TreeShape, FrameTime::new(i as f32 / 60.0, 1.0 / 60.0));
        }
        let foliage = scene.foliage().progress();
        assert!(foliage > 0.0 && foliage < 1.0);
        for field in scene.ornaments() {
            assert_eq!(field.progress(), foliage);
        }
    }

    #[test]
    fn test_tick_marks_buffers_dirty() {
        let mut scene = TreeScene::new(&small_config());
        for buffer in scene.buffers_mut() {
            buffer.take_dirty();
        }
        scene.tick(TreeState::Scattered, FrameTime::new(0.1, 1.0 / 60.0));
        assert!(scene.buffers_mut().iter_mut().all(|b| b.take_dirty()));
    }
}
