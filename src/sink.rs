//! Render sinks for per-instance transforms.
//!
//! The ornament fields never talk to the GPU. They write transforms into an
//! [`InstanceSink`] and flag it dirty once per frame; the renderer uploads any
//! [`InstanceBuffer`] whose dirty flag it takes.

use crate::ornaments::InstanceTransform;
use bytemuck::{Pod, Zeroable};

/// Consumer of per-instance transforms.
pub trait InstanceSink {
    /// Store the transform for instance `index`.
    fn set_transform(&mut self, index: usize, transform: &InstanceTransform);

    /// Signal that a full frame of transforms has been written.
    fn mark_dirty(&mut self);
}

/// GPU layout of one instance: a column-major model matrix.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl InstanceRaw {
    pub const IDENTITY: Self = Self {
        model: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };
}

impl From<&InstanceTransform> for InstanceRaw {
    fn from(t: &InstanceTransform) -> Self {
        Self {
            model: t.to_matrix().to_cols_array_2d(),
        }
    }
}

/// CPU-side staging buffer of instance matrices with a dirty flag.
#[derive(Debug, Clone)]
pub struct InstanceBuffer {
    instances: Vec<InstanceRaw>,
    dirty: bool,
}

impl InstanceBuffer {
    /// Buffer for `count` instances, initialised to identity and dirty so the
    /// first frame is always uploaded.
    pub fn new(count: usize) -> Self {
        Self {
            instances: vec![InstanceRaw::IDENTITY; count],
            dirty: true,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return the dirty flag and clear it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn instances(&self) -> &[InstanceRaw] {
        &self.instances
    }

    /// Raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl InstanceSink for InstanceBuffer {
    fn set_transform(&mut self, index: usize, transform: &InstanceTransform) {
        if let Some(slot) = self.instances.get_mut(index) {
            *slot = InstanceRaw::from(transform);
        } else {
            log::warn!(
                "Instance index {} out of range for buffer of {}",
                index,
                self.instances.len()
            );
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    #[test]
    fn test_new_buffer_is_dirty_identity() {
        let buf = InstanceBuffer::new(3);
        assert_eq!(buf.len(), 3);
        assert!(buf.is_dirty());
        assert!(buf.instances().iter().all(|i| *i == InstanceRaw::IDENTITY));
        assert_eq!(buf.as_bytes().len(), 3 * 64);
    }

    #[test]
    fn test_take_dirty_clears() {
        let mut buf = InstanceBuffer::new(1);
        assert!(buf.take_dirty());
        assert!(!buf.take_dirty());
        buf.mark_dirty();
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_set_transform_writes_matrix() {
        let mut buf = InstanceBuffer::new(2);
        let t = InstanceTransform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::ZERO,
            scale: 2.0,
        };
        buf.set_transform(1, &t);
        let expected = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            glam::Quat::IDENTITY,
            Vec3::new(1.0, 2.0, 3.0),
        );
        assert_eq!(buf.instances()[1].model, expected.to_cols_array_2d());
        assert_eq!(buf.instances()[0], InstanceRaw::IDENTITY);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut buf = InstanceBuffer::new(0);
        buf.set_transform(5, &InstanceTransform::default());
        assert!(buf.is_empty());
    }
}
