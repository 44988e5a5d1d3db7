//! Ornament meshes: a UV sphere and a unit box.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

pub const SPHERE_SEGMENTS: u32 = 32;
pub const SPHERE_RINGS: u32 = 32;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Indexed triangle list, counter-clockwise front faces.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Unit-radius sphere.
    pub fn sphere(segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let row = segments + 1;

        let mut vertices = Vec::with_capacity((row * (rings + 1)) as usize);
        for iy in 0..=rings {
            let phi = iy as f32 / rings as f32 * PI;
            for ix in 0..=segments {
                let theta = ix as f32 / segments as f32 * TAU;
                let n = Vec3::new(-theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());
                vertices.push(MeshVertex {
                    position: n.to_array(),
                    normal: n.to_array(),
                });
            }
        }

        // Pole rows collapse to a point; skip their degenerate triangles.
        let mut indices = Vec::new();
        for iy in 0..rings {
            for ix in 0..segments {
                let a = (iy * row + ix + 1) as u16;
                let b = (iy * row + ix) as u16;
                let c = ((iy + 1) * row + ix) as u16;
                let d = ((iy + 1) * row + ix + 1) as u16;
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != rings - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    /// Axis-aligned cube with side 1, centered on the origin.
    pub fn cube() -> Self {
        // (normal, u, v) with u x v = normal
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = vertices.len() as u16;
            let center = normal * 0.5;
            for corner in [-u - v, u - v, u + v, -u + v] {
                vertices.push(MeshVertex {
                    position: (center + corner * 0.5).to_array(),
                    normal: normal.to_array(),
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangles(mesh: &Mesh) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        mesh.indices.chunks(3).map(|t| {
            [
                Vec3::from(mesh.vertices[t[0] as usize].position),
                Vec3::from(mesh.vertices[t[1] as usize].position),
                Vec3::from(mesh.vertices[t[2] as usize].position),
            ]
        })
    }

    #[test]
    fn test_sphere_counts() {
        let mesh = Mesh::sphere(SPHERE_SEGMENTS, SPHERE_RINGS);
        assert_eq!(mesh.vertices.len(), 33 * 33);
        assert_eq!(mesh.indices.len(), (2 * 32 * 32 - 2 * 32) * 3);
    }

    #[test]
    fn test_sphere_is_unit_and_outward() {
        let mesh = Mesh::sphere(16, 12);
        for v in &mesh.vertices {
            assert!((Vec3::from(v.position).length() - 1.0).abs() < 1e-5);
        }
        for [a, b, c] in triangles(&mesh) {
            let n = (b - a).cross(c - a);
            assert!(n.dot(a + b + c) > 0.0);
        }
    }

    #[test]
    fn test_cube_winding_matches_normals() {
        let mesh = Mesh::cube();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        for (i, [a, b, c]) in triangles(&mesh).enumerate() {
            let normal = Vec3::from(mesh.vertices[mesh.indices[i * 3] as usize].normal);
            assert!((b - a).cross(c - a).dot(normal) > 0.0);
            for p in [a, b, c] {
                assert_eq!(p.abs().max_element(), 0.5);
            }
        }
    }
}
