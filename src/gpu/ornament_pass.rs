//! Instanced ornament meshes, one draw per population.

use super::mesh::{Mesh, MeshVertex, SPHERE_RINGS, SPHERE_SEGMENTS};
use super::{DEPTH_FORMAT, HDR_FORMAT};
use crate::ornaments::{OrnamentField, OrnamentShape};
use crate::shaders::{MaterialUniform, ORNAMENT_WGSL};
use crate::sink::{InstanceBuffer, InstanceRaw};
use wgpu::util::DeviceExt;

struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn new(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// GPU side of one population.
struct Batch {
    shape: OrnamentShape,
    instance_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
    count: u32,
}

pub struct OrnamentPass {
    pipeline: wgpu::RenderPipeline,
    sphere: MeshBuffers,
    cube: MeshBuffers,
    batches: Vec<Batch>,
}

impl OrnamentPass {
    pub fn new(
        device: &wgpu::Device,
        globals_layout: &wgpu::BindGroupLayout,
        populations: &[OrnamentField],
    ) -> Self {
        let sphere = MeshBuffers::new(device, "Sphere", &Mesh::sphere(SPHERE_SEGMENTS, SPHERE_RINGS));
        let cube = MeshBuffers::new(device, "Cube", &Mesh::cube());

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let batches = populations
            .iter()
            .map(|field| {
                let config = field.config();
                let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("{} Instance Buffer", config.name)),
                    size: (field.len().max(1) * std::mem::size_of::<InstanceRaw>())
                        as wgpu::BufferAddress,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });

                let material = MaterialUniform::from(&config.material);
                let material_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Material Buffer", config.name)),
                    contents: bytemuck::bytes_of(&material),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{} Material Bind Group", config.name)),
                    layout: &material_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: material_buffer.as_entire_binding(),
                    }],
                });

                Batch {
                    shape: config.shape,
                    instance_buffer,
                    material_bind_group,
                    count: field.len() as u32,
                }
            })
            .collect();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Ornament Shader"),
            source: wgpu::ShaderSource::Wgsl(ORNAMENT_WGSL.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Ornament Pipeline Layout"),
            bind_group_layouts: &[globals_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let mesh_attributes = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        let instance_attributes = wgpu::vertex_attr_array![
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
        ];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Ornament Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &mesh_attributes,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &instance_attributes,
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            sphere,
            cube,
            batches,
        }
    }

    /// Upload every population whose transforms changed since the last call.
    pub fn upload(&self, queue: &wgpu::Queue, buffers: &mut [InstanceBuffer]) {
        for (batch, buffer) in self.batches.iter().zip(buffers.iter_mut()) {
            if buffer.take_dirty() && !buffer.is_empty() {
                queue.write_buffer(&batch.instance_buffer, 0, buffer.as_bytes());
            }
        }
    }

    /// Expects the globals bind group at slot 0.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        for batch in self.batches.iter().filter(|b| b.count > 0) {
            let mesh = match batch.shape {
                OrnamentShape::Sphere => &self.sphere,
                OrnamentShape::Box => &self.cube,
            };
            pass.set_bind_group(1, &batch.material_bind_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, batch.instance_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..mesh.index_count, 0, 0..batch.count);
        }
    }
}
