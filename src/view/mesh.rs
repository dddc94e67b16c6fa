use std::path::Path;

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::error::Result;
use crate::model::geometry::{reshape, Vertex};
use crate::model::obj::{self, RawModel};
use crate::model::transform::MeshTransform;
use crate::view::mipmap::MipmapGenerator;
use crate::view::shader::ShaderProgram;
use crate::view::texture::{Sampling, Texture};

/// GPU side of a mesh. Created once by `setup_buffers`, released on drop.
struct MeshResources {
    vertex_buffer: wgpu::Buffer,
    texture: Texture,
    texture_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
}

impl Drop for MeshResources {
    fn drop(&mut self) {
        self.vertex_buffer.destroy();
        self.model_buffer.destroy();
        self.texture.texture.destroy();
    }
}

/// Flattened triangle-list geometry plus the GPU state needed to draw it
pub struct RenderableMesh {
    vertices: Vec<Vertex>,
    transform: MeshTransform,
    resources: Option<MeshResources>,
}

impl RenderableMesh {
    pub fn from_model(model: &RawModel) -> Result<Self> {
        Ok(Self {
            vertices: reshape(model)?,
            transform: MeshTransform::new(),
            resources: None,
        })
    }

    /// Parse a model file and reshape it
    pub fn load(path: &Path) -> Result<Self> {
        let mesh = Self::from_model(&obj::parse(path)?)?;
        tracing::info!(
            path = %path.display(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "loaded mesh"
        );
        Ok(mesh)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn triangle_count(&self) -> u32 {
        self.vertex_count() / 3
    }

    /// Upload vertices, decode and upload the texture, and build the
    /// per-mesh bind groups against `shader`'s layouts.
    pub fn setup_buffers(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        shader: &ShaderProgram,
        mipmaps: &MipmapGenerator,
        texture_path: &Path,
        sampling: Sampling,
    ) -> Result<()> {
        // decode before allocating any buffers
        let texture = Texture::load(device, queue, mipmaps, texture_path, sampling)?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertex_buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mesh_texture_bg"),
            layout: shader.texture_layout(),
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&texture.view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&texture.sampler) },
            ],
        });

        let model_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_model_buffer"),
            contents: bytemuck::cast_slice(&self.transform.matrix().to_cols_array()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mesh_model_bg"),
            layout: shader.model_layout(),
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: model_buffer.as_entire_binding() }],
        });

        self.resources = Some(MeshResources {
            vertex_buffer,
            texture,
            texture_bind_group,
            model_buffer,
            model_bind_group,
        });
        Ok(())
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.transform.translate(offset);
    }

    pub fn rotate(&mut self, angle_deg: f32, axis: Vec3) {
        self.transform.rotate(angle_deg, axis);
    }

    pub fn scale(&mut self, factor: Vec3) {
        self.transform.scale(factor);
    }

    pub fn transform_mut(&mut self) -> &mut MeshTransform {
        &mut self.transform
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }

    /// Record a triangle-list draw of every vertex with the current model
    /// matrix. The mesh's shader program must already be bound on `pass`.
    /// A mesh with no faces records nothing.
    pub fn draw(&self, queue: &wgpu::Queue, pass: &mut wgpu::RenderPass<'_>) {
        let Some(res) = &self.resources else {
            tracing::warn!("draw called on a mesh without GPU buffers");
            return;
        };
        if self.vertices.is_empty() {
            tracing::trace!("skipping draw of empty mesh");
            return;
        }

        queue.write_buffer(
            &res.model_buffer,
            0,
            bytemuck::cast_slice(&self.transform.matrix().to_cols_array()),
        );
        pass.set_bind_group(1, &res.texture_bind_group, &[]);
        pass.set_bind_group(2, &res.model_bind_group, &[]);
        pass.set_vertex_buffer(0, res.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count(), 0..1);
    }
}
