use std::fs;
use std::path::Path;

use glam::Mat4;

use crate::controller::frame_loop::CameraUniform;
use crate::error::{Error, Result, ShaderStage};
use crate::model::geometry::Vertex;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub const BUILTIN_VERTEX_SHADER: &str = include_str!("shaders/mesh.vert.wgsl");
pub const BUILTIN_FRAGMENT_SHADER: &str = include_str!("shaders/mesh.frag.wgsl");

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    wgpu::VertexAttribute { offset: 0, shader_location: 0, format: wgpu::VertexFormat::Float32x3 },
    wgpu::VertexAttribute { offset: 12, shader_location: 1, format: wgpu::VertexFormat::Float32x3 },
    wgpu::VertexAttribute { offset: 24, shader_location: 2, format: wgpu::VertexFormat::Float32x2 },
];

/// Compiled and linked mesh shader.
///
/// Bind groups: 0 = camera (view, projection), owned here and shared by every
/// mesh; 1 = mesh texture + sampler; 2 = mesh model matrix. Meshes build their
/// own group 1/2 against [`ShaderProgram::texture_layout`] and
/// [`ShaderProgram::model_layout`].
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    model_layout: wgpu::BindGroupLayout,
}

impl ShaderProgram {
    /// Read both stages from disk, then compile and link
    pub fn from_files(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<Self> {
        let vertex_src = read_source(vertex_path)?;
        let fragment_src = read_source(fragment_path)?;
        Self::new(device, color_format, &vertex_src, &fragment_src)
    }

    pub fn builtin(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Result<Self> {
        Self::new(device, color_format, BUILTIN_VERTEX_SHADER, BUILTIN_FRAGMENT_SHADER)
    }

    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self> {
        let vertex = compile(device, ShaderStage::Vertex, vertex_src)?;
        let fragment = compile(device, ShaderStage::Fragment, fragment_src)?;

        let camera_layout = uniform_layout(device, "camera_bgl", wgpu::ShaderStages::VERTEX);
        let model_layout = uniform_layout(device, "model_bgl", wgpu::ShaderStages::VERTEX);
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&camera_layout, &texture_layout, &model_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: Vertex::STRIDE as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(Error::ShaderLink { message: err.to_string() });
        }

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera_buffer"),
            size: std::mem::size_of::<CameraUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() }],
        });

        tracing::info!("mesh shader program linked");

        Ok(Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            texture_layout,
            model_layout,
        })
    }

    /// Make this program current for the pass
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
    }

    pub fn set_camera(&self, queue: &wgpu::Queue, uniform: &CameraUniform) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(uniform));
    }

    pub fn set_view(&self, queue: &wgpu::Queue, view: Mat4) {
        let offset = std::mem::offset_of!(CameraUniform, view) as wgpu::BufferAddress;
        queue.write_buffer(&self.camera_buffer, offset, bytemuck::cast_slice(&view.to_cols_array()));
    }

    pub fn set_projection(&self, queue: &wgpu::Queue, projection: Mat4) {
        let offset = std::mem::offset_of!(CameraUniform, projection) as wgpu::BufferAddress;
        queue.write_buffer(&self.camera_buffer, offset, bytemuck::cast_slice(&projection.to_cols_array()));
    }

    pub fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_layout
    }

    pub fn model_layout(&self) -> &wgpu::BindGroupLayout {
        &self.model_layout
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::ShaderSource {
        path: path.to_path_buf(),
        source,
    })
}

fn compile(device: &wgpu::Device, stage: ShaderStage, src: &str) -> Result<wgpu::ShaderModule> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "mesh_vertex_shader",
            ShaderStage::Fragment => "mesh_fragment_shader",
        }),
        source: wgpu::ShaderSource::Wgsl(src.into()),
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(Error::ShaderCompile { stage, message: err.to_string() }),
        None => Ok(module),
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}
