//! Headless device and render pass for unit tests, backed by wgpu's noop backend

use std::path::{Path, PathBuf};

use crate::view::render::create_depth_texture;
use crate::view::shader::ShaderProgram;
use crate::view::texture::TEXTURE_FORMAT;

pub const TARGET_SIZE: u32 = 4;

pub fn device() -> (wgpu::Device, wgpu::Queue) {
    wgpu::Device::noop(&wgpu::DeviceDescriptor::default())
}

pub fn asset(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join(relative)
}

pub fn shader(device: &wgpu::Device) -> ShaderProgram {
    ShaderProgram::builtin(device, TEXTURE_FORMAT).unwrap()
}

/// Record one cleared pass with `shader` bound, let `draw` add to it, submit.
/// Returns the first validation error raised on the way.
pub fn render_pass(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    shader: &ShaderProgram,
    draw: impl FnOnce(&mut wgpu::RenderPass<'_>),
) -> Option<wgpu::Error> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let color = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("test_color_target"),
        size: wgpu::Extent3d { width: TARGET_SIZE, height: TARGET_SIZE, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
    let (_depth, depth_view) = create_depth_texture(device, TARGET_SIZE, TARGET_SIZE);

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("test_encoder") });
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("test_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        shader.bind(&mut pass);
        draw(&mut pass);
    }
    queue.submit(std::iter::once(encoder.finish()));

    pollster::block_on(device.pop_error_scope())
}
