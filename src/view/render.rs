use crate::model::scene::Scene;
use crate::view::gpu_init::GpuContext;
use crate::view::shader::{ShaderProgram, DEPTH_FORMAT};

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.2, g: 0.3, b: 0.3, a: 1.0 };

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

/// Per-window render targets that outlive a single frame
pub struct RenderState {
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    pub clear_color: wgpu::Color,
}

impl RenderState {
    pub fn new(gpu: &GpuContext) -> Self {
        let (width, height) = gpu.size();
        let (depth_texture, depth_view) = create_depth_texture(&gpu.device, width, height);
        Self { depth_texture, depth_view, clear_color: CLEAR_COLOR }
    }

    pub fn resize(&mut self, gpu: &GpuContext) {
        let (width, height) = gpu.size();
        let (depth_texture, depth_view) = create_depth_texture(&gpu.device, width, height);
        self.depth_texture.destroy();
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Clear colour and depth, draw every mesh in scene order, present.
    pub fn draw_frame(
        &self,
        gpu: &GpuContext,
        shader: &ShaderProgram,
        scene: &Scene,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = gpu.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });

        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            shader.bind(&mut rp);
            scene.draw(&gpu.queue, &mut rp);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
