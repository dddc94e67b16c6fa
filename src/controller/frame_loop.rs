use std::time::Instant;

use glam::Mat4;

use crate::controller::input::{InputEvent, InputState};
use crate::model::camera::Camera;
use crate::model::scene::Scene;
use crate::view::gpu_init::GpuContext;
use crate::view::render::RenderState;
use crate::view::shader::ShaderProgram;

/// Contents of the group 0 uniform: view then projection, column-major
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view: camera.view_matrix().to_cols_array_2d(),
            projection: camera.projection_matrix().to_cols_array_2d(),
        }
    }
}

/// Seconds elapsed between consecutive frames
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { last: start }
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-frame state: timing, camera and accumulated input
pub struct FrameLoopContext {
    pub clock: FrameClock,
    pub camera: Camera,
    pub input: InputState,
}

impl FrameLoopContext {
    pub fn new(camera: Camera, input: InputState) -> Self {
        Self { clock: FrameClock::new(), camera, input }
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        self.input.process_event(event);
    }

    pub fn close_requested(&self) -> bool {
        self.input.close_requested()
    }

    /// Advance one frame: measure dt, apply look then movement, return the view
    pub fn update(&mut self) -> Mat4 {
        let now = Instant::now();
        self.update_at(now)
    }

    pub fn update_at(&mut self, now: Instant) -> Mat4 {
        let dt = self.clock.tick_at(now);

        let (dx, dy) = self.input.consume_look();
        if dx != 0.0 || dy != 0.0 {
            self.camera.process_mouse_delta(dx, dy);
        }
        self.camera.process_keys(dt, self.input.held());
        tracing::trace!(dt, position = ?self.camera.position, "frame update");

        self.camera.view_matrix()
    }

    /// Full frame: update, upload the view, clear, draw every mesh, present
    pub fn frame(
        &mut self,
        gpu: &GpuContext,
        shader: &ShaderProgram,
        render_state: &RenderState,
        scene: &Scene,
    ) -> Result<(), wgpu::SurfaceError> {
        let view = self.update();
        shader.set_view(&gpu.queue, view);
        render_state.draw_frame(gpu, shader, scene)
    }
}
