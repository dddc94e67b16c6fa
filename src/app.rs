use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::config::{Config, MeshConfig};
use crate::controller::frame_loop::{CameraUniform, FrameLoopContext};
use crate::controller::input::{InputEvent, InputState};
use crate::error::{Error, Result};
use crate::model::scene::Scene;
use crate::view::gpu_init::GpuContext;
use crate::view::mesh::RenderableMesh;
use crate::view::mipmap::MipmapGenerator;
use crate::view::render::RenderState;
use crate::view::shader::ShaderProgram;

/// Everything that exists once the window and GPU are up
struct AppState {
    window: Arc<Window>,
    gpu: GpuContext,
    shader: ShaderProgram,
    render_state: RenderState,
    scene: Scene,
    frame: FrameLoopContext,
    /// Cursor is locked; look input comes from raw device motion
    raw_mouse: bool,
}

pub struct App {
    config: Config,
    state: Option<AppState>,
    error: Option<Error>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config, state: None, error: None }
    }

    /// First fatal error hit while running, if any
    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        tracing::debug!("stopping event loop after error");
        self.error = Some(err);
        self.state = None;
        event_loop.exit();
    }
}

/// Hide the cursor and confine it to the window. Returns true when the
/// cursor could be locked in place.
fn grab_cursor(window: &Window) -> bool {
    let locked = match window.set_cursor_grab(CursorGrabMode::Locked) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "cursor lock unavailable, confining instead");
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::Confined) {
                tracing::warn!(error = %e, "could not grab cursor");
            }
            false
        }
    };
    window.set_cursor_visible(false);
    locked
}

fn load_mesh(
    gpu: &GpuContext,
    shader: &ShaderProgram,
    mipmaps: &MipmapGenerator,
    entry: &MeshConfig,
) -> Result<RenderableMesh> {
    let mut mesh = RenderableMesh::load(&entry.model)?;
    mesh.setup_buffers(&gpu.device, &gpu.queue, shader, mipmaps, &entry.texture, entry.sampling())?;
    *mesh.transform_mut() = entry.transform();
    Ok(mesh)
}

fn bootstrap(config: &Config, event_loop: &ActiveEventLoop) -> Result<AppState> {
    let attributes = Window::default_attributes()
        .with_title(config.window.title.clone())
        .with_inner_size(LogicalSize::new(config.window.width, config.window.height));
    let window = Arc::new(
        event_loop
            .create_window(attributes)
            .map_err(|e| Error::ContextInit(format!("create window: {e}")))?,
    );

    let raw_mouse = grab_cursor(&window);

    let gpu = pollster::block_on(GpuContext::new(window.clone(), config.window.vsync))?;
    let (width, height) = gpu.size();

    let shader = match config.shaders.paths() {
        Some((vertex, fragment)) => ShaderProgram::from_files(&gpu.device, gpu.format, vertex, fragment)?,
        None => ShaderProgram::builtin(&gpu.device, gpu.format)?,
    };

    let mipmaps = MipmapGenerator::new(&gpu.device);
    let mut scene = Scene::new();
    for entry in &config.meshes {
        scene.add(load_mesh(&gpu, &shader, &mipmaps, entry)?);
    }
    tracing::info!(meshes = scene.len(), vertices = scene.vertex_count(), "scene ready");

    let render_state = RenderState::new(&gpu);

    let camera = config.camera.build(width, height);
    shader.set_camera(&gpu.queue, &CameraUniform::from_camera(&camera));

    let centre = (f64::from(width) / 2.0, f64::from(height) / 2.0);
    let frame = FrameLoopContext::new(camera, InputState::new(centre));

    Ok(AppState {
        window,
        gpu,
        shader,
        render_state,
        scene,
        frame,
        raw_mouse,
    })
}

/// What the frame loop does after `get_current_texture` fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceAction {
    Reconfigure,
    Skip,
}

fn surface_error_action(err: wgpu::SurfaceError) -> Result<SurfaceAction> {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Ok(SurfaceAction::Reconfigure),
        wgpu::SurfaceError::OutOfMemory => Err(Error::Present(err)),
        _ => Ok(SurfaceAction::Skip),
    }
}

impl AppState {
    fn resize(&mut self, size: PhysicalSize<u32>) {
        if !self.gpu.resize(size.width, size.height) {
            return;
        }
        self.render_state.resize(&self.gpu);
        self.frame.camera.set_aspect(size.width, size.height);
        self.shader.set_projection(&self.gpu.queue, self.frame.camera.projection_matrix());
        tracing::debug!(width = size.width, height = size.height, "resized");
    }

    /// Run one frame. An error means the loop has to stop.
    fn redraw(&mut self) -> Result<()> {
        let Err(err) = self.frame.frame(&self.gpu, &self.shader, &self.render_state, &self.scene) else {
            return Ok(());
        };
        match surface_error_action(err.clone())? {
            SurfaceAction::Reconfigure => self.gpu.reconfigure(),
            SurfaceAction::Skip => tracing::warn!(error = %err, "skipping frame"),
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match bootstrap(&self.config, event_loop) {
            Ok(state) => self.state = Some(state),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else { return };
        if id != state.window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size),
            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state: key_state, .. },
                ..
            } => {
                let input = match key_state {
                    ElementState::Pressed => InputEvent::KeyDown(code),
                    ElementState::Released => InputEvent::KeyUp(code),
                };
                state.frame.handle_input(&input);
                if state.frame.close_requested() {
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } if !state.raw_mouse => {
                state.frame.handle_input(&InputEvent::CursorMoved { x: position.x, y: position.y });
            }
            WindowEvent::Focused(false) => state.frame.handle_input(&InputEvent::FocusLost),
            WindowEvent::Focused(true) => state.raw_mouse = grab_cursor(&state.window),
            WindowEvent::RedrawRequested => {
                if let Err(e) = state.redraw() {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        let Some(state) = self.state.as_mut() else { return };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if state.raw_mouse {
                state.frame.handle_input(&InputEvent::MouseMotion { dx, dy });
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

/// Open the window and run the frame loop until it closes
pub fn run(config: Config) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|e| Error::ContextInit(format!("event loop: {e}")))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| Error::ContextInit(format!("event loop: {e}")))?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
