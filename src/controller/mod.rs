// CONTROLLER: input translation and the per-frame update
pub mod input;
pub mod frame_loop;

pub use input::{InputEvent, InputState, KeyBindings, MouseTracker};
pub use frame_loop::{CameraUniform, FrameClock, FrameLoopContext};
