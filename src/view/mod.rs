// VIEW: GPU resources and rendering
pub mod gpu_init;
pub mod render;
pub mod shader;
pub mod texture;
pub mod mipmap;
pub mod mesh;
#[cfg(test)]
pub(crate) mod testing;

pub use gpu_init::GpuContext;
pub use render::RenderState;
pub use shader::ShaderProgram;
pub use texture::{FilterMode, Sampling, Texture, WrapMode};
pub use mipmap::MipmapGenerator;
pub use mesh::RenderableMesh;
