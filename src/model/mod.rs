// MODEL: geometry, transforms and camera state
pub mod obj;
pub mod geometry;
pub mod transform;
pub mod camera;
pub mod scene;

pub use obj::RawModel;
pub use geometry::Vertex;
pub use transform::MeshTransform;
pub use camera::{Camera, Movement};
pub use scene::Scene;
