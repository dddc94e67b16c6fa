use crate::view::mesh::RenderableMesh;

/// Ordered, append-only collection of meshes. Draw order is insertion order.
#[derive(Default)]
pub struct Scene {
    meshes: Vec<RenderableMesh>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mesh and return its index
    pub fn add(&mut self, mesh: RenderableMesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderableMesh> {
        self.meshes.iter()
    }

    pub fn vertex_count(&self) -> u32 {
        self.meshes.iter().map(RenderableMesh::vertex_count).sum()
    }

    pub fn draw(&self, queue: &wgpu::Queue, pass: &mut wgpu::RenderPass<'_>) {
        for mesh in &self.meshes {
            mesh.draw(queue, pass);
        }
    }
}
