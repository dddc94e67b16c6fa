use glam::{Mat4, Vec3};

/// Model matrix built up by right-multiplying translate/rotate/scale in call order.
///
/// `translate(t); rotate(r); scale(s)` yields `T * R * S`, so the last call is
/// the first one applied to a local-space vertex. Nothing is re-orthonormalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshTransform {
    matrix: Mat4,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self { matrix: Mat4::IDENTITY }
    }
}

impl MeshTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        self.matrix *= Mat4::from_translation(offset);
        self
    }

    /// Rotate by `angle_deg` degrees about `axis` (normalized here)
    pub fn rotate(&mut self, angle_deg: f32, axis: Vec3) -> &mut Self {
        self.matrix *= Mat4::from_axis_angle(axis.normalize(), angle_deg.to_radians());
        self
    }

    pub fn scale(&mut self, factor: Vec3) -> &mut Self {
        self.matrix *= Mat4::from_scale(factor);
        self
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }
}
