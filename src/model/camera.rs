use std::collections::HashSet;

use glam::{Mat4, Vec3};

pub const WORLD_UP: Vec3 = Vec3::Y;
pub const PITCH_LIMIT: f32 = 89.0;

/// Camera-relative movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

/// First-person camera. Yaw and pitch are in degrees; the basis is kept in
/// sync with them on every orientation change.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    pub speed: f32,
    pub sensitivity: f32,

    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32, speed: f32, sensitivity: f32) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: WORLD_UP,
            speed,
            sensitivity,
            fov_y: 45f32.to_radians(),
            aspect: 4.0 / 3.0,
            z_near: 0.1,
            z_far: 100.0,
        };
        camera.update_vectors();
        camera
    }

    pub fn yaw(&self) -> f32 { self.yaw }
    pub fn pitch(&self) -> f32 { self.pitch }
    pub fn front(&self) -> Vec3 { self.front }
    pub fn right(&self) -> Vec3 { self.right }
    pub fn up(&self) -> Vec3 { self.up }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far)
    }

    /// Move along front/right. Each held key contributes independently, so
    /// opposite keys cancel and adjacent ones move diagonally.
    pub fn process_keys(&mut self, delta_time: f32, pressed: &HashSet<Movement>) {
        let velocity = self.speed * delta_time;
        for movement in pressed {
            match movement {
                Movement::Forward => self.position += self.front * velocity,
                Movement::Backward => self.position -= self.front * velocity,
                Movement::Left => self.position -= self.right * velocity,
                Movement::Right => self.position += self.right * velocity,
            }
        }
    }

    /// Apply a mouse offset. `dy` is positive when looking up.
    pub fn process_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        // hard clamp, wrapping past the pole would flip the view
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 3.0), -90.0, 0.0, 5.0, 0.1)
    }

    fn keys(list: &[Movement]) -> HashSet<Movement> {
        list.iter().copied().collect()
    }

    #[test]
    fn basis_is_ready_after_construction() {
        let cam = camera();
        assert!(cam.front().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(cam.right().abs_diff_eq(Vec3::X, 1e-6));
        assert!(cam.up().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn basis_stays_orthonormal() {
        let mut cam = camera();
        cam.process_mouse_delta(123.0, 217.0);
        let (f, r, u) = (cam.front(), cam.right(), cam.up());
        assert!((f.length() - 1.0).abs() < 1e-5);
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!((u.length() - 1.0).abs() < 1e-5);
        assert!(f.dot(r).abs() < 1e-5);
        assert!(f.dot(u).abs() < 1e-5);
        assert!(r.dot(u).abs() < 1e-5);
    }

    #[test]
    fn view_matrix_looks_down_front() {
        let cam = camera();
        let expected = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, 2.0), Vec3::Y);
        assert!(cam.view_matrix().abs_diff_eq(expected, 1e-6));
        // camera position maps to the view-space origin
        assert!(cam.view_matrix().transform_point3(cam.position).abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn forward_moves_by_speed_times_dt() {
        let mut cam = camera();
        cam.process_keys(0.5, &keys(&[Movement::Forward]));
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), 1e-5));
    }

    #[test]
    fn simultaneous_keys_move_diagonally() {
        let mut cam = camera();
        cam.process_keys(1.0, &keys(&[Movement::Forward, Movement::Right]));
        assert!(cam.position.abs_diff_eq(Vec3::new(5.0, 0.0, -2.0), 1e-5));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut cam = camera();
        cam.process_keys(1.0, &keys(&[Movement::Left, Movement::Right, Movement::Forward, Movement::Backward]));
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-5));
    }

    #[test]
    fn no_keys_no_motion() {
        let mut cam = camera();
        cam.process_keys(10.0, &HashSet::new());
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn mouse_delta_is_scaled_by_sensitivity() {
        let mut cam = camera();
        cam.process_mouse_delta(100.0, 50.0);
        assert!((cam.yaw() - -80.0).abs() < 1e-4);
        assert!((cam.pitch() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_pinned_at_limits() {
        let mut cam = camera();
        for _ in 0..100 {
            cam.process_mouse_delta(0.0, 100.0);
        }
        assert_eq!(cam.pitch(), 89.0);
        let top = 89f32.to_radians().sin();
        assert!((cam.front().y - top).abs() < 1e-5);

        cam.process_mouse_delta(0.0, 1000.0);
        assert!((cam.front().y - top).abs() < 1e-5);

        for _ in 0..100 {
            cam.process_mouse_delta(0.0, -100.0);
        }
        assert_eq!(cam.pitch(), -89.0);
        assert!((cam.front().y + top).abs() < 1e-5);
    }

    #[test]
    fn initial_pitch_is_clamped() {
        let cam = Camera::new(Vec3::ZERO, 0.0, 120.0, 1.0, 1.0);
        assert_eq!(cam.pitch(), 89.0);
    }

    #[test]
    fn aspect_ignores_zero_height() {
        let mut cam = camera();
        cam.set_aspect(800, 600);
        let aspect = cam.aspect;
        cam.set_aspect(800, 0);
        assert_eq!(cam.aspect, aspect);
    }
}
