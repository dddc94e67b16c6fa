use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::camera::Camera;
use crate::model::transform::MeshTransform;
use crate::view::texture::{FilterMode, Sampling, WrapMode};

pub const DEFAULT_CONFIG_PATH: &str = "assets/scene.json";

/// Top-level scene description
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub shaders: ShaderConfig,
    pub camera: CameraConfig,
    pub meshes: Vec<MeshConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "mesh sandbox".to_string(),
            width: 800,
            height: 600,
            vsync: true,
        }
    }
}

/// Shader sources on disk. Both must be set to replace the built-in pair.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ShaderConfig {
    pub vertex: Option<PathBuf>,
    pub fragment: Option<PathBuf>,
}

impl ShaderConfig {
    pub fn paths(&self) -> Option<(&Path, &Path)> {
        match (&self.vertex, &self.fragment) {
            (Some(v), Some(f)) => Some((v.as_path(), f.as_path())),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Degrees
    pub yaw: f32,
    /// Degrees
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            yaw: -90.0,
            pitch: 0.0,
            speed: 5.0,
            sensitivity: 0.1,
            fov_y: 45.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

impl CameraConfig {
    pub fn build(&self, width: u32, height: u32) -> Camera {
        let mut camera = Camera::new(
            Vec3::from_array(self.position),
            self.yaw,
            self.pitch,
            self.speed,
            self.sensitivity,
        );
        camera.fov_y = self.fov_y.to_radians();
        camera.z_near = self.z_near;
        camera.z_far = self.z_far;
        camera.set_aspect(width, height);
        camera
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TransformStep {
    Translate([f32; 3]),
    Rotate { angle: f32, axis: [f32; 3] },
    Scale([f32; 3]),
}

impl TransformStep {
    pub fn apply(&self, transform: &mut MeshTransform) {
        match *self {
            TransformStep::Translate(t) => {
                transform.translate(Vec3::from_array(t));
            }
            TransformStep::Rotate { angle, axis } => {
                transform.rotate(angle, Vec3::from_array(axis));
            }
            TransformStep::Scale(s) => {
                transform.scale(Vec3::from_array(s));
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MeshConfig {
    pub model: PathBuf,
    pub texture: PathBuf,
    #[serde(default)]
    pub wrap: WrapMode,
    #[serde(default)]
    pub filter: FilterMode,
    #[serde(default)]
    pub transforms: Vec<TransformStep>,
}

impl MeshConfig {
    pub fn sampling(&self) -> Sampling {
        Sampling { wrap: self.wrap, filter: self.filter }
    }

    /// Model matrix produced by applying `transforms` in order
    pub fn transform(&self) -> MeshTransform {
        let mut transform = MeshTransform::new();
        for step in &self.transforms {
            step.apply(&mut transform);
        }
        transform
    }
}

impl Config {
    /// Read a JSON scene file. Relative paths inside it are resolved against
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut config = Self::from_json(&text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_paths(base);
        tracing::debug!(path = %path.display(), meshes = config.meshes.len(), "loaded config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(v) = self.shaders.vertex.as_mut() {
            resolve(v);
        }
        if let Some(f) = self.shaders.fragment.as_mut() {
            resolve(f);
        }
        for mesh in &mut self.meshes {
            resolve(&mut mesh.model);
            resolve(&mut mesh.texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.camera.yaw, -90.0);
        assert!(config.shaders.paths().is_none());
        assert!(config.meshes.is_empty());
    }

    #[test]
    fn parses_mesh_entries() {
        let text = r#"{
            "meshes": [{
                "model": "models/cube.obj",
                "texture": "textures/wall.png",
                "wrap": "clamp_to_edge",
                "filter": "nearest",
                "transforms": [
                    {"translate": [1.0, 0.0, 0.0]},
                    {"rotate": {"angle": -50.0, "axis": [1.0, 0.0, 0.0]}},
                    {"scale": [0.5, 0.5, 0.5]}
                ]
            }]
        }"#;
        let config = Config::from_json(text).unwrap();
        let mesh = &config.meshes[0];
        assert_eq!(mesh.wrap, WrapMode::ClampToEdge);
        assert_eq!(mesh.filter, FilterMode::Nearest);
        assert_eq!(mesh.transforms.len(), 3);

        let expected = Mat4::from_translation(Vec3::X)
            * Mat4::from_axis_angle(Vec3::X, (-50f32).to_radians())
            * Mat4::from_scale(Vec3::splat(0.5));
        assert!(mesh.transform().matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn sampling_defaults_to_repeat_linear() {
        let config = Config::from_json(r#"{"meshes":[{"model":"a.obj","texture":"a.png"}]}"#).unwrap();
        let sampling = config.meshes[0].sampling();
        assert_eq!(sampling.wrap, WrapMode::Repeat);
        assert_eq!(sampling.filter, FilterMode::Linear);
        assert_eq!(config.meshes[0].transform().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn mesh_without_texture_is_rejected() {
        assert!(Config::from_json(r#"{"meshes":[{"model":"a.obj"}]}"#).is_err());
    }

    #[test]
    fn camera_config_builds_camera() {
        let camera = CameraConfig::default().build(800, 600);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(camera.yaw(), -90.0);
        assert!((camera.fov_y - 45f32.to_radians()).abs() < 1e-6);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let mut config = Config::from_json(
            r#"{"shaders":{"vertex":"s.vert.wgsl","fragment":"/abs/s.frag.wgsl"},
                "meshes":[{"model":"m.obj","texture":"t.png"}]}"#,
        )
        .unwrap();
        config.resolve_paths(Path::new("/scenes"));
        let (v, f) = config.shaders.paths().unwrap();
        assert_eq!(v, Path::new("/scenes/s.vert.wgsl"));
        assert_eq!(f, Path::new("/abs/s.frag.wgsl"));
        assert_eq!(config.meshes[0].model, Path::new("/scenes/m.obj"));
        assert_eq!(config.meshes[0].texture, Path::new("/scenes/t.png"));
    }

    #[test]
    fn bundled_scene_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let config = Config::load(&path).unwrap();
        assert!(!config.meshes.is_empty());
        for mesh in &config.meshes {
            assert!(mesh.model.exists(), "{}", mesh.model.display());
            assert!(mesh.texture.exists(), "{}", mesh.texture.display());
        }
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = Config::load(Path::new("/nonexistent/scene.json")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
