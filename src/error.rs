use std::path::PathBuf;
use thiserror::Error;

/// Which of the three attribute streams a face corner points into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    TexCoord,
    Normal,
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Attribute::Position => "position",
            Attribute::TexCoord => "texture coordinate",
            Attribute::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Shader pipeline stage, used to name the stage that failed to compile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Every setup-time failure. None of these are retried; they end the process.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot open {}: {source}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: face must have exactly 3 corners of the form p/t/n, got `{text}`")]
    MalformedFace { line: usize, text: String },

    #[error("line {line}: malformed `{tag}` record `{text}`")]
    MalformedRecord {
        line: usize,
        tag: &'static str,
        text: String,
    },

    #[error("face {face} corner {corner}: {attribute} index {index} out of range (have {len})")]
    IndexOutOfRange {
        face: usize,
        corner: usize,
        attribute: Attribute,
        index: usize,
        len: usize,
    },

    #[error("could not load texture {}: {source}", path.display())]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot read shader source {}: {source}", path.display())]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader compilation failed: {message}")]
    ShaderCompile { stage: ShaderStage, message: String },

    #[error("shader program link failed: {message}")]
    ShaderLink { message: String },

    #[error("graphics context init failed: {0}")]
    ContextInit(String),

    #[error("surface presentation failed: {0}")]
    Present(#[source] wgpu::SurfaceError),

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
