use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{name} directory not found: {}", .path.display())]
    MissingDirectory { name: &'static str, path: PathBuf },

    #[error("no mission directories found in {}", .0.display())]
    NoMissionsFound(PathBuf),

    #[error("parse error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("mandatory field `{0}` not found")]
    MissingField(&'static str),

    #[error("malformed `{field}` body: {message}")]
    MalformedField { field: &'static str, message: String },

    #[error("bad feature data in {}: {message}", .path.display())]
    FeatureDecode { path: PathBuf, message: String },

    #[error("bad json data in {}: {message}", .path.display())]
    JsonData { path: PathBuf, message: String },

    #[error("war level points ratio {0} exceeds 1")]
    RatioOutOfBounds(f64),

    #[error("io error on {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
}

impl Error {
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn json(path: &Path, err: serde_json::Error) -> Self {
        Error::JsonData {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
