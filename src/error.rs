use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, FramerError>;

#[derive(thiserror::Error, Debug)]
pub enum FramerError {
    #[error("no frame configured: call set_frame before compositing")]
    NotConfigured,

    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl FramerError {
    pub fn decode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Encoder failures surface as write errors; the destination is what failed.
    pub fn encode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        let source = match source {
            image::ImageError::IoError(io) => io,
            other => std::io::Error::other(other),
        };
        Self::write(path, source)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
