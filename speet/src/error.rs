use thiserror::Error;

#[derive(Error, Debug)]
pub enum SketchError {
    /// Two sketches with different `scaled` or `ksize` cannot be compared.
    #[error("incompatible ScaledMinHash comparison: scaled {scaled:?}, ksize {ksize:?}")]
    IncompatibleSketch {
        scaled: (u64, u64),
        ksize: (usize, usize),
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode sketch: {0}")]
    Decode(#[from] bincode::Error),

    #[error("Invalid sketch file: {0}")]
    InvalidFormat(String),

    #[error("Unsupported sketch format version {0}")]
    UnsupportedVersion(u32),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, SketchError>;
