use std::path::PathBuf;

/// Errors that can occur during asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error loading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("{format} parse error on line {line}: {message}")]
    Parse {
        format: &'static str,
        line: usize,
        message: String,
    },

    #[error("PLY header is missing the end_header marker")]
    MissingEndHeader,

    #[error("{format}: index {index} is out of range for {count} {attribute}")]
    IndexOutOfRange {
        format: &'static str,
        attribute: &'static str,
        index: i64,
        count: usize,
    },

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("malformed JSON mesh: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load glTF file '{0}': {1}")]
    GltfLoadFailed(PathBuf, String),

    #[error("failed to load image '{0}': {1}")]
    ImageLoadFailed(PathBuf, String),

    #[error("unsupported asset format in '{0}'")]
    UnsupportedFormat(PathBuf),
}

impl AssetError {
    pub(crate) fn parse(format: &'static str, line: usize, message: impl Into<String>) -> Self {
        AssetError::Parse {
            format,
            line,
            message: message.into(),
        }
    }
}
