use thiserror::Error;

/// All errors produced by bargein-core.
///
/// Only construction and configuration loading can fail. Per-chunk processing
/// never returns an error; bad input degrades to "no onset".
#[derive(Debug, Error)]
pub enum BargeInError {
    #[error("invalid detector config: {0}")]
    InvalidConfig(String),

    #[error("unsupported sample encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("spectral transform error: {0}")]
    Transform(String),

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BargeInError>;
