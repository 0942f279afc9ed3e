use thiserror::Error;

/// Errors raised while loading assets and configuration.
///
/// The alignment engine itself never fails; only the ambient layer around it
/// (embedded data files, config on disk) can.
#[derive(Debug, Error)]
pub enum ReciteError {
    /// An embedded asset file is missing.
    #[error("asset not found: {0}")]
    Asset(String),

    /// No assets are bundled for the requested locale.
    #[error("unknown locale: {0}")]
    UnknownLocale(String),

    /// An asset exists but is not valid UTF-8.
    #[error("asset is not valid utf-8: {0}")]
    Encoding(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReciteError>;
