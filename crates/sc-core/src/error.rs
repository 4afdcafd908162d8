use thiserror::Error;

/// Why a value could not be compressed or decompressed.
///
/// Codec errors never cross the storage boundary: the decorator turns them
/// into a dropped write or a miss.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("{codec} codec failed: {source}")]
    Codec {
        codec: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid base64 text: {0}")]
    TextDecode(#[from] base64::DecodeError),
    #[error("decompressed data is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("decompressed data is not JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("stored value is not text")]
    NotText,
    #[error("codec task failed: {0}")]
    Task(String),
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Errors raised by storage drivers. These propagate to the caller unchanged.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;
