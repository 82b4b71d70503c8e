use thiserror::Error;

/// General purpose error for [`MediaCollection`](crate::MediaCollection)
/// implementations that do not bring their own error type.
///
/// The checked scan never wraps errors itself; it only requires that a
/// collection's error can absorb the `io::Error` raised by a failed directory
/// change, which the `Io` variant provides.
#[derive(Error, Debug)]
pub enum MediaError {
    /// Filesystem failure, including a failed directory change.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A check result could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The media directory or a media file could not be located.
    #[error("Media not found: {0}")]
    NotFound(String),

    /// The integrity check itself reported a failure.
    #[error("Media check failed: {0}")]
    CheckFailed(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result alias over [`MediaError`].
pub type Result<T> = std::result::Result<T, MediaError>;
