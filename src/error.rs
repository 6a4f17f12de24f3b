use thiserror::Error;

/// A required form field was missing or out of range. Blocks the save.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("no {kind} with id {id}")]
    UnknownTarget { kind: &'static str, id: String },
}

/// Storage read/write failure. Reported to the user; in-memory state is kept.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse stored {key}: {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{key} needs {size} bytes, storage quota is {quota}")]
    QuotaExceeded { key: String, size: usize, quota: usize },
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("not a playlist url: {0:?}")]
    InvalidPlaylistUrl(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Persistence failures leave the mutation applied in memory.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_) | Self::Auth(AuthError::Store(_)) | Self::Sync(SyncError::Store(_))
        )
    }
}
