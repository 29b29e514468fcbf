/// Crate-wide result type for sync operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors for queue and orchestration internals. Domain failures the
/// boundary reports as data live in [`crate::types::PublishOutcome`] and
/// [`crate::types::SyncOutcome`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A queue row carries data the current build cannot interpret.
    #[error("malformed queue entry {id}: {message}")]
    MalformedJob { id: i64, message: String },

    /// Channel subsystem failure.
    #[error(transparent)]
    Channel(#[from] crosslist_channels::Error),

    /// Listing store failure.
    #[error(transparent)]
    Listing(#[from] crosslist_listings::Error),

    /// Database access failed.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl Error {
    #[must_use]
    pub fn malformed_job(id: i64, message: impl std::fmt::Display) -> Self {
        Self::MalformedJob {
            id,
            message: message.to_string(),
        }
    }
}
