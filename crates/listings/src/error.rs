/// Crate-wide result type for listing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed listing store errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No listing exists with the requested id.
    #[error("listing not found: {id}")]
    NotFound { id: String },

    /// Database access failed.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// JSON (de)serialization of the listing document failed.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}
