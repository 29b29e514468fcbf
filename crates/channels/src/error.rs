/// Crate-wide result type for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed channel errors shared across adapter and store traits.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No listing or channel mapping could be resolved.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The caller named a platform no adapter is registered for.
    #[error("Unsupported platform")]
    UnsupportedPlatform { platform: String },

    /// Required platform credentials are absent.
    #[error("{platform} credentials not configured")]
    MissingCredentials { platform: String },

    /// A platform API call failed (network, auth, platform-side rejection).
    #[error("{platform} adapter failed: {message}")]
    Adapter { platform: String, message: String },

    /// An adapter call exceeded its deadline. Treated like an adapter
    /// failure by callers.
    #[error("{platform} adapter timed out")]
    Timeout { platform: String },

    /// Listing store access failed.
    #[error(transparent)]
    Listing(#[from] crosslist_listings::Error),

    /// Database access failed.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// JSON (de)serialization failed.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn not_found(message: impl std::fmt::Display) -> Self {
        Self::NotFound {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn unsupported_platform(platform: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            platform: platform.into(),
        }
    }

    #[must_use]
    pub fn missing_credentials(platform: impl Into<String>) -> Self {
        Self::MissingCredentials {
            platform: platform.into(),
        }
    }

    #[must_use]
    pub fn adapter(platform: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Adapter {
            platform: platform.into(),
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn timeout(platform: impl Into<String>) -> Self {
        Self::Timeout {
            platform: platform.into(),
        }
    }
}
