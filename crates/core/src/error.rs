/// Result alias that carries the custom [`StorefrontError`] type.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Common error type for the core crate.
///
/// Only construction, configuration and IO boundaries produce errors. The
/// carousel, gallery and renderer normalise bad input instead of rejecting it.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// A configuration or manifest file could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A carousel needs at least one slide for its index arithmetic.
    #[error("a carousel requires at least one slide")]
    EmptyCarousel,
    /// A configuration value is outside the range the core can work with.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StorefrontError {
    pub(crate) fn config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
