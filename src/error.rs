/// Convenience result type used across Inkform.
pub type InkformResult<T> = Result<T, InkformError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum InkformError {
    /// Geometry was requested before the font resource finished loading.
    #[error("font not loaded")]
    FontNotLoaded,

    /// Outline extraction was asked for an empty string.
    #[error("text must be non-empty")]
    EmptyText,

    /// Errors while parsing or querying a font face.
    #[error("font error: {0}")]
    Font(String),

    /// Invalid user-provided configuration or pipeline data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InkformError {
    /// Build an [`InkformError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build an [`InkformError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
