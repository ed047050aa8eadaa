/// Convenience result type used across lumen2d.
pub type LumenResult<T> = Result<T, LumenError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum LumenError {
    /// Invalid user-provided data (paths, colors, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Light geometry that cannot be baked (radius, inner radius, intensity).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// An image source could not be read or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Raster surface allocation or addressing failure.
    #[error("surface error: {0}")]
    Surface(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LumenError {
    /// Build a [`LumenError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LumenError::InvalidGeometry`] value.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Build a [`LumenError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`LumenError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
