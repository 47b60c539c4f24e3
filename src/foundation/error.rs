/// Convenience result type used across torso.
pub type TorsoResult<T> = Result<T, TorsoError>;

/// Top-level error taxonomy used by the generation pipeline.
#[derive(thiserror::Error, Debug)]
pub enum TorsoError {
    /// Invalid user-provided parameters, rejected before any rendering starts.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing or unusable external resources (font files, output paths, the `ffmpeg` binary).
    #[error("resource error: {0}")]
    Resource(String),

    /// The encoder rejected its parameters or failed while writing the output.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TorsoError {
    /// Build a [`TorsoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TorsoError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`TorsoError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// `true` for the invalid-argument class of failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
