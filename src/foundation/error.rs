/// Convenience result type used across the engine.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Degenerate inputs (empty element sets, zero-size frames) are not errors; they resolve to the
/// documented default scores. Only structurally unusable input is reported here.
#[derive(thiserror::Error, Debug)]
pub enum LayoutError {
    /// Missing or unrecognized root container or geometry.
    #[error("structure error: {0}")]
    Structure(String),

    /// Invalid configuration values.
    #[error("config error: {0}")]
    Config(String),

    /// Failures inside the assignment solver.
    #[error("matching error: {0}")]
    Matching(String),

    /// Errors when serializing or deserializing documents and configs.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayoutError {
    /// Build a [`LayoutError::Structure`] value.
    pub fn structure(msg: impl Into<String>) -> Self {
        Self::Structure(msg.into())
    }

    /// Build a [`LayoutError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`LayoutError::Matching`] value.
    pub fn matching(msg: impl Into<String>) -> Self {
        Self::Matching(msg.into())
    }

    /// Build a [`LayoutError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
