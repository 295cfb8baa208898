/// Result alias used throughout the crate.
pub type TwinviewResult<T> = Result<T, TwinviewError>;

/// Error taxonomy for stage setup, asset resolution, timeline construction and rendering.
#[derive(thiserror::Error, Debug)]
pub enum TwinviewError {
    /// Static configuration or descriptor failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Timeline construction or evaluation failed.
    #[error("animation error: {0}")]
    Animation(String),

    /// A requested model could not be resolved.
    #[error("asset load error for '{name}': {reason}")]
    AssetLoad {
        /// Logical entity name the model was requested for.
        name: String,
        /// Human readable failure reason.
        reason: String,
    },

    /// An entity name was registered twice through the strict registration path.
    #[error("duplicate entity registration: '{0}'")]
    DuplicateEntity(String),

    /// A draw call could not be issued.
    #[error("render error: {0}")]
    Render(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TwinviewError {
    /// Build a [`TwinviewError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TwinviewError::Animation`].
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`TwinviewError::AssetLoad`].
    pub fn asset(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AssetLoad {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`TwinviewError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TwinviewError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
