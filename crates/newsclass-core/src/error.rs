//! Error types for newsclass

/// Result type alias using newsclass's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for newsclass operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration and artifact loading errors (always fatal at startup)
    #[error("configuration error: {0}")]
    Config(String),

    /// Classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Feature pipeline errors
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration parse errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new pipeline error
    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error must stop the process before it accepts input
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Yaml(_) | Self::Io(_))
    }
}
