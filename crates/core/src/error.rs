/// Result alias that carries the custom [`CortexError`] type.
pub type Result<T> = std::result::Result<T, CortexError>;

/// Common error type for the core crate.
///
/// Playback and rendering never fail; errors only come from loading
/// configuration or resolving user supplied stage names.
#[derive(Debug, thiserror::Error)]
pub enum CortexError {
    /// Free-form message surfaced to the command line.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid JSON for [`crate::AppConfig`].
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A stage name or number did not match any catalog entry.
    #[error("unknown stage `{0}`")]
    UnknownStage(String),
}

impl CortexError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}
