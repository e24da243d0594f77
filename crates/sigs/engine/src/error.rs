use std::borrow::Cow;

/// Result type of the engine's fallible operations.
pub type Result<T, E = SigsEngineError> = core::result::Result<T, E>;

/// Errors raised outside of authorization decisions, which are always reported as data.
#[derive(Debug, thiserror::Error)]
pub enum SigsEngineError {
    /// The configuration could not be loaded or parsed.
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    /// A configured value is out of range.
    #[error("invalid config error: {0}")]
    InvalidConfig(Cow<'static, str>),
}

impl SigsEngineError {
    pub(crate) fn invalid_config<E>(err: E) -> Self
    where
        Cow<'static, str>: From<E>,
    {
        Self::InvalidConfig(err.into())
    }
}
