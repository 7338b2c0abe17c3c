//! Configuration error types.

/// Errors from loading or saving `config.ron`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config.ron: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("cannot write config.ron: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("config.ron is not valid RON: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("cannot serialize config: {0}")]
    SerializeError(#[source] ron::Error),
}
