//! Configuration error types.

use orrery_orbit::OrbitError;

/// Errors that can occur when loading, saving, parsing or validating
/// configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the config file to disk.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON content. Invalid bodies surface here too.
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize config to RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// The body set is inconsistent (e.g. duplicate identifiers).
    #[error("invalid body configuration: {0}")]
    InvalidBody(#[from] OrbitError),

    /// A numeric setting is outside its accepted domain.
    #[error("invalid setting `{name}`: {value}")]
    InvalidSetting {
        /// Dotted path of the offending field.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}
