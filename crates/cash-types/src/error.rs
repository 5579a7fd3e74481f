//! Error types for cash.

use std::io;

/// Errors produced by the shell core.
///
/// The first four variants are user-facing: the dispatcher renders them as
/// failure results instead of propagating them. The rest are programming or
/// environment faults (duplicate aliases, unreadable state, bad config).
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("command not found: '{0}'")]
    CommandNotFound(String),

    #[error("invalid args provided.")]
    InvalidArguments {
        /// Usage string of the command that rejected its arguments.
        usage: String,
    },

    #[error("Unknown environment variable '{0}'.")]
    UnknownVariable(String),

    #[error("invalid path '{0}'")]
    InvalidPath(String),

    #[error("duplicate command alias: '{0}'")]
    DuplicateAlias(String),

    #[error("state not initialized: missing key '{0}'")]
    NotInitialized(&'static str),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShellError {
    /// Build the standard "invalid args" error for a usage string.
    pub fn invalid_args(usage: &str) -> Self {
        Self::InvalidArguments {
            usage: usage.to_string(),
        }
    }

    /// Whether this error stems from user input rather than a fault.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::CommandNotFound(_)
                | Self::InvalidArguments { .. }
                | Self::UnknownVariable(_)
                | Self::InvalidPath(_)
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
