//! Configuration resolution error types.

/// Result type alias for confmap operations.
pub type Result<T> = std::result::Result<T, ConfmapError>;

/// Errors that can occur while resolving configuration sources.
#[derive(Debug, thiserror::Error)]
pub enum ConfmapError {
    /// No provider registered for a URI scheme.
    #[error("no provider registered for scheme '{scheme}' in '{uri}'")]
    UnknownScheme { scheme: String, uri: String },

    /// A provider scheme was registered twice.
    #[error("scheme '{0}' is already registered")]
    DuplicateScheme(String),

    /// A provider failed to reach its source (file I/O, network, env lookup).
    #[error("failed to fetch '{uri}': {message}")]
    ProviderFetch { uri: String, message: String },

    /// A fetched document failed to parse as YAML.
    #[error("failed to parse config document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A fetched document parsed, but its root is not a mapping.
    #[error("config document root must be a mapping")]
    NotAMapping,

    /// An environment variable reference could not be expanded.
    #[error("environment variable '{name}' is not set and no default was provided")]
    UnresolvedReference { name: String },

    /// A change watcher could not be installed for a source.
    #[error("failed to start watching '{uri}': {message}")]
    WatchInit { uri: String, message: String },
}

/// Unrecoverable failure of an installed change watcher.
///
/// Once a watcher has reported this it stops producing further signals.
#[derive(Debug, Clone, thiserror::Error)]
#[error("configuration watcher failed: {message}")]
pub struct WatchError {
    pub message: String,
}

impl WatchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
