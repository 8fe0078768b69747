//! Configuration source providers and scheme dispatch.
//!
//! A [`Provider`] resolves one URI scheme into a value tree. The
//! [`SchemeRegistry`] owns the provider set for a resolver; the scheme set
//! is fixed at startup, so a duplicate registration is a programming error
//! rather than a silent overwrite.

pub mod env;
pub mod file;
pub mod http;
pub mod yaml;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::confmap::Confmap;
use crate::error::{ConfmapError, Result, WatchError};

pub use env::EnvProvider;
pub use file::FileProvider;
pub use http::HttpProvider;
pub use yaml::YamlProvider;

/// One change-notification signal.
///
/// `Ok(())` means the underlying source changed and a re-resolve is
/// required. `Err` means monitoring failed unrecoverably; the watcher stops
/// producing signals afterwards.
pub type WatchSignal = std::result::Result<(), WatchError>;

/// Sending half of a resolver's watch channel, handed to providers.
pub type WatchSender = mpsc::Sender<WatchSignal>;

/// Handle to a provider's background watcher thread.
#[derive(Debug)]
pub struct WatcherHandle {
    handle: std::thread::JoinHandle<()>,
}

impl WatcherHandle {
    pub fn new(handle: std::thread::JoinHandle<()>) -> Self {
        Self { handle }
    }

    /// Check if the watcher thread is still running.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

/// Resolves URIs of a single scheme into value trees.
#[async_trait]
pub trait Provider: Send + Sync + std::fmt::Debug {
    /// The URI scheme this provider handles.
    fn scheme(&self) -> &'static str;

    /// Fetch and parse the document identified by `location` (the URI with
    /// its `scheme:` prefix stripped).
    async fn retrieve(&self, location: &str) -> Result<Confmap>;

    /// Start monitoring `location` for changes, signalling on `notify`.
    ///
    /// Providers without change detection return `Ok(None)`.
    fn watch(&self, location: &str, notify: WatchSender) -> Result<Option<WatcherHandle>> {
        let _ = (location, notify);
        Ok(None)
    }
}

/// Maps URI schemes to providers.
#[derive(Default)]
pub struct SchemeRegistry {
    providers: BTreeMap<&'static str, Arc<dyn Provider>>,
}

impl SchemeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the standard provider set:
    /// `file`, `env`, `yaml`, `http`, `https`.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for provider in [
            Arc::new(FileProvider::new()) as Arc<dyn Provider>,
            Arc::new(EnvProvider),
            Arc::new(YamlProvider),
            Arc::new(HttpProvider::http()),
            Arc::new(HttpProvider::https()),
        ] {
            // Fresh registry, fixed scheme set: duplicates are impossible.
            let scheme = provider.scheme();
            registry.providers.insert(scheme, provider);
        }
        registry
    }

    /// Register a provider under its scheme.
    ///
    /// Fails if the scheme is already taken; the provider set is fixed at
    /// startup and never silently replaced.
    pub fn register(&mut self, provider: Arc<dyn Provider>) -> Result<()> {
        let scheme = provider.scheme();
        if self.providers.contains_key(scheme) {
            return Err(ConfmapError::DuplicateScheme(scheme.to_string()));
        }
        self.providers.insert(scheme, provider);
        Ok(())
    }

    /// Look up the provider for a scheme.
    pub fn provider_for(&self, scheme: &str, uri: &str) -> Result<&Arc<dyn Provider>> {
        self.providers
            .get(scheme)
            .ok_or_else(|| ConfmapError::UnknownScheme {
                scheme: scheme.to_string(),
                uri: uri.to_string(),
            })
    }

    /// Registered schemes, in sorted order.
    pub fn schemes(&self) -> Vec<&'static str> {
        self.providers.keys().copied().collect()
    }
}
