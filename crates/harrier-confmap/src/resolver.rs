//! Orchestrates providers and converters into one merged tree.
//!
//! `resolve` fetches every root URI in declared order, merges right-biased
//! (later URIs override earlier ones), then applies each converter in
//! registration order. Any provider or converter failure aborts the pass;
//! a partially resolved tree is never returned.
//!
//! Both `resolve` and `watch` take `&mut self`: the caller-enforced
//! "never concurrently" contract from the provider interface becomes a
//! borrow-checker fact here.

use tokio::sync::mpsc;
use tracing::debug;

use crate::confmap::Confmap;
use crate::converter::Converter;
use crate::error::Result;
use crate::provider::{SchemeRegistry, WatchSignal, WatcherHandle};
use crate::uri::ConfigUri;

/// Buffer for pending change signals; one is enough to mean "re-resolve".
const WATCH_CHANNEL_CAPACITY: usize = 8;

/// Resolves a fixed list of root URIs into a single merged tree.
pub struct Resolver {
    registry: SchemeRegistry,
    uris: Vec<ConfigUri>,
    converters: Vec<Box<dyn Converter>>,
    watch_tx: mpsc::Sender<WatchSignal>,
    watch_rx: mpsc::Receiver<WatchSignal>,
    watchers: Vec<WatcherHandle>,
}

impl Resolver {
    /// Create a resolver over the given registry, URIs, and converter chain.
    pub fn new(
        registry: SchemeRegistry,
        uris: Vec<ConfigUri>,
        converters: Vec<Box<dyn Converter>>,
    ) -> Self {
        let (watch_tx, watch_rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        Self {
            registry,
            uris,
            converters,
            watch_tx,
            watch_rx,
            watchers: Vec::new(),
        }
    }

    /// The root URIs this resolver reads, in declared order.
    pub fn uris(&self) -> &[ConfigUri] {
        &self.uris
    }

    /// Fetch, merge, and convert all sources into one tree.
    ///
    /// Fails fast on the first provider or converter error. On the first
    /// successful call, change watchers are installed for every source
    /// whose provider supports them.
    pub async fn resolve(&mut self) -> Result<Confmap> {
        let mut merged = Confmap::new();

        for uri in &self.uris {
            let provider = self
                .registry
                .provider_for(uri.scheme(), &uri.to_string())?;
            debug!(uri = %uri, "fetching configuration source");
            merged.merge(provider.retrieve(uri.location()).await?);
        }

        for converter in &self.converters {
            debug!(converter = converter.name(), "applying converter");
            merged = converter.convert(merged)?;
        }

        if self.watchers.is_empty() {
            self.install_watchers()?;
        }

        Ok(merged)
    }

    /// Wait for the next change signal.
    ///
    /// `Ok(())` means an underlying source changed and the configuration
    /// should be re-resolved. `Err` means monitoring failed unrecoverably;
    /// no further signals follow it.
    pub async fn watch(&mut self) -> WatchSignal {
        match self.watch_rx.recv().await {
            Some(signal) => signal,
            // The resolver holds its own sender, so the channel stays open
            // for its whole lifetime; without watchers there is simply
            // nothing to wait for.
            None => std::future::pending().await,
        }
    }

    fn install_watchers(&mut self) -> Result<()> {
        for uri in &self.uris {
            let provider = self
                .registry
                .provider_for(uri.scheme(), &uri.to_string())?;
            if let Some(handle) = provider.watch(uri.location(), self.watch_tx.clone())? {
                self.watchers.push(handle);
            }
        }
        Ok(())
    }
}
