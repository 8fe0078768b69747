//! File provider: reads YAML documents from disk.
//!
//! Supports change watching via a debounced filesystem watcher running in a
//! background thread. A change signals `Ok(())` on the resolver's watch
//! channel; a watcher failure signals `Err` once and then the thread stops.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use notify::RecursiveMode;
use notify_debouncer_mini::{DebouncedEventKind, new_debouncer};
use tracing::debug;

use crate::confmap::Confmap;
use crate::error::{ConfmapError, Result, WatchError};
use crate::provider::{Provider, WatchSender, WatcherHandle};

/// Default debounce for filesystem change events.
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Reads configuration from the local filesystem.
#[derive(Debug)]
pub struct FileProvider {
    debounce: Duration,
}

impl FileProvider {
    /// Create a file provider with the default debounce.
    pub fn new() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }

    /// Create a file provider with a custom change-event debounce.
    pub fn with_debounce(debounce: Duration) -> Self {
        Self { debounce }
    }
}

impl Default for FileProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for FileProvider {
    fn scheme(&self) -> &'static str {
        "file"
    }

    async fn retrieve(&self, location: &str) -> Result<Confmap> {
        let contents =
            std::fs::read_to_string(location).map_err(|e| ConfmapError::ProviderFetch {
                uri: format!("file:{location}"),
                message: e.to_string(),
            })?;
        Confmap::parse_yaml(&contents)
    }

    fn watch(&self, location: &str, notify: WatchSender) -> Result<Option<WatcherHandle>> {
        let path = PathBuf::from(location);
        let uri = format!("file:{location}");

        let (notify_tx, notify_rx) = std::sync::mpsc::channel();
        let mut debouncer =
            new_debouncer(self.debounce, notify_tx).map_err(|e| ConfmapError::WatchInit {
                uri: uri.clone(),
                message: e.to_string(),
            })?;
        debouncer
            .watcher()
            .watch(&path, RecursiveMode::NonRecursive)
            .map_err(|e| ConfmapError::WatchInit {
                uri: uri.clone(),
                message: e.to_string(),
            })?;

        debug!(uri = %uri, "watching configuration file");

        let handle = std::thread::spawn(move || {
            // Keep debouncer alive in this thread
            let _debouncer = debouncer;

            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(events) => {
                        if events
                            .iter()
                            .any(|e| e.kind == DebouncedEventKind::Any)
                            && notify.blocking_send(Ok(())).is_err()
                        {
                            // Receiver dropped, nobody left to re-resolve.
                            break;
                        }
                    }
                    Err(e) => {
                        // One terminal error, then no further signals.
                        let _ = notify.blocking_send(Err(WatchError::new(e.to_string())));
                        break;
                    }
                }
            }
        });

        Ok(Some(WatcherHandle::new(handle)))
    }
}
