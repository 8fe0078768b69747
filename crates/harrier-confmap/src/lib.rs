//! Configuration resolution for the Harrier telemetry agent.
//!
//! Turns one or more configuration source URIs into a single merged value
//! tree:
//! - Scheme-dispatched providers (`file`, `env`, `yaml`, `http`, `https`)
//! - Right-biased, order-preserving merging across sources
//! - Post-merge converters (environment variable expansion)
//! - Optional change watching with a re-resolve signal channel

pub mod confmap;
pub mod converter;
pub mod error;
pub mod provider;
pub mod resolver;
pub mod uri;

pub use confmap::Confmap;
pub use converter::{Converter, ExpandConverter};
pub use error::{ConfmapError, Result, WatchError};
pub use provider::{
    EnvProvider, FileProvider, HttpProvider, Provider, SchemeRegistry, WatchSender, WatchSignal,
    WatcherHandle, YamlProvider,
};
pub use resolver::Resolver;
pub use uri::{ConfigUri, DEFAULT_SCHEME};
